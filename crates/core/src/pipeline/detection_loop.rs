use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use thiserror::Error;

use super::pipeline_logger::{CycleReport, PipelineLogger};
use super::session_state::{DetectionSession, SessionState};
use crate::alerting::domain::alert_arbitrator::AlertArbitrator;
use crate::camera::domain::camera::Camera;
use crate::feedback::domain::feedback_controller::FeedbackController;
use crate::perception::domain::object_detector::ObjectDetector;
use crate::perception::domain::perception_filter::PerceptionFilter;
use crate::shared::assist_config::AssistConfig;
use crate::shared::constants::{
    DEFAULT_FRAME_INTERVAL_MS, DEFAULT_YIELD_INTERVAL_MS, NOTICE_ALREADY_STOPPED,
    NOTICE_CAMERA_UNAVAILABLE, NOTICE_MODEL_UNAVAILABLE, NOTICE_STARTED, NOTICE_STOPPED,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    /// The camera or the detector could not be acquired; the loop stays idle.
    /// Carries the notice spoken to the user.
    Refused(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    AlreadyStopped,
}

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("Detection loop is no longer running")]
    Disconnected,
    #[error("Failed to spawn detection loop thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Requests sent to the loop thread. Handled between cycles.
pub enum Command {
    Start(Sender<StartOutcome>),
    Stop(Sender<StopOutcome>),
    Notify(String),
    Shutdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopTiming {
    /// Minimum time between the starts of two cycles.
    pub frame_interval: Duration,
    /// Minimum pause after every cycle.
    pub yield_interval: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(DEFAULT_FRAME_INTERVAL_MS),
            yield_interval: Duration::from_millis(DEFAULT_YIELD_INTERVAL_MS),
        }
    }
}

impl From<&AssistConfig> for LoopTiming {
    fn from(config: &AssistConfig) -> Self {
        Self {
            frame_interval: config.frame_interval(),
            yield_interval: config.yield_interval(),
        }
    }
}

/// Cloneable control surface of a spawned [`DetectionLoop`].
///
/// `start` and `stop` block until the loop has acted on the request, so
/// when `stop` returns the camera is released and the channels are silent.
#[derive(Clone)]
pub struct DetectionHandle {
    commands: Sender<Command>,
}

impl DetectionHandle {
    pub fn start(&self) -> Result<StartOutcome, LoopError> {
        let (reply, outcome) = crossbeam_channel::bounded(1);
        self.send(Command::Start(reply))?;
        outcome.recv().map_err(|_| LoopError::Disconnected)
    }

    pub fn stop(&self) -> Result<StopOutcome, LoopError> {
        let (reply, outcome) = crossbeam_channel::bounded(1);
        self.send(Command::Stop(reply))?;
        outcome.recv().map_err(|_| LoopError::Disconnected)
    }

    /// Speaks a notice through the loop's speech channel.
    pub fn notify(&self, text: &str) -> Result<(), LoopError> {
        self.send(Command::Notify(text.to_string()))
    }

    /// Asks the loop to end its session and exit its thread.
    pub fn shutdown(&self) -> Result<(), LoopError> {
        self.send(Command::Shutdown)
    }

    fn send(&self, command: Command) -> Result<(), LoopError> {
        self.commands
            .send(command)
            .map_err(|_| LoopError::Disconnected)
    }
}

/// The frame → detect → filter → arbitrate → feedback scheduler.
///
/// Owns the camera, the detector and every feedback channel; once spawned,
/// all of them live on the loop thread and are reached only through
/// [`DetectionHandle`]. Cycles start no more often than the frame interval
/// and are followed by at least the yield interval. A failed capture or
/// detection produces an empty cycle rather than stopping the session.
///
/// Every method that depends on time takes the current instant, so the
/// loop can be driven step by step.
pub struct DetectionLoop {
    camera: Box<dyn Camera>,
    detector: Box<dyn ObjectDetector>,
    filter: PerceptionFilter,
    arbitrator: AlertArbitrator,
    feedback: FeedbackController,
    logger: Box<dyn PipelineLogger>,
    timing: LoopTiming,
    state: SessionState,
    detector_ready: bool,
}

impl DetectionLoop {
    pub fn new(
        camera: Box<dyn Camera>,
        detector: Box<dyn ObjectDetector>,
        filter: PerceptionFilter,
        arbitrator: AlertArbitrator,
        feedback: FeedbackController,
        logger: Box<dyn PipelineLogger>,
        timing: LoopTiming,
    ) -> Self {
        Self {
            camera,
            detector,
            filter,
            arbitrator,
            feedback,
            logger,
            timing,
            state: SessionState::Idle,
            detector_ready: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn feedback(&self) -> &FeedbackController {
        &self.feedback
    }

    /// Moves the loop onto its own thread.
    pub fn spawn(self) -> Result<(DetectionHandle, JoinHandle<()>), LoopError> {
        let (commands, inbox) = crossbeam_channel::unbounded();
        let join = std::thread::Builder::new()
            .name("detection-loop".to_string())
            .spawn(move || self.run(inbox))
            .map_err(LoopError::Spawn)?;
        Ok((DetectionHandle { commands }, join))
    }

    /// Runs until a shutdown command arrives or every handle is dropped.
    pub fn run(mut self, commands: Receiver<Command>) {
        loop {
            self.tick(Instant::now());
            let received = match self.next_wait(Instant::now()) {
                Some(wait) => commands.recv_timeout(wait),
                None => commands.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(command) => {
                    if !self.handle(command, Instant::now()) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("All detection handles dropped");
                    break;
                }
            }
        }
        self.shutdown();
    }

    /// Applies one command. Returns false once the loop should exit.
    pub fn handle(&mut self, command: Command, now: Instant) -> bool {
        match command {
            Command::Start(reply) => {
                let outcome = self.start_session(now);
                let _ = reply.send(outcome);
            }
            Command::Stop(reply) => {
                let outcome = self.stop_session(now);
                let _ = reply.send(outcome);
            }
            Command::Notify(text) => self.feedback.notify(&text, now),
            Command::Shutdown => return false,
        }
        true
    }

    /// Runs a cycle if one is due, then advances the feedback timers.
    pub fn tick(&mut self, now: Instant) -> Option<CycleReport> {
        let report = self.run_cycle(now);
        self.feedback.poll(now);
        report
    }

    /// How long the loop may sleep before it has work again; `None` when
    /// only a command can wake it.
    pub fn next_wait(&self, now: Instant) -> Option<Duration> {
        let cycle_wait = self.state.session().map(|session| {
            session
                .time_until_due(now, self.timing.frame_interval)
                .max(self.timing.yield_interval)
        });
        match (cycle_wait, self.feedback.next_timer(now)) {
            (Some(cycle), Some(timer)) => Some(cycle.min(timer)),
            (cycle, timer) => cycle.or(timer),
        }
    }

    pub fn start_session(&mut self, now: Instant) -> StartOutcome {
        if self.state.is_running() {
            log::debug!("Start ignored, detection already running");
            return StartOutcome::AlreadyRunning;
        }

        if !self.detector_ready {
            if let Err(e) = self.detector.warm_up() {
                log::error!("Detector failed to load: {e}");
                return self.refuse(NOTICE_MODEL_UNAVAILABLE, now);
            }
            self.detector_ready = true;
        }

        match self.camera.start() {
            Ok(metadata) => {
                self.logger.info(&format!(
                    "Detection started ({}x{})",
                    metadata.width, metadata.height
                ));
                self.logger.begin(now);
                self.state = SessionState::Running(DetectionSession::new(metadata, now));
                self.feedback.notify(NOTICE_STARTED, now);
                StartOutcome::Started
            }
            Err(e) => {
                log::error!("Camera failed to start: {e}");
                self.camera.stop();
                self.refuse(NOTICE_CAMERA_UNAVAILABLE, now)
            }
        }
    }

    pub fn stop_session(&mut self, now: Instant) -> StopOutcome {
        match std::mem::take(&mut self.state) {
            SessionState::Idle => {
                self.feedback.notify(NOTICE_ALREADY_STOPPED, now);
                StopOutcome::AlreadyStopped
            }
            SessionState::Running(session) => {
                self.feedback.silence(now);
                self.camera.stop();
                self.logger.summary();
                self.logger.clear();
                log::info!("Detection stopped after {} cycles", session.cycles());
                self.feedback.notify(NOTICE_STOPPED, now);
                StopOutcome::Stopped
            }
        }
    }

    /// Runs one frame → feedback cycle if the session is running and due.
    pub fn run_cycle(&mut self, now: Instant) -> Option<CycleReport> {
        let SessionState::Running(session) = &mut self.state else {
            return None;
        };
        if !session.is_due(now, self.timing.frame_interval) {
            return None;
        }
        let cycle = session.begin_cycle(now);
        let mut frame_width = session.metadata().width;

        let capture_start = Instant::now();
        let detections = match self.camera.capture() {
            Ok(frame) => {
                self.logger.timing("capture", elapsed_ms(capture_start));
                frame_width = frame.width();
                let detect_start = Instant::now();
                let result = self.detector.detect(&frame);
                self.logger.timing("detect", elapsed_ms(detect_start));
                result.unwrap_or_else(|e| {
                    log::warn!("Detection failed, skipping cycle {cycle}: {e}");
                    Vec::new()
                })
            }
            Err(e) => {
                log::warn!("Frame capture failed, skipping cycle {cycle}: {e}");
                Vec::new()
            }
        };

        let objects = self.filter.filter(&detections, frame_width);
        let decision = self.arbitrator.arbitrate(&objects);

        let feedback_start = Instant::now();
        let spoken = self.feedback.render(&decision, now);
        self.logger.timing("feedback", elapsed_ms(feedback_start));
        self.logger.metric("objects", objects.len() as f64);

        let report = CycleReport {
            cycle,
            detections: detections.len(),
            objects,
            decision,
            spoken,
        };
        self.logger.cycle(&report);
        Some(report)
    }

    /// Ends any session and stops the tone. Used when the loop exits.
    pub fn shutdown(&mut self) {
        if let SessionState::Running(session) = std::mem::take(&mut self.state) {
            log::info!(
                "Shutting down, ending session after {} cycles",
                session.cycles()
            );
            self.camera.stop();
            self.logger.summary();
            self.logger.clear();
        }
        self.feedback.shutdown();
    }

    fn refuse(&mut self, notice: &str, now: Instant) -> StartOutcome {
        self.feedback.notify(notice, now);
        StartOutcome::Refused(notice.to_string())
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
