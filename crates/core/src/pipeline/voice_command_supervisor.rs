use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::detection_loop::{DetectionHandle, LoopError, StartOutcome, StopOutcome};
use crate::shared::constants::{NOTICE_VOICE_READY, NOTICE_VOICE_UNSUPPORTED};
use crate::voice::domain::speech_recognizer::{RecognitionError, SpeechRecognizer};
use crate::voice::domain::transcript::Transcript;
use crate::voice::domain::voice_command::VoiceCommand;

const DEFAULT_RESTART_BACKOFF: Duration = Duration::from_millis(500);

/// What the supervisor drives. Implemented by [`DetectionHandle`].
pub trait DetectionControl: Send {
    fn start(&self) -> Result<StartOutcome, LoopError>;
    fn stop(&self) -> Result<StopOutcome, LoopError>;
    fn notify(&self, text: &str) -> Result<(), LoopError>;
}

impl DetectionControl for DetectionHandle {
    fn start(&self) -> Result<StartOutcome, LoopError> {
        DetectionHandle::start(self)
    }

    fn stop(&self) -> Result<StopOutcome, LoopError> {
        DetectionHandle::stop(self)
    }

    fn notify(&self, text: &str) -> Result<(), LoopError> {
        DetectionHandle::notify(self, text)
    }
}

/// Why the supervisor stopped listening.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupervisorExit {
    Cancelled,
    /// The host has no recognizer; the user has been told.
    Unsupported,
    /// The recognizer's input is gone for good.
    InputClosed,
    /// The detection loop no longer accepts commands.
    LoopGone,
}

/// Keeps a speech recognizer listening and turns what it hears into
/// detection start/stop requests.
///
/// Every end of a listening session, normal or by error, is followed by a
/// new one, so voice control survives recognizer timeouts. Only a failure
/// to begin listening waits `restart_backoff` before retrying.
pub struct VoiceCommandSupervisor<C> {
    recognizer: Box<dyn SpeechRecognizer>,
    control: C,
    cancelled: Arc<AtomicBool>,
    restart_backoff: Duration,
    sessions: usize,
}

impl<C: DetectionControl> VoiceCommandSupervisor<C> {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>, control: C, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            recognizer,
            control,
            cancelled,
            restart_backoff: DEFAULT_RESTART_BACKOFF,
            sessions: 0,
        }
    }

    pub fn with_restart_backoff(mut self, backoff: Duration) -> Self {
        self.restart_backoff = backoff;
        self
    }

    /// Listening sessions opened so far.
    pub fn sessions(&self) -> usize {
        self.sessions
    }

    pub fn run(&mut self) -> SupervisorExit {
        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                return SupervisorExit::Cancelled;
            }

            let stream = match self.recognizer.listen() {
                Ok(stream) => stream,
                Err(RecognitionError::Unsupported) => {
                    log::warn!("Speech recognition unavailable, voice control disabled");
                    let _ = self.control.notify(NOTICE_VOICE_UNSUPPORTED);
                    return SupervisorExit::Unsupported;
                }
                Err(RecognitionError::Closed) => {
                    log::info!("Voice input closed");
                    return SupervisorExit::InputClosed;
                }
                Err(e) => {
                    log::warn!("Recognizer failed to start, retrying: {e}");
                    std::thread::sleep(self.restart_backoff);
                    continue;
                }
            };

            self.sessions += 1;
            if self.sessions == 1 && self.control.notify(NOTICE_VOICE_READY).is_err() {
                return SupervisorExit::LoopGone;
            }

            for result in stream {
                if self.cancelled.load(Ordering::Relaxed) {
                    return SupervisorExit::Cancelled;
                }
                match result {
                    Ok(transcript) => {
                        if dispatch(&self.control, &transcript).is_err() {
                            return SupervisorExit::LoopGone;
                        }
                    }
                    Err(e) => {
                        log::warn!("Recognition error, restarting: {e}");
                        break;
                    }
                }
            }
            log::debug!("Listening session {} ended", self.sessions);
        }
    }
}

impl<C: DetectionControl + 'static> VoiceCommandSupervisor<C> {
    /// Runs the supervisor on its own thread.
    pub fn spawn(mut self) -> std::io::Result<JoinHandle<SupervisorExit>> {
        std::thread::Builder::new()
            .name("voice-supervisor".to_string())
            .spawn(move || self.run())
    }
}

fn dispatch<C: DetectionControl>(control: &C, transcript: &Transcript) -> Result<(), LoopError> {
    if transcript.is_blank() {
        return Ok(());
    }
    log::info!("Heard: {}", transcript.text);
    match VoiceCommand::parse(&transcript.text) {
        Some(VoiceCommand::Start) => control.start().map(|outcome| {
            log::debug!("Voice start: {outcome:?}");
        }),
        Some(VoiceCommand::Stop) => control.stop().map(|outcome| {
            log::debug!("Voice stop: {outcome:?}");
        }),
        None => Ok(()),
    }
}
