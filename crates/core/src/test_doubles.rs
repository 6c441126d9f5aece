//! Recording fakes for the port traits, shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::camera::domain::camera::{Camera, CameraError};
use crate::feedback::domain::feedback_error::FeedbackError;
use crate::feedback::domain::haptic_motor::HapticMotor;
use crate::feedback::domain::speech_synthesizer::{SpeechSynthesizer, Utterance};
use crate::feedback::domain::tone_generator::ToneGenerator;
use crate::perception::domain::detection::Detection;
use crate::perception::domain::object_detector::ObjectDetector;
use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

#[derive(Clone, Debug, PartialEq)]
pub enum SpeechEvent {
    Spoke(Utterance),
    Cancelled,
}

#[derive(Clone, Default)]
pub struct RecordingSynthesizer {
    pub events: Arc<Mutex<Vec<SpeechEvent>>>,
}

impl RecordingSynthesizer {
    pub fn utterances(&self) -> Vec<Utterance> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SpeechEvent::Spoke(u) => Some(u.clone()),
                SpeechEvent::Cancelled => None,
            })
            .collect()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.utterances().into_iter().map(|u| u.text).collect()
    }

    pub fn cancel_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e == SpeechEvent::Cancelled)
            .count()
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), FeedbackError> {
        self.events
            .lock()
            .unwrap()
            .push(SpeechEvent::Spoke(utterance.clone()));
        Ok(())
    }

    fn cancel(&mut self) {
        self.events.lock().unwrap().push(SpeechEvent::Cancelled);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ToneEvent {
    Started,
    Frequency(f64),
    Ramp(f64, Duration),
    Stopped,
}

#[derive(Clone, Default)]
pub struct RecordingToneGenerator {
    events: Arc<Mutex<Vec<ToneEvent>>>,
    fail_start: bool,
}

impl RecordingToneGenerator {
    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<ToneEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ToneGenerator for RecordingToneGenerator {
    fn start(&mut self) -> Result<(), FeedbackError> {
        if self.fail_start {
            return Err(FeedbackError::Device {
                device: "oscillator",
                message: "no output device".to_string(),
            });
        }
        self.events.lock().unwrap().push(ToneEvent::Started);
        Ok(())
    }

    fn set_frequency(&mut self, hz: f64) -> Result<(), FeedbackError> {
        self.events.lock().unwrap().push(ToneEvent::Frequency(hz));
        Ok(())
    }

    fn ramp_volume(&mut self, volume: f64, over: Duration) -> Result<(), FeedbackError> {
        self.events.lock().unwrap().push(ToneEvent::Ramp(volume, over));
        Ok(())
    }

    fn stop(&mut self) {
        self.events.lock().unwrap().push(ToneEvent::Stopped);
    }
}

#[derive(Clone, Default)]
pub struct RecordingHapticMotor {
    patterns: Arc<Mutex<Vec<Vec<u32>>>>,
    attempts: Arc<Mutex<usize>>,
    unsupported: bool,
}

impl RecordingHapticMotor {
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub fn patterns(&self) -> Vec<Vec<u32>> {
        self.patterns.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl HapticMotor for RecordingHapticMotor {
    fn vibrate(&mut self, pattern_ms: &[u32]) -> Result<(), FeedbackError> {
        *self.attempts.lock().unwrap() += 1;
        if self.unsupported {
            return Err(FeedbackError::Unsupported("Vibration"));
        }
        self.patterns.lock().unwrap().push(pattern_ms.to_vec());
        Ok(())
    }
}

#[derive(Default)]
pub struct CameraLog {
    pub starts: usize,
    pub captures: usize,
    pub stops: usize,
    pub active: bool,
}

/// Camera producing blank frames of a fixed size.
#[derive(Clone)]
pub struct FakeCamera {
    pub log: Arc<Mutex<CameraLog>>,
    width: u32,
    height: u32,
    fail_start: bool,
    fail_capture: bool,
}

impl FakeCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            log: Arc::default(),
            width,
            height,
            fail_start: false,
            fail_capture: false,
        }
    }

    pub fn refusing() -> Self {
        Self {
            fail_start: true,
            ..Self::new(200, 100)
        }
    }

    pub fn broken_capture(width: u32, height: u32) -> Self {
        Self {
            fail_capture: true,
            ..Self::new(width, height)
        }
    }

    pub fn starts(&self) -> usize {
        self.log.lock().unwrap().starts
    }

    pub fn captures(&self) -> usize {
        self.log.lock().unwrap().captures
    }

    pub fn stops(&self) -> usize {
        self.log.lock().unwrap().stops
    }
}

impl Camera for FakeCamera {
    fn start(&mut self) -> Result<StreamMetadata, CameraError> {
        let mut log = self.log.lock().unwrap();
        log.starts += 1;
        if self.fail_start {
            return Err(CameraError::NotFound("/dev/video0".into()));
        }
        log.active = true;
        Ok(StreamMetadata::new(self.width, self.height))
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let mut log = self.log.lock().unwrap();
        if !log.active {
            return Err(CameraError::NotStarted);
        }
        log.captures += 1;
        if self.fail_capture {
            return Err(CameraError::Decode {
                path: "frame".into(),
                message: "truncated".to_string(),
            });
        }
        let len = (self.width * self.height * 3) as usize;
        Ok(Frame::new(vec![0; len], self.width, self.height, 3, log.captures - 1))
    }

    fn stop(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.stops += 1;
        log.active = false;
    }

    fn is_active(&self) -> bool {
        self.log.lock().unwrap().active
    }
}

/// Detector returning scripted cycles, then empty sets once the script runs out.
#[derive(Clone, Default)]
pub struct ScriptedDetector {
    cycles: Arc<Mutex<VecDeque<Result<Vec<Detection>, String>>>>,
    calls: Arc<Mutex<usize>>,
    warm_ups: Arc<Mutex<usize>>,
    fail_warm_up: bool,
}

impl ScriptedDetector {
    pub fn new(cycles: Vec<Result<Vec<Detection>, String>>) -> Self {
        Self {
            cycles: Arc::new(Mutex::new(cycles.into())),
            ..Self::default()
        }
    }

    pub fn repeating(detections: Vec<Detection>, times: usize) -> Self {
        Self::new(vec![Ok(detections); times])
    }

    pub fn unloadable() -> Self {
        Self {
            fail_warm_up: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn warm_ups(&self) -> usize {
        *self.warm_ups.lock().unwrap()
    }
}

impl ObjectDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        *self.calls.lock().unwrap() += 1;
        match self.cycles.lock().unwrap().pop_front() {
            Some(Ok(detections)) => Ok(detections),
            Some(Err(message)) => Err(message.into()),
            None => Ok(Vec::new()),
        }
    }

    fn warm_up(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        *self.warm_ups.lock().unwrap() += 1;
        if self.fail_warm_up {
            return Err("model file missing".into());
        }
        Ok(())
    }
}
