use super::feedback_error::FeedbackError;
use super::haptic_motor::HapticMotor;

/// Result of one vibration request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PulseOutcome {
    Sent,
    /// The motor just reported it does not exist; the caller should tell the
    /// user once. Later pulses are skipped silently.
    BecameUnavailable,
    Skipped,
}

/// Fire-and-forget vibration, one pattern per alarm cycle.
pub struct VibrationChannel {
    motor: Box<dyn HapticMotor>,
    pattern_ms: Vec<u32>,
    available: bool,
}

impl VibrationChannel {
    pub fn new(motor: Box<dyn HapticMotor>, pattern_ms: Vec<u32>) -> Self {
        Self {
            motor,
            pattern_ms,
            available: true,
        }
    }

    pub fn pulse(&mut self) -> PulseOutcome {
        if !self.available {
            return PulseOutcome::Skipped;
        }
        match self.motor.vibrate(&self.pattern_ms) {
            Ok(()) => PulseOutcome::Sent,
            Err(FeedbackError::Unsupported(device)) => {
                log::info!("{device} unavailable, continuing without it");
                self.available = false;
                PulseOutcome::BecameUnavailable
            }
            Err(e) => {
                log::warn!("Vibration failed: {e}");
                PulseOutcome::Skipped
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}
