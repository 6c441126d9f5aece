use super::feedback_error::FeedbackError;

/// Domain interface for a vibration motor.
///
/// `pattern_ms` alternates on/off durations, starting with on. Requests are
/// fire-and-forget; overlapping requests are the device's concern.
pub trait HapticMotor: Send {
    fn vibrate(&mut self, pattern_ms: &[u32]) -> Result<(), FeedbackError>;
}
