use crate::feedback::domain::feedback_error::FeedbackError;
use crate::feedback::domain::haptic_motor::HapticMotor;

/// Haptic port for hosts without a vibration motor.
#[derive(Debug, Default)]
pub struct UnavailableHapticMotor;

impl HapticMotor for UnavailableHapticMotor {
    fn vibrate(&mut self, _pattern_ms: &[u32]) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unsupported("Vibration"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_unsupported() {
        let mut motor = UnavailableHapticMotor;
        assert!(matches!(
            motor.vibrate(&[250, 100]),
            Err(FeedbackError::Unsupported(_))
        ));
    }
}
