use std::time::Duration;

use crate::feedback::domain::feedback_error::FeedbackError;
use crate::feedback::domain::tone_generator::ToneGenerator;

/// Oscillator that reports its state changes through the log.
///
/// Stands in for an audio device on headless hosts; it keeps the same
/// start/ramp/stop contract so misuse (e.g. ramping a stopped oscillator)
/// is still reported.
#[derive(Debug, Default)]
pub struct LogToneGenerator {
    running: bool,
    frequency_hz: f64,
    volume: f64,
}

impl LogToneGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    fn ensure_running(&self) -> Result<(), FeedbackError> {
        if self.running {
            Ok(())
        } else {
            Err(FeedbackError::Device {
                device: "oscillator",
                message: "not started".to_string(),
            })
        }
    }
}

impl ToneGenerator for LogToneGenerator {
    fn start(&mut self) -> Result<(), FeedbackError> {
        self.running = true;
        self.volume = 0.0;
        log::info!("[tone] oscillator started");
        Ok(())
    }

    fn set_frequency(&mut self, hz: f64) -> Result<(), FeedbackError> {
        self.ensure_running()?;
        self.frequency_hz = hz;
        Ok(())
    }

    fn ramp_volume(&mut self, volume: f64, over: Duration) -> Result<(), FeedbackError> {
        self.ensure_running()?;
        log::info!(
            "[tone] {:.0} Hz volume {:.2} -> {:.2} over {}ms",
            self.frequency_hz,
            self.volume,
            volume,
            over.as_millis()
        );
        self.volume = volume;
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            log::info!("[tone] oscillator stopped");
        }
        self.running = false;
        self.volume = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut tone = LogToneGenerator::new();
        tone.start().unwrap();
        tone.set_frequency(900.0).unwrap();
        tone.ramp_volume(0.2, Duration::from_millis(50)).unwrap();
        assert!(tone.is_running());
        assert_eq!(tone.volume(), 0.2);
        tone.stop();
        assert!(!tone.is_running());
        assert_eq!(tone.volume(), 0.0);
    }

    #[test]
    fn test_ramp_before_start_rejected() {
        let mut tone = LogToneGenerator::new();
        assert!(tone.ramp_volume(0.2, Duration::from_millis(50)).is_err());
        assert!(tone.set_frequency(500.0).is_err());
    }
}
