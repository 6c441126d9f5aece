use std::time::Duration;

use super::feedback_error::FeedbackError;

/// Domain interface for a continuous alarm oscillator.
///
/// Volume changes are linear ramps executed by the device so the output
/// never clicks.
pub trait ToneGenerator: Send {
    /// Starts the oscillator at zero volume.
    fn start(&mut self) -> Result<(), FeedbackError>;

    fn set_frequency(&mut self, hz: f64) -> Result<(), FeedbackError>;

    /// Ramps linearly from the current volume to `volume` over `over`.
    fn ramp_volume(&mut self, volume: f64, over: Duration) -> Result<(), FeedbackError>;

    /// Physically stops the oscillator.
    fn stop(&mut self);
}
