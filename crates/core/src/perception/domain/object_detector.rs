use super::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for object detection.
///
/// Implementations may hold model sessions or replay state, hence `&mut self`.
/// A failed call is recoverable: the caller treats it as an empty frame.
pub trait ObjectDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;

    /// Loads or checks the model before a session starts. Default: no-op.
    fn warm_up(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
