use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Camera source not found: {0}")]
    NotFound(PathBuf),
    #[error("Camera source {0} contains no frames")]
    Empty(PathBuf),
    #[error("Camera is not started")]
    NotStarted,
    #[error("Failed to decode frame {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A live frame source.
///
/// `start` acquires the device and reports the stream geometry; `capture`
/// returns the most recent frame; `stop` releases the device and is safe to
/// call on a stopped camera.
pub trait Camera: Send {
    fn start(&mut self) -> Result<StreamMetadata, CameraError>;

    fn capture(&mut self) -> Result<Frame, CameraError>;

    fn stop(&mut self);

    fn is_active(&self) -> bool;
}
