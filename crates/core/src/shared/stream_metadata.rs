use std::path::PathBuf;

/// Properties of a live camera stream, reported when the camera starts.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    pub source: Option<PathBuf>,
}

impl StreamMetadata {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            source: None,
        }
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }
}
