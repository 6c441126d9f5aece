use std::fs;
use std::path::{Path, PathBuf};

use crate::camera::domain::camera::{Camera, CameraError};
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

/// Replays a directory of still images as a looping camera feed.
///
/// Files are visited in name order. Each capture decodes the next image
/// with the `image` crate and converts it to RGB; after the last file the
/// sequence starts over. Stream geometry is taken from the first image.
pub struct ImageSequenceCamera {
    directory: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
    captured: usize,
    active: bool,
}

impl ImageSequenceCamera {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            files: Vec::new(),
            cursor: 0,
            captured: 0,
            active: false,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn frame_count(&self) -> usize {
        self.files.len()
    }
}

fn is_image_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

fn list_images(directory: &Path) -> Result<Vec<PathBuf>, CameraError> {
    if !directory.is_dir() {
        return Err(CameraError::NotFound(directory.to_path_buf()));
    }
    let mut files: Vec<PathBuf> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_image_file(p))
        .collect();
    files.sort();
    Ok(files)
}

fn decode(path: &Path, index: usize) -> Result<Frame, CameraError> {
    let image = image::open(path).map_err(|e| CameraError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Frame::from_rgb_image(image.to_rgb8(), index))
}

impl Camera for ImageSequenceCamera {
    fn start(&mut self) -> Result<StreamMetadata, CameraError> {
        let files = list_images(&self.directory)?;
        let first = files
            .first()
            .ok_or_else(|| CameraError::Empty(self.directory.clone()))?;
        let (width, height) = image::image_dimensions(first).map_err(|e| CameraError::Decode {
            path: first.clone(),
            message: e.to_string(),
        })?;

        log::info!(
            "Camera started: {} frames from {} ({width}x{height})",
            files.len(),
            self.directory.display()
        );
        self.files = files;
        self.cursor = 0;
        self.active = true;
        Ok(StreamMetadata::new(width, height).with_source(self.directory.clone()))
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        if !self.active || self.files.is_empty() {
            return Err(CameraError::NotStarted);
        }
        let path = &self.files[self.cursor % self.files.len()];
        self.cursor = (self.cursor + 1) % self.files.len();
        let frame = decode(path, self.captured)?;
        self.captured += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        if self.active {
            log::info!("Camera stopped after {} frames", self.captured);
        }
        self.active = false;
        self.files.clear();
        self.cursor = 0;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
