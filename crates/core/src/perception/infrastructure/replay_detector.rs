use std::fs;
use std::path::Path;

use crate::perception::domain::detection::Detection;
use crate::perception::domain::object_detector::ObjectDetector;
use crate::shared::frame::Frame;

/// Replays recorded detector output, one cycle per line.
///
/// The file is JSON lines: each line is an array of detections in the
/// detector wire shape (`{"class": .., "score": .., "bbox": [x, y, w, h]}`).
/// Blank lines are cycles with no detections. A line that fails to parse is
/// reported as a detection failure when its cycle comes up. Playback loops.
pub struct ReplayDetector {
    cycles: Vec<Result<Vec<Detection>, String>>,
    cursor: usize,
}

impl ReplayDetector {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read detections from {}: {e}", path.display()))?;
        Ok(Self::from_json_lines(&text))
    }

    pub fn from_json_lines(text: &str) -> Self {
        let cycles = text
            .lines()
            .enumerate()
            .map(|(n, line)| {
                let line = line.trim();
                if line.is_empty() {
                    return Ok(Vec::new());
                }
                serde_json::from_str::<Vec<Detection>>(line)
                    .map_err(|e| format!("line {}: {e}", n + 1))
            })
            .collect();
        Self { cycles, cursor: 0 }
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }
}

impl ObjectDetector for ReplayDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        if self.cycles.is_empty() {
            return Ok(Vec::new());
        }
        let entry = &self.cycles[self.cursor % self.cycles.len()];
        self.cursor += 1;
        match entry {
            Ok(detections) => Ok(detections.clone()),
            Err(e) => Err(format!("Malformed replay entry at {e}").into()),
        }
    }

    fn warm_up(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.cycles.is_empty() {
            return Err("Replay file contains no detection cycles".into());
        }
        Ok(())
    }
}
