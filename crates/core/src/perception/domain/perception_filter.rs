use super::calibration_model::CalibrationModel;
use super::class_table::ClassTable;
use super::detection::Detection;
use super::scored_object::{Position, ScoredObject};

/// Turns one cycle's raw detections into ranged objects, nearest first.
///
/// Drops detections below the confidence threshold and classes the table
/// does not mark important. The output is sorted so that for every adjacent
/// pair `distance[i] <= distance[i + 1]`; equal distances keep detector order.
#[derive(Clone, Debug)]
pub struct PerceptionFilter {
    threshold: f64,
    classes: ClassTable,
    calibration: CalibrationModel,
}

impl PerceptionFilter {
    pub fn new(threshold: f64, classes: ClassTable, calibration: CalibrationModel) -> Self {
        Self {
            threshold,
            classes,
            calibration,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn filter(&self, detections: &[Detection], frame_width: u32) -> Vec<ScoredObject> {
        let mut objects: Vec<ScoredObject> = detections
            .iter()
            .filter(|d| d.score >= self.threshold)
            .filter(|d| self.classes.is_important(&d.class_name))
            .map(|d| ScoredObject {
                distance_m: self.calibration.estimate(d.bbox.width),
                position: Position::from_center(d.bbox.center_x(), frame_width as f64),
                hazard: self.classes.is_hazard(&d.class_name),
                detection: d.clone(),
            })
            .collect();

        objects.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        objects
    }
}
