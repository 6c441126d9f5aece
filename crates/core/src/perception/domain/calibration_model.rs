use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_REFERENCE_DIST_M, DEFAULT_REFERENCE_REAL_WIDTH_M, DEFAULT_REFERENCE_WIDTH_PX,
    FAR_DISTANCE_M,
};

/// Reference measurements that map a box width in pixels to metres.
///
/// Distance is inversely proportional to apparent width:
/// `(reference_width_px / width) * reference_real_width_m * reference_dist_m`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    pub reference_width_px: f64,
    pub reference_real_width_m: f64,
    pub reference_dist_m: f64,
}

impl CalibrationModel {
    pub fn new(reference_width_px: f64, reference_real_width_m: f64, reference_dist_m: f64) -> Self {
        Self {
            reference_width_px,
            reference_real_width_m,
            reference_dist_m,
        }
    }

    /// Estimated distance in metres for a box of the given pixel width.
    ///
    /// Widths that are zero, negative or NaN cannot be ranged and map to
    /// [`FAR_DISTANCE_M`], which never announces and never alarms.
    pub fn estimate(&self, box_width_px: f64) -> f64 {
        if box_width_px.is_nan() || box_width_px <= 0.0 {
            return FAR_DISTANCE_M;
        }
        (self.reference_width_px / box_width_px) * self.reference_real_width_m * self.reference_dist_m
    }

    pub fn is_valid(&self) -> bool {
        [
            self.reference_width_px,
            self.reference_real_width_m,
            self.reference_dist_m,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }
}

impl Default for CalibrationModel {
    fn default() -> Self {
        Self::new(
            DEFAULT_REFERENCE_WIDTH_PX,
            DEFAULT_REFERENCE_REAL_WIDTH_M,
            DEFAULT_REFERENCE_DIST_M,
        )
    }
}
