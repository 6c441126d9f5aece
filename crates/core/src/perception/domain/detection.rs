use serde::{Deserialize, Serialize};

use crate::shared::bounding_box::BoundingBox;

/// One object instance reported by the detector for a single frame.
///
/// No identity survives across frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub class_name: String,
    pub score: f64,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class_name: impl Into<String>, score: f64, bbox: BoundingBox) -> Self {
        Self {
            class_name: class_name.into(),
            score,
            bbox,
        }
    }
}
