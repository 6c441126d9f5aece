use std::fmt;

use super::detection::Detection;

/// Horizontal screen bucket of an object, by thirds of the frame width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Left,
    Front,
    Right,
}

impl Position {
    pub fn from_center(center_x: f64, frame_width: f64) -> Self {
        if center_x < frame_width / 3.0 {
            Position::Left
        } else if center_x > 2.0 * frame_width / 3.0 {
            Position::Right
        } else {
            Position::Front
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Left => write!(f, "left"),
            Position::Front => write!(f, "front"),
            Position::Right => write!(f, "right"),
        }
    }
}

/// A detection that passed filtering, ranged and placed on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredObject {
    pub detection: Detection,
    pub distance_m: f64,
    pub position: Position,
    pub hazard: bool,
}

impl ScoredObject {
    pub fn class_name(&self) -> &str {
        &self.detection.class_name
    }

    /// Spoken description, e.g. `"person front at 0.5 meters"`.
    pub fn describe(&self) -> String {
        format!(
            "{} {} at {} meters",
            self.detection.class_name,
            self.position,
            one_decimal(self.distance_m)
        )
    }
}

/// One decimal place, with exact half-tenths rounded up.
///
/// `{:.1}` rounds exact ties to even (0.25 → "0.2"). The only values that
/// sit exactly on a half-tenth are odd multiples of 0.25.
fn one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters.rem_euclid(2.0) == 1.0 {
        format!("{:.1}", (value * 10.0).round() / 10.0)
    } else {
        format!("{value:.1}")
    }
}
