use serde::{Deserialize, Serialize};

/// Axis-aligned detection box in frame pixel units.
///
/// Serialized as `[x, y, width, height]`, the layout detection models
/// report boxes in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a box from corner coordinates `(x1, y1, x2, y2)`.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_center_x() {
        let b = BoundingBox::new(10.0, 0.0, 100.0, 50.0);
        assert_relative_eq!(b.center_x(), 60.0);
    }

    #[test]
    fn test_from_corners() {
        let b = BoundingBox::from_corners(10.0, 20.0, 30.0, 60.0);
        assert_eq!(b, BoundingBox::new(10.0, 20.0, 20.0, 40.0));
    }

    #[test]
    fn test_iou_identical_boxes() {
        let b = BoundingBox::new(10.0, 10.0, 100.0, 100.0);
        assert_relative_eq!(b.iou(&b), 1.0, epsilon = 1e-9);
    }

    #[rstest]
    #[case(BoundingBox::new(0.0, 0.0, 10.0, 10.0), BoundingBox::new(20.0, 20.0, 10.0, 10.0), 0.0)]
    #[case(BoundingBox::new(0.0, 0.0, 10.0, 10.0), BoundingBox::new(5.0, 0.0, 10.0, 10.0), 50.0 / 150.0)]
    fn test_iou(#[case] a: BoundingBox, #[case] b: BoundingBox, #[case] expected: f64) {
        assert_relative_eq!(a.iou(&b), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_deserializes_from_array() {
        let b: BoundingBox = serde_json::from_str("[0, 0, 160, 100]").unwrap();
        assert_eq!(b, BoundingBox::new(0.0, 0.0, 160.0, 100.0));
        assert_eq!(serde_json::to_string(&b).unwrap(), "[0.0,0.0,160.0,100.0]");
    }
}
