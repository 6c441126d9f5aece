/// COCO object detector for YOLO-family ONNX exports, via `ort`.
///
/// Handles letterbox preprocessing, inference, per-class NMS and mapping
/// boxes back to frame pixels.
use std::path::Path;

use crate::perception::domain::detection::Detection;
use crate::perception::domain::object_detector::ObjectDetector;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

use super::coco_classes;

/// Fallback model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Detector-side confidence floor. The perception filter applies the
/// user-facing threshold afterwards.
pub const DEFAULT_CONFIDENCE: f64 = 0.2;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// Box coordinates precede the per-class scores in each output row.
const BOX_VALUES: usize = 4;

pub struct OnnxCocoDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxCocoDetector {
    /// Load a YOLO COCO ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's NCHW input shape,
    /// falling back to 640 when it is dynamic.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::info!(
            "Loaded COCO detector from {} (input {input_size}px)",
            model_path.display()
        );

        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl ObjectDetector for OnnxCocoDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let (input_tensor, scale, pad_x, pad_y) = letterbox(frame, self.input_size)?;

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("COCO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape();
        if shape.len() != 3 {
            return Err(format!("Unexpected COCO output shape: {shape:?}").into());
        }

        // [1, features, detections] is the usual YOLO export; accept both layouts.
        let transposed = shape[1] < shape[2];
        let (num_dets, num_feats) = if transposed {
            (shape[2], shape[1])
        } else {
            (shape[1], shape[2])
        };
        if num_feats <= BOX_VALUES {
            return Err(format!("COCO output rows too short: {num_feats} values").into());
        }

        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;
        let value = |det: usize, feat: usize| -> f64 {
            if transposed {
                data[feat * num_dets + det] as f64
            } else {
                data[det * num_feats + feat] as f64
            }
        };

        let mut candidates = Vec::new();
        for i in 0..num_dets {
            let (class_index, score) = (BOX_VALUES..num_feats)
                .map(|f| (f - BOX_VALUES, value(i, f)))
                .fold((0, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });
            if score < self.confidence {
                continue;
            }
            let Some(class_name) = coco_classes::class_name(class_index) else {
                continue;
            };

            let (cx, cy, w, h) = (value(i, 0), value(i, 1), value(i, 2), value(i, 3));
            let x1 = ((cx - w / 2.0) - pad_x as f64) / scale;
            let y1 = ((cy - h / 2.0) - pad_y as f64) / scale;
            let x2 = ((cx + w / 2.0) - pad_x as f64) / scale;
            let y2 = ((cy + h / 2.0) - pad_y as f64) / scale;

            candidates.push(Detection::new(
                class_name,
                score,
                clamp_to_frame(BoundingBox::from_corners(x1, y1, x2, y2), frame),
            ));
        }

        Ok(nms(candidates, NMS_IOU_THRESH))
    }
}

fn clamp_to_frame(b: BoundingBox, frame: &Frame) -> BoundingBox {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let x1 = b.x.clamp(0.0, fw);
    let y1 = b.y.clamp(0.0, fh);
    let x2 = (b.x + b.width).clamp(0.0, fw);
    let y2 = (b.y + b.height).clamp(0.0, fh);
    BoundingBox::from_corners(x1, y1, x2, y2)
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Letterbox-resize a frame to `target_size` × `target_size`.
///
/// Returns `(NCHW float32 tensor, scale, pad_x, pad_y)`.
fn letterbox(
    frame: &Frame,
    target_size: u32,
) -> Result<(ndarray::Array4<f32>, f64, u32, u32), Box<dyn std::error::Error>> {
    let src = frame
        .as_ndarray()
        .ok_or("Frame data length does not match its dimensions")?;
    if frame.channels() < 3 {
        return Err(format!("Expected an RGB frame, got {} channels", frame.channels()).into());
    }

    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = (fw * scale).round() as u32;
    let new_h = (fh * scale).round() as u32;
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    // Padding is 114/255 gray, the YOLO convention.
    let gray = 114.0f32 / 255.0;
    let mut tensor =
        ndarray::Array4::<f32>::from_elem((1, 3, target_size as usize, target_size as usize), gray);

    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    Ok((tensor, scale, pad_x, pad_y))
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

/// Greedy per-class NMS: highest score first, suppress same-class overlaps.
fn nms(mut dets: Vec<Detection>, iou_thresh: f64) -> Vec<Detection> {
    dets.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut keep: Vec<Detection> = Vec::new();
    for det in dets {
        let suppressed = keep
            .iter()
            .any(|k| k.class_name == det.class_name && k.bbox.iou(&det.bbox) > iou_thresh);
        if !suppressed {
            keep.push(det);
        }
    }
    keep
}
