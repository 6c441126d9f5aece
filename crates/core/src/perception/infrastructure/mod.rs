pub mod coco_classes;
pub mod deferred_detector;
#[cfg(feature = "onnx")]
pub mod onnx_coco_detector;
pub mod replay_detector;
