use crate::perception::domain::detection::Detection;
use crate::perception::domain::object_detector::ObjectDetector;
use crate::shared::frame::Frame;

pub type DetectorLoader =
    Box<dyn FnMut() -> Result<Box<dyn ObjectDetector>, Box<dyn std::error::Error>> + Send>;

/// Decorator that builds its detector on the first `warm_up`.
///
/// Lets a model load fail at session start, where the user can be told,
/// instead of at program start. A failed load is retried on the next
/// `warm_up`; once loaded, warm-up is forwarded to the inner detector.
pub struct DeferredDetector {
    loader: DetectorLoader,
    inner: Option<Box<dyn ObjectDetector>>,
}

impl DeferredDetector {
    pub fn new(loader: DetectorLoader) -> Self {
        Self {
            loader,
            inner: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.is_some()
    }
}

impl ObjectDetector for DeferredDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        match self.inner.as_mut() {
            Some(inner) => inner.detect(frame),
            None => Err("Detector used before it was loaded".into()),
        }
    }

    fn warm_up(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.inner.is_none() {
            self.inner = Some((self.loader)()?);
        }
        match self.inner.as_mut() {
            Some(inner) => inner.warm_up(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::infrastructure::replay_detector::ReplayDetector;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type Loaded = Result<Box<dyn ObjectDetector>, Box<dyn std::error::Error>>;

    fn frame() -> Frame {
        Frame::new(vec![0u8; 12], 2, 2, 3, 0)
    }

    fn replay(text: &str) -> Loaded {
        Ok(Box::new(ReplayDetector::from_json_lines(text)))
    }

    #[test]
    fn test_detect_before_load_fails() {
        let mut detector = DeferredDetector::new(Box::new(|| replay("[]")));
        assert!(detector.detect(&frame()).is_err());
        assert!(!detector.is_loaded());
    }

    #[test]
    fn test_loads_once_then_forwards() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let mut detector = DeferredDetector::new(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            replay(r#"[{"class": "cup", "score": 0.7, "bbox": [1, 2, 3, 4]}]"#)
        }));

        detector.warm_up().unwrap();
        detector.warm_up().unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(detector.detect(&frame()).unwrap()[0].class_name, "cup");
    }

    #[test]
    fn test_failed_load_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let mut detector = DeferredDetector::new(Box::new(move || -> Loaded {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err("model file missing".into());
            }
            replay("[]")
        }));

        assert!(detector.warm_up().is_err());
        assert!(!detector.is_loaded());
        assert!(detector.warm_up().is_ok());
        assert!(detector.is_loaded());
    }
}
