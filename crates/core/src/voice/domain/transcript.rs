/// One recognised utterance.
#[derive(Clone, Debug, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub confidence: f32,
}

impl Transcript {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_fields() {
        let t = Transcript::new("start detection", 0.92);
        assert_eq!(t.text, "start detection");
        assert_eq!(t.confidence, 0.92);
        assert!(!t.is_blank());
    }

    #[test]
    fn test_whitespace_is_blank() {
        assert!(Transcript::new("  \t", 1.0).is_blank());
    }
}
