use thiserror::Error;

use super::transcript::Transcript;

#[derive(Debug, Error)]
pub enum RecognitionError {
    /// No recognizer exists on this host; retrying cannot help.
    #[error("Speech recognition is not supported on this device")]
    Unsupported,
    /// The audio source is gone for good (e.g. end of input).
    #[error("Speech input closed")]
    Closed,
    #[error("Speech recognition failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Lazily produced transcripts from one listening session. The stream may
/// end at any time; the caller decides whether to listen again.
pub type TranscriptStream<'a> = Box<dyn Iterator<Item = Result<Transcript, RecognitionError>> + 'a>;

/// Domain interface for continuous command recognition.
pub trait SpeechRecognizer: Send {
    /// Starts a listening session.
    fn listen(&mut self) -> Result<TranscriptStream<'_>, RecognitionError>;
}
