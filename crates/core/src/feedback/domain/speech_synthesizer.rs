use super::feedback_error::FeedbackError;

/// One spoken message with its prosody.
///
/// `rate` and `pitch` are relative: 1.0 is the voice's normal speed and pitch.
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f64,
    pub pitch: f64,
}

impl Utterance {
    pub fn new(text: impl Into<String>, rate: f64, pitch: f64) -> Self {
        Self {
            text: text.into(),
            rate,
            pitch,
        }
    }

    /// Normal rate and pitch.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, 1.0, 1.0)
    }
}

/// Domain interface for text-to-speech output.
///
/// `speak` must return without waiting for the audio to finish; `cancel`
/// cuts off whatever is still being spoken.
pub trait SpeechSynthesizer: Send {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), FeedbackError>;

    fn cancel(&mut self);
}
