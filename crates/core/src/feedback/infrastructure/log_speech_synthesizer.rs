use crate::feedback::domain::feedback_error::FeedbackError;
use crate::feedback::domain::speech_synthesizer::{SpeechSynthesizer, Utterance};

/// Speech output written to the log, for hosts without a TTS engine.
#[derive(Debug, Default)]
pub struct LogSpeechSynthesizer;

impl SpeechSynthesizer for LogSpeechSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), FeedbackError> {
        log::info!(
            "[speech rate={:.2} pitch={:.2}] {}",
            utterance.rate,
            utterance.pitch,
            utterance.text
        );
        Ok(())
    }

    fn cancel(&mut self) {}
}
