use std::time::{Duration, Instant};

use super::speech_synthesizer::{SpeechSynthesizer, Utterance};

/// Rate-limited speech output.
///
/// Guidance requests inside `min_gap` of the previous emission are dropped,
/// never queued: stale guidance is worse than none for a moving user. Every
/// emission cancels whatever is still being spoken.
///
/// Lifecycle notices sent through [`say_now`](Self::say_now) are exempt from the gap.
pub struct SpeechChannel {
    synthesizer: Box<dyn SpeechSynthesizer>,
    min_gap: Duration,
    last_emission: Option<Instant>,
    last_text: Option<String>,
}

impl SpeechChannel {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>, min_gap: Duration) -> Self {
        Self {
            synthesizer,
            min_gap,
            last_emission: None,
            last_text: None,
        }
    }

    /// Speaks `utterance` unless the gap since the last emission is too short.
    ///
    /// Returns whether it was spoken.
    pub fn request(&mut self, utterance: &Utterance, now: Instant) -> bool {
        if !self.is_open(now) {
            log::debug!("Speech dropped inside gap: {}", utterance.text);
            return false;
        }
        self.emit(utterance, now);
        true
    }

    /// Whether a guidance request at `now` would be spoken.
    pub fn is_open(&self, now: Instant) -> bool {
        self.last_emission
            .map_or(true, |last| now.saturating_duration_since(last) >= self.min_gap)
    }

    /// Speaks a direct response to the user regardless of the gap.
    ///
    /// The emission still restarts the gap for guidance requests.
    pub fn say_now(&mut self, utterance: &Utterance, now: Instant) {
        self.emit(utterance, now);
    }

    pub fn cancel(&mut self) {
        self.synthesizer.cancel();
    }

    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    fn emit(&mut self, utterance: &Utterance, now: Instant) {
        self.synthesizer.cancel();
        if let Err(e) = self.synthesizer.speak(utterance) {
            log::warn!("Speech output failed: {e}");
        }
        self.last_emission = Some(now);
        self.last_text = Some(utterance.text.clone());
    }
}
