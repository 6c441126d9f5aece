use std::process::{Child, Command, Stdio};

use crate::feedback::domain::feedback_error::FeedbackError;
use crate::feedback::domain::speech_synthesizer::{SpeechSynthesizer, Utterance};

pub const DEFAULT_TTS_PROGRAM: &str = "espeak-ng";

/// Words per minute at rate 1.0 (espeak's own default).
const BASE_WORDS_PER_MINUTE: f64 = 175.0;

/// espeak pitch at relative pitch 1.0, on its 0-99 scale.
const BASE_PITCH: f64 = 50.0;

/// Speaks through an external espeak-compatible TTS program.
///
/// Each utterance runs as its own child process; cancelling kills the
/// child that is still speaking. Dropping the synthesizer does not cancel,
/// so a final notice is still heard when the program exits.
pub struct CommandSpeechSynthesizer {
    program: String,
    child: Option<Child>,
}

impl CommandSpeechSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            child: None,
        }
    }

    /// Returns true when `program` runs and reports a version.
    pub fn probe(program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandSpeechSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_TTS_PROGRAM)
    }
}

fn espeak_args(utterance: &Utterance) -> Vec<String> {
    let wpm = (BASE_WORDS_PER_MINUTE * utterance.rate).round().max(80.0) as u32;
    let pitch = (BASE_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as u32;
    vec![
        "-s".to_string(),
        wpm.to_string(),
        "-p".to_string(),
        pitch.to_string(),
        "--".to_string(),
        utterance.text.clone(),
    ]
}

impl SpeechSynthesizer for CommandSpeechSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), FeedbackError> {
        self.cancel();
        let child = Command::new(&self.program)
            .args(espeak_args(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| FeedbackError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        self.child = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_map_prosody() {
        let args = espeak_args(&Utterance::new("person front", 1.2, 1.5));
        assert_eq!(args, vec!["-s", "210", "-p", "75", "--", "person front"]);
    }

    #[test]
    fn test_args_clamp_pitch() {
        let args = espeak_args(&Utterance::new("x", 0.1, 3.0));
        assert_eq!(args[1], "80");
        assert_eq!(args[3], "99");
    }

    #[test]
    fn test_missing_program_fails_probe_and_speak() {
        let program = "sightline-no-such-tts-binary";
        assert!(!CommandSpeechSynthesizer::probe(program));
        let mut synth = CommandSpeechSynthesizer::new(program);
        let err = synth.speak(&Utterance::plain("hello")).unwrap_err();
        assert!(matches!(err, FeedbackError::Spawn { .. }));
    }

    #[test]
    fn test_cancel_without_child_is_noop() {
        let mut synth = CommandSpeechSynthesizer::default();
        synth.cancel();
        assert_eq!(synth.program(), DEFAULT_TTS_PROGRAM);
    }
}
