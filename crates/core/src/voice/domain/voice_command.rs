/// A control command understood by the voice supervisor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceCommand {
    Start,
    Stop,
}

impl VoiceCommand {
    /// Maps free-form speech to a command by keyword.
    ///
    /// Matching is a case-insensitive substring test, and "start" wins over
    /// "stop"/"pause" when both are present. Anything else is ignored.
    pub fn parse(transcript: &str) -> Option<Self> {
        let text = transcript.to_lowercase();
        if text.contains("start") {
            Some(Self::Start)
        } else if text.contains("stop") || text.contains("pause") {
            Some(Self::Stop)
        } else {
            None
        }
    }
}
