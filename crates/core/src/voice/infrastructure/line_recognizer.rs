use std::io::BufRead;

use crate::voice::domain::speech_recognizer::{
    RecognitionError, SpeechRecognizer, TranscriptStream,
};
use crate::voice::domain::transcript::Transcript;

/// Treats each line of a text source as one spoken utterance.
///
/// Lets the voice pipeline run from a terminal or a script: the CLI feeds
/// it stdin. End of input ends the current session, and any later `listen`
/// reports [`RecognitionError::Closed`]. A read error ends the session
/// after being reported.
pub struct LineRecognizer<R> {
    reader: R,
    closed: bool,
}

impl<R: BufRead + Send> LineRecognizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            closed: false,
        }
    }
}

impl<R: BufRead + Send> SpeechRecognizer for LineRecognizer<R> {
    fn listen(&mut self) -> Result<TranscriptStream<'_>, RecognitionError> {
        if self.closed {
            return Err(RecognitionError::Closed);
        }
        let reader = &mut self.reader;
        let closed = &mut self.closed;
        let mut failed = false;
        Ok(Box::new(std::iter::from_fn(move || {
            if *closed || failed {
                return None;
            }
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => {
                    *closed = true;
                    None
                }
                Ok(_) => Some(Ok(Transcript::new(line.trim(), 1.0))),
                Err(e) => {
                    failed = true;
                    Some(Err(RecognitionError::Io(e)))
                }
            }
        })))
    }
}
