use thiserror::Error;

/// Failure reported by an output device port.
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// The platform has no such device; callers degrade without it.
    #[error("{0} is not supported on this device")]
    Unsupported(&'static str),
    #[error("{device} failed: {message}")]
    Device {
        device: &'static str,
        message: String,
    },
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            FeedbackError::Unsupported("vibration").to_string(),
            "vibration is not supported on this device"
        );
        let err = FeedbackError::Device {
            device: "oscillator",
            message: "buffer underrun".to_string(),
        };
        assert_eq!(err.to_string(), "oscillator failed: buffer underrun");
    }
}
