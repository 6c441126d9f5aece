use std::fmt;

/// Proximity alarm level, recomputed from scratch every cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlarmState {
    #[default]
    Safe,
    Alert,
}

impl AlarmState {
    pub fn is_alert(self) -> bool {
        self == AlarmState::Alert
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmState::Safe => write!(f, "SAFE"),
            AlarmState::Alert => write!(f, "ALERT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_safe() {
        assert_eq!(AlarmState::default(), AlarmState::Safe);
        assert!(!AlarmState::Safe.is_alert());
        assert!(AlarmState::Alert.is_alert());
    }

    #[test]
    fn test_display() {
        assert_eq!(AlarmState::Safe.to_string(), "SAFE");
        assert_eq!(AlarmState::Alert.to_string(), "ALERT");
    }
}
