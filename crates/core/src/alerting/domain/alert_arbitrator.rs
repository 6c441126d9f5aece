use super::alarm_state::AlarmState;
use crate::perception::domain::scored_object::ScoredObject;
use crate::shared::constants::{
    DEFAULT_ANNOUNCE_DISTANCE_M, DEFAULT_CRITICAL_DISTANCE_M, DEFAULT_MAX_ANNOUNCEMENTS,
    FALLBACK_NEAREST_DISTANCE_M,
};

/// What one cycle should say and whether it should alarm.
#[derive(Clone, Debug, PartialEq)]
pub struct ArbitrationDecision {
    /// Nearest-first descriptions, at most `max_announcements` of them.
    pub announcements: Vec<String>,
    pub alarm: AlarmState,
    /// Smallest distance among all filtered objects, used for modulation.
    pub nearest_distance_m: f64,
}

impl ArbitrationDecision {
    /// The single utterance for this cycle, announcements joined by commas.
    pub fn utterance(&self) -> Option<String> {
        if self.announcements.is_empty() {
            None
        } else {
            Some(self.announcements.join(", "))
        }
    }
}

/// Decides announcements and alarm level for one cycle's objects.
///
/// Pure: holds only thresholds, no memory of earlier cycles.
#[derive(Clone, Debug)]
pub struct AlertArbitrator {
    announce_distance_m: f64,
    critical_distance_m: f64,
    max_announcements: usize,
}

impl AlertArbitrator {
    pub fn new(announce_distance_m: f64, critical_distance_m: f64, max_announcements: usize) -> Self {
        Self {
            announce_distance_m,
            critical_distance_m,
            max_announcements,
        }
    }

    pub fn critical_distance_m(&self) -> f64 {
        self.critical_distance_m
    }

    pub fn arbitrate(&self, objects: &[ScoredObject]) -> ArbitrationDecision {
        let mut eligible: Vec<&ScoredObject> = objects
            .iter()
            .filter(|o| o.distance_m <= self.announce_distance_m)
            .collect();
        eligible.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));

        let announcements = eligible
            .iter()
            .take(self.max_announcements)
            .map(|o| o.describe())
            .collect();

        let alarm = if objects
            .iter()
            .any(|o| o.hazard && o.distance_m <= self.critical_distance_m)
        {
            AlarmState::Alert
        } else {
            AlarmState::Safe
        };

        let nearest_distance_m = objects
            .iter()
            .map(|o| o.distance_m)
            .min_by(f64::total_cmp)
            .unwrap_or(FALLBACK_NEAREST_DISTANCE_M);

        ArbitrationDecision {
            announcements,
            alarm,
            nearest_distance_m,
        }
    }
}

impl Default for AlertArbitrator {
    fn default() -> Self {
        Self::new(
            DEFAULT_ANNOUNCE_DISTANCE_M,
            DEFAULT_CRITICAL_DISTANCE_M,
            DEFAULT_MAX_ANNOUNCEMENTS,
        )
    }
}
