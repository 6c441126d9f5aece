use std::time::{Duration, Instant};

use crate::shared::stream_metadata::StreamMetadata;

/// One run of the detection loop, from a successful start to the next stop.
#[derive(Clone, Debug)]
pub struct DetectionSession {
    metadata: StreamMetadata,
    started_at: Instant,
    last_cycle: Option<Instant>,
    cycles: usize,
}

impl DetectionSession {
    pub fn new(metadata: StreamMetadata, started_at: Instant) -> Self {
        Self {
            metadata,
            started_at,
            last_cycle: None,
            cycles: 0,
        }
    }

    pub fn metadata(&self) -> &StreamMetadata {
        &self.metadata
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn last_cycle(&self) -> Option<Instant> {
        self.last_cycle
    }

    /// Time left before the next cycle may start; zero when one is due.
    ///
    /// Cycles are paced from the start of the previous cycle, so a slow
    /// detector eats into the wait instead of adding to it.
    pub fn time_until_due(&self, now: Instant, interval: Duration) -> Duration {
        match self.last_cycle {
            None => Duration::ZERO,
            Some(last) => interval.saturating_sub(now.saturating_duration_since(last)),
        }
    }

    pub fn is_due(&self, now: Instant, interval: Duration) -> bool {
        self.time_until_due(now, interval).is_zero()
    }

    /// Marks the start of a cycle and returns its 1-based number.
    pub fn begin_cycle(&mut self, now: Instant) -> usize {
        self.last_cycle = Some(now);
        self.cycles += 1;
        self.cycles
    }
}

/// Lifecycle of the detection loop. At most one session exists.
#[derive(Clone, Debug, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running(DetectionSession),
}

impl SessionState {
    pub fn is_running(&self) -> bool {
        matches!(self, SessionState::Running(_))
    }

    pub fn session(&self) -> Option<&DetectionSession> {
        match self {
            SessionState::Running(session) => Some(session),
            SessionState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(350);

    fn session(t0: Instant) -> DetectionSession {
        DetectionSession::new(StreamMetadata::new(640, 480), t0)
    }

    #[test]
    fn test_first_cycle_due_immediately() {
        let t0 = Instant::now();
        assert!(session(t0).is_due(t0, INTERVAL));
    }

    #[test]
    fn test_next_cycle_waits_for_interval_from_cycle_start() {
        let t0 = Instant::now();
        let mut s = session(t0);
        assert_eq!(s.begin_cycle(t0), 1);

        assert!(!s.is_due(t0 + Duration::from_millis(349), INTERVAL));
        assert_eq!(
            s.time_until_due(t0 + Duration::from_millis(300), INTERVAL),
            Duration::from_millis(50)
        );
        assert!(s.is_due(t0 + INTERVAL, INTERVAL));
        assert_eq!(s.begin_cycle(t0 + INTERVAL), 2);
        assert_eq!(s.last_cycle(), Some(t0 + INTERVAL));
    }

    #[test]
    fn test_state_accessors() {
        let t0 = Instant::now();
        let idle = SessionState::default();
        assert!(!idle.is_running());
        assert!(idle.session().is_none());

        let running = SessionState::Running(session(t0));
        assert!(running.is_running());
        assert_eq!(running.session().map(|s| s.metadata().width), Some(640));
        assert_eq!(running.session().map(|s| s.started_at()), Some(t0));
    }
}
