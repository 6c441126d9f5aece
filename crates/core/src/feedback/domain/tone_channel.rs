use std::time::{Duration, Instant};

use super::modulation::ToneParams;
use super::tone_generator::ToneGenerator;

/// Alarm tone output with click-free transitions.
///
/// The oscillator starts lazily on the first alarm. Fading out ramps the
/// volume to zero and schedules the physical stop for `stop_delay` later;
/// [`ToneChannel::poll`] performs it once the deadline passes. An alarm
/// arriving before the deadline cancels the pending stop.
pub struct ToneChannel {
    generator: Box<dyn ToneGenerator>,
    ramp: Duration,
    stop_delay: Duration,
    running: bool,
    pending_stop: Option<Instant>,
    current: Option<ToneParams>,
}

impl ToneChannel {
    pub fn new(generator: Box<dyn ToneGenerator>, ramp: Duration, stop_delay: Duration) -> Self {
        Self {
            generator,
            ramp,
            stop_delay,
            running: false,
            pending_stop: None,
            current: None,
        }
    }

    /// Ramps the oscillator toward `params`, starting it if needed.
    pub fn sound(&mut self, params: ToneParams) {
        if !self.running {
            if let Err(e) = self.generator.start() {
                log::warn!("Alarm tone unavailable: {e}");
                return;
            }
            self.running = true;
        }
        self.pending_stop = None;
        if let Err(e) = self.generator.set_frequency(params.frequency_hz) {
            log::warn!("Alarm tone frequency change failed: {e}");
        }
        if let Err(e) = self.generator.ramp_volume(params.volume, self.ramp) {
            log::warn!("Alarm tone volume ramp failed: {e}");
        }
        self.current = Some(params);
    }

    /// Ramps to silence and schedules the oscillator stop. No-op when idle
    /// or already fading.
    pub fn fade_out(&mut self, now: Instant) {
        if !self.running || self.pending_stop.is_some() {
            return;
        }
        if let Err(e) = self.generator.ramp_volume(0.0, self.ramp) {
            log::warn!("Alarm tone fade-out failed: {e}");
        }
        self.current = None;
        self.pending_stop = Some(now + self.stop_delay);
    }

    /// Stops the oscillator once a scheduled fade-out has completed.
    pub fn poll(&mut self, now: Instant) {
        if let Some(deadline) = self.pending_stop {
            if now >= deadline {
                self.generator.stop();
                self.running = false;
                self.pending_stop = None;
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_fading(&self) -> bool {
        self.pending_stop.is_some()
    }

    pub fn current(&self) -> Option<ToneParams> {
        self.current
    }

    pub fn stop_delay(&self) -> Duration {
        self.stop_delay
    }

    pub fn stop_deadline(&self) -> Option<Instant> {
        self.pending_stop
    }

    /// Stops the oscillator now, skipping the fade.
    pub fn halt(&mut self) {
        if self.running {
            self.generator.stop();
        }
        self.running = false;
        self.pending_stop = None;
        self.current = None;
    }
}
