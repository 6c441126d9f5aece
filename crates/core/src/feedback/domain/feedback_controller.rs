use std::time::{Duration, Instant};

use super::modulation::{alarm_tone, speech_prosody, WARNING_PROSODY};
use super::speech_channel::SpeechChannel;
use super::speech_synthesizer::Utterance;
use super::tone_channel::ToneChannel;
use super::vibration_channel::{PulseOutcome, VibrationChannel};
use crate::alerting::domain::alert_arbitrator::ArbitrationDecision;
use crate::shared::constants::{NOTICE_VIBRATION_UNSUPPORTED, WARNING_PHRASE};

/// Renders arbitration decisions onto the speech, tone and vibration
/// channels. Sole owner of all channel state.
///
/// Nothing here blocks: the devices behind each channel are
/// fire-and-forget, and the tone's delayed stop is driven by [`poll`].
///
/// [`poll`]: FeedbackController::poll
pub struct FeedbackController {
    speech: SpeechChannel,
    tone: ToneChannel,
    vibration: VibrationChannel,
    critical_distance_m: f64,
}

impl FeedbackController {
    pub fn new(
        speech: SpeechChannel,
        tone: ToneChannel,
        vibration: VibrationChannel,
        critical_distance_m: f64,
    ) -> Self {
        Self {
            speech,
            tone,
            vibration,
            critical_distance_m,
        }
    }

    /// Drives all three channels from one cycle's decision.
    ///
    /// Returns the text actually spoken this cycle, if any.
    pub fn render(&mut self, decision: &ArbitrationDecision, now: Instant) -> Option<String> {
        let mut notice = None;
        if decision.alarm.is_alert() {
            self.tone.sound(alarm_tone(
                decision.nearest_distance_m,
                self.critical_distance_m,
            ));
            if self.vibration.pulse() == PulseOutcome::BecameUnavailable {
                notice = Some(NOTICE_VIBRATION_UNSUPPORTED);
            }
        } else {
            self.tone.fade_out(now);
        }

        match (guidance(decision), notice) {
            (Some(guide), Some(notice)) if self.speech.is_open(now) => {
                let combined =
                    Utterance::new(format!("{}. {notice}", guide.text), guide.rate, guide.pitch);
                self.speech.say_now(&combined, now);
                Some(combined.text)
            }
            (_, Some(notice)) => {
                self.speech.say_now(&Utterance::plain(notice), now);
                Some(notice.to_string())
            }
            (Some(guide), None) => self.speech.request(&guide, now).then_some(guide.text),
            (None, None) => None,
        }
    }

    /// Speaks a lifecycle notice immediately, cutting off guidance.
    pub fn notify(&mut self, text: &str, now: Instant) {
        log::info!("Notice: {text}");
        self.speech.say_now(&Utterance::plain(text), now);
    }

    /// Cancels speech and fades the tone out.
    pub fn silence(&mut self, now: Instant) {
        self.speech.cancel();
        self.tone.fade_out(now);
    }

    /// Advances timers; completes a pending tone stop.
    pub fn poll(&mut self, now: Instant) {
        self.tone.poll(now);
    }

    /// Time until the next channel timer fires, if one is pending.
    pub fn next_timer(&self, now: Instant) -> Option<Duration> {
        self.tone
            .stop_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Stops the tone at once. Speech already in flight is left to finish.
    pub fn shutdown(&mut self) {
        self.tone.halt();
    }

    pub fn tone_running(&self) -> bool {
        self.tone.is_running()
    }

    pub fn tone_stop_delay(&self) -> Duration {
        self.tone.stop_delay()
    }

    pub fn vibration_available(&self) -> bool {
        self.vibration.is_available()
    }

    pub fn last_spoken(&self) -> Option<&str> {
        self.speech.last_text()
    }
}

/// The cycle's guidance: announcements, or the bare warning when an alarm
/// has nothing else to say.
fn guidance(decision: &ArbitrationDecision) -> Option<Utterance> {
    if let Some(text) = decision.utterance() {
        let prosody = speech_prosody(decision.nearest_distance_m);
        Some(Utterance::new(text, prosody.rate, prosody.pitch))
    } else if decision.alarm.is_alert() {
        Some(Utterance::new(
            WARNING_PHRASE,
            WARNING_PROSODY.rate,
            WARNING_PROSODY.pitch,
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerting::domain::alarm_state::AlarmState;
    use crate::test_doubles::{
        RecordingHapticMotor, RecordingSynthesizer, RecordingToneGenerator, ToneEvent,
    };
    use approx::assert_relative_eq;

    struct Rig {
        controller: FeedbackController,
        synth: RecordingSynthesizer,
        tone: RecordingToneGenerator,
        motor: RecordingHapticMotor,
    }

    fn rig_with_motor(motor: RecordingHapticMotor) -> Rig {
        let synth = RecordingSynthesizer::default();
        let tone = RecordingToneGenerator::default();
        let controller = FeedbackController::new(
            SpeechChannel::new(Box::new(synth.clone()), Duration::from_millis(1300)),
            ToneChannel::new(
                Box::new(tone.clone()),
                Duration::from_millis(50),
                Duration::from_millis(150),
            ),
            VibrationChannel::new(Box::new(motor.clone()), vec![250, 100]),
            2.0,
        );
        Rig {
            controller,
            synth,
            tone,
            motor,
        }
    }

    fn rig() -> Rig {
        rig_with_motor(RecordingHapticMotor::default())
    }

    fn decision(announcements: &[&str], alarm: AlarmState, nearest: f64) -> ArbitrationDecision {
        ArbitrationDecision {
            announcements: announcements.iter().map(|s| s.to_string()).collect(),
            alarm,
            nearest_distance_m: nearest,
        }
    }

    #[test]
    fn test_alert_drives_all_three_channels() {
        let mut rig = rig();
        let spoken = rig.controller.render(
            &decision(&["person front at 0.5 meters"], AlarmState::Alert, 0.45),
            Instant::now(),
        );

        assert_eq!(spoken.as_deref(), Some("person front at 0.5 meters"));
        let utterance = &rig.synth.utterances()[0];
        assert_relative_eq!(utterance.rate, 1.14375, epsilon = 1e-9);
        assert_relative_eq!(utterance.pitch, 1.4875, epsilon = 1e-9);

        let events = rig.tone.events();
        assert_eq!(events[0], ToneEvent::Started);
        match events[1] {
            ToneEvent::Frequency(hz) => assert_relative_eq!(hz, 1087.5, epsilon = 1e-9),
            ref other => panic!("expected frequency change, got {other:?}"),
        }
        assert_eq!(rig.motor.patterns(), vec![vec![250, 100]]);
    }

    #[test]
    fn test_safe_cycle_fades_tone_without_vibration() {
        let mut rig = rig();
        let t0 = Instant::now();
        rig.controller
            .render(&decision(&[], AlarmState::Alert, 1.0), t0);
        rig.controller.render(&decision(&[], AlarmState::Safe, 1.5), t0);
        rig.controller.poll(t0 + Duration::from_millis(150));

        assert!(!rig.controller.tone_running());
        assert_eq!(rig.tone.events().last(), Some(&ToneEvent::Stopped));
        assert_eq!(rig.motor.attempts(), 1);
    }

    #[test]
    fn test_alert_without_announcements_speaks_warning() {
        let mut rig = rig();
        let spoken = rig
            .controller
            .render(&decision(&[], AlarmState::Alert, 1.0), Instant::now());
        assert_eq!(spoken.as_deref(), Some(WARNING_PHRASE));
        let utterance = &rig.synth.utterances()[0];
        assert_relative_eq!(utterance.rate, 1.05);
        assert_relative_eq!(utterance.pitch, 1.3);
    }

    #[test]
    fn test_two_announcements_joined_into_one_utterance() {
        let mut rig = rig();
        rig.controller.render(
            &decision(
                &["chair front at 0.8 meters", "bench left at 1.2 meters"],
                AlarmState::Safe,
                0.8,
            ),
            Instant::now(),
        );
        assert_eq!(
            rig.synth.spoken(),
            vec!["chair front at 0.8 meters, bench left at 1.2 meters"]
        );
    }

    #[test]
    fn test_guidance_rate_limited_across_cycles() {
        let mut rig = rig();
        let t0 = Instant::now();
        let d = decision(&["chair front at 0.8 meters"], AlarmState::Safe, 0.8);
        assert!(rig.controller.render(&d, t0).is_some());
        assert!(rig
            .controller
            .render(&d, t0 + Duration::from_millis(500))
            .is_none());
        assert_eq!(rig.synth.spoken().len(), 1);
    }

    #[test]
    fn test_missing_vibration_announced_once() {
        let mut rig = rig_with_motor(RecordingHapticMotor::unsupported());
        let t0 = Instant::now();
        let d = decision(&["person front at 0.5 meters"], AlarmState::Alert, 0.45);

        let first = rig.controller.render(&d, t0);
        assert_eq!(
            first.as_deref(),
            Some("person front at 0.5 meters. Vibration not supported on this device")
        );
        rig.controller.render(&d, t0 + Duration::from_secs(2));

        let notices = rig
            .synth
            .spoken()
            .iter()
            .filter(|s| s.contains(NOTICE_VIBRATION_UNSUPPORTED))
            .count();
        assert_eq!(notices, 1);
        assert_eq!(rig.motor.attempts(), 1);
        assert!(!rig.controller.vibration_available());
    }

    #[test]
    fn test_missing_vibration_inside_gap_speaks_notice_only() {
        let mut rig = rig_with_motor(RecordingHapticMotor::unsupported());
        let t0 = Instant::now();
        rig.controller.notify("Detection started", t0);

        let spoken = rig.controller.render(
            &decision(&["person front at 0.5 meters"], AlarmState::Alert, 0.45),
            t0 + Duration::from_millis(500),
        );
        assert_eq!(spoken.as_deref(), Some(NOTICE_VIBRATION_UNSUPPORTED));
        assert_eq!(
            rig.synth.spoken(),
            vec!["Detection started", NOTICE_VIBRATION_UNSUPPORTED]
        );
    }

    #[test]
    fn test_silence_cancels_speech_and_fades_tone() {
        let mut rig = rig();
        let t0 = Instant::now();
        rig.controller
            .render(&decision(&[], AlarmState::Alert, 1.0), t0);
        let cancels_before = rig.synth.cancel_count();

        rig.controller.silence(t0);
        assert_eq!(rig.synth.cancel_count(), cancels_before + 1);
        assert!(rig.controller.tone_running());
        rig.controller.poll(t0 + rig.controller.tone_stop_delay());
        assert!(!rig.controller.tone_running());
    }

    #[test]
    fn test_next_timer_follows_fade_out() {
        let mut rig = rig();
        let t0 = Instant::now();
        assert!(rig.controller.next_timer(t0).is_none());
        rig.controller
            .render(&decision(&[], AlarmState::Alert, 1.0), t0);
        rig.controller.render(&decision(&[], AlarmState::Safe, 1.5), t0);
        assert_eq!(
            rig.controller.next_timer(t0 + Duration::from_millis(100)),
            Some(Duration::from_millis(50))
        );
        rig.controller.shutdown();
        assert!(!rig.controller.tone_running());
        assert!(rig.controller.next_timer(t0).is_none());
    }

    #[test]
    fn test_notify_ignores_gap() {
        let mut rig = rig();
        let t0 = Instant::now();
        rig.controller.render(
            &decision(&["dog front at 1.0 meters"], AlarmState::Safe, 1.0),
            t0,
        );
        rig.controller.notify("Detection stopped", t0 + Duration::from_millis(10));
        assert_eq!(
            rig.synth.spoken(),
            vec!["dog front at 1.0 meters", "Detection stopped"]
        );
        assert_eq!(rig.controller.last_spoken(), Some("Detection stopped"));
    }
}
