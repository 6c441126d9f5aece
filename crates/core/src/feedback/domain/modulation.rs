//! Distance-to-signal curves. Closer objects speak faster and higher and
//! beep louder and higher; every curve is clamped.

/// Relative speech prosody for a nearest-object distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prosody {
    pub rate: f64,
    pub pitch: f64,
}

/// Oscillator target for the alarm tone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneParams {
    pub frequency_hz: f64,
    pub volume: f64,
}

pub const PITCH_RANGE: (f64, f64) = (0.8, 1.5);
pub const RATE_RANGE: (f64, f64) = (0.9, 1.3);
pub const FREQUENCY_RANGE_HZ: (f64, f64) = (400.0, 2000.0);
pub const VOLUME_RANGE: (f64, f64) = (0.04, 0.25);

/// Prosody of the fixed proximity warning phrase.
pub const WARNING_PROSODY: Prosody = Prosody {
    rate: 1.05,
    pitch: 1.3,
};

pub fn speech_prosody(distance_m: f64) -> Prosody {
    Prosody {
        rate: (1.2 - distance_m / 8.0).clamp(RATE_RANGE.0, RATE_RANGE.1),
        pitch: (1.6 - distance_m / 4.0).clamp(PITCH_RANGE.0, PITCH_RANGE.1),
    }
}

pub fn alarm_tone(distance_m: f64, critical_distance_m: f64) -> ToneParams {
    let closeness = (critical_distance_m - distance_m) / critical_distance_m;
    ToneParams {
        frequency_hz: (1200.0 - distance_m * 250.0).clamp(FREQUENCY_RANGE_HZ.0, FREQUENCY_RANGE_HZ.1),
        volume: (0.1 + closeness * 0.2).clamp(VOLUME_RANGE.0, VOLUME_RANGE.1),
    }
}
