use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alerting::domain::alert_arbitrator::AlertArbitrator;
use crate::feedback::domain::feedback_controller::FeedbackController;
use crate::feedback::domain::haptic_motor::HapticMotor;
use crate::feedback::domain::speech_channel::SpeechChannel;
use crate::feedback::domain::speech_synthesizer::SpeechSynthesizer;
use crate::feedback::domain::tone_channel::ToneChannel;
use crate::feedback::domain::tone_generator::ToneGenerator;
use crate::feedback::domain::vibration_channel::VibrationChannel;
use crate::perception::domain::calibration_model::CalibrationModel;
use crate::perception::domain::class_table::{default_rules, ClassRule, ClassTable};
use crate::perception::domain::perception_filter::PerceptionFilter;
use crate::shared::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ANNOUNCE_DISTANCE_M, DEFAULT_CRITICAL_DISTANCE_M,
    DEFAULT_FRAME_INTERVAL_MS, DEFAULT_MAX_ANNOUNCEMENTS, DEFAULT_MODEL_THRESHOLD,
    DEFAULT_SPEECH_GAP_MS, DEFAULT_TONE_RAMP_MS, DEFAULT_TONE_STOP_DELAY_MS,
    DEFAULT_VIBRATION_PATTERN_MS, DEFAULT_YIELD_INTERVAL_MS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunable parameters of the assist pipeline.
///
/// Every field has a default, so a config file only needs the values it
/// changes. Loaded once at startup; nothing is written back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    pub model_threshold: f64,
    pub critical_distance_m: f64,
    pub announce_distance_m: f64,
    pub max_announcements: usize,
    pub frame_interval_ms: u64,
    pub yield_interval_ms: u64,
    pub speech_gap_ms: u64,
    pub tone_ramp_ms: u64,
    pub tone_stop_delay_ms: u64,
    pub vibration_pattern_ms: Vec<u32>,
    pub calibration: CalibrationModel,
    pub classes: Vec<ClassRule>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            model_threshold: DEFAULT_MODEL_THRESHOLD,
            critical_distance_m: DEFAULT_CRITICAL_DISTANCE_M,
            announce_distance_m: DEFAULT_ANNOUNCE_DISTANCE_M,
            max_announcements: DEFAULT_MAX_ANNOUNCEMENTS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            yield_interval_ms: DEFAULT_YIELD_INTERVAL_MS,
            speech_gap_ms: DEFAULT_SPEECH_GAP_MS,
            tone_ramp_ms: DEFAULT_TONE_RAMP_MS,
            tone_stop_delay_ms: DEFAULT_TONE_STOP_DELAY_MS,
            vibration_pattern_ms: DEFAULT_VIBRATION_PATTERN_MS.to_vec(),
            calibration: CalibrationModel::default(),
            classes: default_rules(),
        }
    }
}

impl AssistConfig {
    /// `<config dir>/Sightline/config.json` for the current user.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads from `explicit` if given, else from [`default_path`] when that
    /// file exists, else returns the defaults. The result is validated.
    ///
    /// [`default_path`]: AssistConfig::default_path
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };
        let config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.model_threshold) {
            return Err(ConfigError::Invalid(format!(
                "model_threshold must be within [0, 1], got {}",
                self.model_threshold
            )));
        }
        for (name, value) in [
            ("critical_distance_m", self.critical_distance_m),
            ("announce_distance_m", self.announce_distance_m),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.max_announcements == 0 {
            return Err(ConfigError::Invalid(
                "max_announcements must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("frame_interval_ms", self.frame_interval_ms),
            ("yield_interval_ms", self.yield_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be non-zero")));
            }
        }
        if !self.calibration.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "calibration values must all be positive, got {:?}",
                self.calibration
            )));
        }
        if self.classes.is_empty() {
            return Err(ConfigError::Invalid("class table is empty".to_string()));
        }
        if self.vibration_pattern_ms.is_empty() {
            return Err(ConfigError::Invalid(
                "vibration_pattern_ms must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn class_table(&self) -> ClassTable {
        ClassTable::from_rules(&self.classes)
    }

    pub fn perception_filter(&self) -> PerceptionFilter {
        PerceptionFilter::new(self.model_threshold, self.class_table(), self.calibration)
    }

    pub fn alert_arbitrator(&self) -> AlertArbitrator {
        AlertArbitrator::new(
            self.announce_distance_m,
            self.critical_distance_m,
            self.max_announcements,
        )
    }

    /// Wires the three output devices into channels with the configured
    /// gap, ramp, stop delay and vibration pattern.
    pub fn feedback_controller(
        &self,
        synthesizer: Box<dyn SpeechSynthesizer>,
        tone: Box<dyn ToneGenerator>,
        motor: Box<dyn HapticMotor>,
    ) -> FeedbackController {
        FeedbackController::new(
            SpeechChannel::new(synthesizer, self.speech_gap()),
            ToneChannel::new(tone, self.tone_ramp(), self.tone_stop_delay()),
            VibrationChannel::new(motor, self.vibration_pattern_ms.clone()),
            self.critical_distance_m,
        )
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn yield_interval(&self) -> Duration {
        Duration::from_millis(self.yield_interval_ms)
    }

    pub fn speech_gap(&self) -> Duration {
        Duration::from_millis(self.speech_gap_ms)
    }

    pub fn tone_ramp(&self) -> Duration {
        Duration::from_millis(self.tone_ramp_ms)
    }

    pub fn tone_stop_delay(&self) -> Duration {
        Duration::from_millis(self.tone_stop_delay_ms)
    }
}
