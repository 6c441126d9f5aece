/// Distance reported for boxes whose width cannot be ranged.
pub const FAR_DISTANCE_M: f64 = 999.0;

/// Nearest distance assumed when an alarm is evaluated with no objects.
pub const FALLBACK_NEAREST_DISTANCE_M: f64 = 1.5;

pub const DEFAULT_MODEL_THRESHOLD: f64 = 0.3;
pub const DEFAULT_CRITICAL_DISTANCE_M: f64 = 2.0;
pub const DEFAULT_ANNOUNCE_DISTANCE_M: f64 = 3.5;
pub const DEFAULT_MAX_ANNOUNCEMENTS: usize = 2;

pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 350;
pub const DEFAULT_YIELD_INTERVAL_MS: u64 = 50;
pub const DEFAULT_SPEECH_GAP_MS: u64 = 1300;

pub const DEFAULT_TONE_RAMP_MS: u64 = 50;
/// Delay between the start of a fade-out and the oscillator stop (covers the ramp).
pub const DEFAULT_TONE_STOP_DELAY_MS: u64 = 150;

pub const DEFAULT_VIBRATION_PATTERN_MS: &[u32] = &[250, 100];

pub const DEFAULT_REFERENCE_WIDTH_PX: f64 = 160.0;
pub const DEFAULT_REFERENCE_REAL_WIDTH_M: f64 = 0.45;
pub const DEFAULT_REFERENCE_DIST_M: f64 = 1.0;

/// Classes worth describing to a walking user.
pub const IMPORTANT_CLASSES: &[&str] = &[
    "person",
    "car",
    "bus",
    "truck",
    "bicycle",
    "motorcycle",
    "dog",
    "cat",
    "chair",
    "bench",
    "bottle",
    "cup",
    "door",
    "stairs",
    "handbag",
    "backpack",
    "traffic light",
    "stop sign",
    "fire hydrant",
    "potted plant",
    "tv",
    "keyboard",
    "cell phone",
];

/// Classes that raise the proximity alarm inside the critical distance.
pub const HAZARD_CLASSES: &[&str] = &["person", "car", "bus", "truck", "motorcycle", "bicycle"];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const CONFIG_DIR_NAME: &str = "Sightline";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const NOTICE_STARTED: &str = "Detection started";
pub const NOTICE_STOPPED: &str = "Detection stopped";
pub const NOTICE_ALREADY_STOPPED: &str = "Already stopped";
pub const NOTICE_VOICE_READY: &str = "Voice ready. Say start detection or stop detection.";
pub const NOTICE_VOICE_UNSUPPORTED: &str = "Voice not supported on this device";
pub const NOTICE_VIBRATION_UNSUPPORTED: &str = "Vibration not supported on this device";
pub const NOTICE_CAMERA_UNAVAILABLE: &str = "Camera unavailable, detection not started";
pub const NOTICE_MODEL_UNAVAILABLE: &str = "Detection model failed to load";
pub const WARNING_PHRASE: &str = "Warning, object very near";
