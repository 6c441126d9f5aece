use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use sightline_core::camera::infrastructure::image_sequence_camera::ImageSequenceCamera;
use sightline_core::feedback::domain::speech_synthesizer::SpeechSynthesizer;
use sightline_core::feedback::infrastructure::command_speech_synthesizer::{
    CommandSpeechSynthesizer, DEFAULT_TTS_PROGRAM,
};
use sightline_core::feedback::infrastructure::log_speech_synthesizer::LogSpeechSynthesizer;
use sightline_core::feedback::infrastructure::log_tone_generator::LogToneGenerator;
use sightline_core::feedback::infrastructure::unavailable_haptic_motor::UnavailableHapticMotor;
use sightline_core::perception::domain::object_detector::ObjectDetector;
use sightline_core::perception::infrastructure::deferred_detector::DeferredDetector;
#[cfg(feature = "onnx")]
use sightline_core::perception::infrastructure::onnx_coco_detector::{
    OnnxCocoDetector, DEFAULT_CONFIDENCE,
};
use sightline_core::perception::infrastructure::replay_detector::ReplayDetector;
use sightline_core::pipeline::detection_loop::{DetectionLoop, LoopTiming, StartOutcome};
use sightline_core::pipeline::pipeline_logger::LogPipelineLogger;
use sightline_core::pipeline::voice_command_supervisor::{SupervisorExit, VoiceCommandSupervisor};
use sightline_core::shared::assist_config::AssistConfig;
use sightline_core::voice::infrastructure::line_recognizer::LineRecognizer;

/// Spoken, tonal and haptic proximity warnings from a camera feed.
///
/// Voice commands are read from stdin, one utterance per line: say
/// "start detection", "stop detection" or "pause". End of input ends the run.
#[derive(Parser)]
#[command(name = "sightline")]
struct Cli {
    /// Directory of images replayed as the camera feed.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// JSON-lines file of recorded detections, one array per cycle.
    #[arg(long)]
    detections: Option<PathBuf>,

    /// YOLO COCO ONNX model to run on each frame.
    #[cfg(feature = "onnx")]
    #[arg(long, conflicts_with = "detections")]
    model: Option<PathBuf>,

    /// Config file (default: <config dir>/Sightline/config.json if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum detection confidence (0.0-1.0).
    #[arg(long)]
    threshold: Option<f64>,

    /// Distance in metres at which hazards raise the alarm.
    #[arg(long)]
    critical_distance: Option<f64>,

    /// Distance in metres within which objects are announced.
    #[arg(long)]
    announce_distance: Option<f64>,

    /// Minimum milliseconds between detection cycles.
    #[arg(long)]
    frame_interval_ms: Option<u64>,

    /// Text-to-speech program (espeak-compatible arguments).
    #[arg(long, default_value = DEFAULT_TTS_PROGRAM)]
    tts: String,

    /// Write speech to the log instead of a TTS program.
    #[arg(long)]
    no_tts: bool,

    /// Ignore stdin; detection is controlled by --autostart and --duration only.
    #[arg(long)]
    no_voice: bool,

    /// Start detecting immediately.
    #[arg(long)]
    autostart: bool,

    /// Stop after this many seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }
    validate(&cli)?;

    let frames = cli
        .frames
        .clone()
        .ok_or("--frames DIR is required as the camera source")?;
    let feedback = config.feedback_controller(
        build_synthesizer(&cli),
        Box::new(LogToneGenerator::new()),
        Box::new(UnavailableHapticMotor),
    );
    let detection_loop = DetectionLoop::new(
        Box::new(ImageSequenceCamera::new(frames)),
        build_detector(&cli)?,
        config.perception_filter(),
        config.alert_arbitrator(),
        feedback,
        Box::new(LogPipelineLogger::default()),
        LoopTiming::from(&config),
    );
    let (handle, loop_thread) = detection_loop.spawn()?;

    let cancelled = Arc::new(AtomicBool::new(false));
    let voice_thread = if cli.no_voice {
        None
    } else {
        let recognizer = LineRecognizer::new(BufReader::new(io::stdin()));
        let supervisor =
            VoiceCommandSupervisor::new(Box::new(recognizer), handle.clone(), cancelled.clone());
        Some(supervisor.spawn()?)
    };

    if cli.autostart {
        match handle.start()? {
            StartOutcome::Refused(reason) => log::warn!("Autostart refused: {reason}"),
            outcome => log::debug!("Autostart: {outcome:?}"),
        }
    }

    match (cli.duration, voice_thread) {
        (Some(seconds), _) => {
            std::thread::sleep(Duration::from_secs_f64(seconds));
            log::info!("Run time of {seconds}s elapsed");
        }
        (None, Some(voice_thread)) => {
            let exit = voice_thread
                .join()
                .map_err(|_| "Voice supervisor panicked")?;
            if exit == SupervisorExit::Unsupported {
                log::warn!("Voice control unavailable");
            }
        }
        (None, None) => {
            log::info!("Running until interrupted");
            return loop_thread
                .join()
                .map_err(|_| "Detection loop panicked".into());
        }
    }

    cancelled.store(true, Ordering::Relaxed);
    // Fails only when the loop already exited.
    let _ = handle.shutdown();
    loop_thread
        .join()
        .map_err(|_| "Detection loop panicked")?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AssistConfig, Box<dyn std::error::Error>> {
    let mut config = AssistConfig::load(cli.config.as_deref())?;
    if let Some(threshold) = cli.threshold {
        config.model_threshold = threshold;
    }
    if let Some(critical) = cli.critical_distance {
        config.critical_distance_m = critical;
    }
    if let Some(announce) = cli.announce_distance {
        config.announce_distance_m = announce;
    }
    if let Some(interval) = cli.frame_interval_ms {
        config.frame_interval_ms = interval;
    }
    config.validate()?;
    Ok(config)
}

fn build_synthesizer(cli: &Cli) -> Box<dyn SpeechSynthesizer> {
    if cli.no_tts {
        return Box::new(LogSpeechSynthesizer);
    }
    if CommandSpeechSynthesizer::probe(&cli.tts) {
        log::info!("Speaking through {}", cli.tts);
        Box::new(CommandSpeechSynthesizer::new(cli.tts.clone()))
    } else {
        log::warn!("{} not available, speech goes to the log", cli.tts);
        Box::new(LogSpeechSynthesizer)
    }
}

type LoadResult = Result<Box<dyn ObjectDetector>, Box<dyn std::error::Error>>;

/// The detector is loaded when detection first starts, so a missing or
/// broken model is reported to the user instead of aborting the program.
fn build_detector(cli: &Cli) -> Result<Box<dyn ObjectDetector>, Box<dyn std::error::Error>> {
    #[cfg(feature = "onnx")]
    if let Some(model) = cli.model.clone() {
        return Ok(Box::new(DeferredDetector::new(Box::new(move || -> LoadResult {
            let detector: Box<dyn ObjectDetector> =
                Box::new(OnnxCocoDetector::new(&model, DEFAULT_CONFIDENCE)?);
            Ok(detector)
        }))));
    }

    let path = cli
        .detections
        .clone()
        .ok_or("A detection source is required: --detections FILE")?;
    Ok(Box::new(DeferredDetector::new(Box::new(move || -> LoadResult {
        let detector: Box<dyn ObjectDetector> = Box::new(ReplayDetector::open(&path)?);
        Ok(detector)
    }))))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(seconds) = cli.duration {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(format!("Duration must be a positive number of seconds, got {seconds}").into());
        }
    }
    if cli.no_voice && cli.duration.is_none() && !cli.autostart {
        return Err("--no-voice needs --autostart, or nothing would ever start detection".into());
    }
    Ok(())
}
