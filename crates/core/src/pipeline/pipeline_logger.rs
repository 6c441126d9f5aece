use std::collections::HashMap;
use std::time::Instant;

use crate::alerting::domain::alarm_state::AlarmState;
use crate::alerting::domain::alert_arbitrator::ArbitrationDecision;
use crate::perception::domain::scored_object::ScoredObject;

/// Everything one detection cycle produced, for status display.
#[derive(Clone, Debug)]
pub struct CycleReport {
    /// 1-based cycle number within the session.
    pub cycle: usize,
    /// Raw detections before filtering.
    pub detections: usize,
    pub objects: Vec<ScoredObject>,
    pub decision: ArbitrationDecision,
    /// Text handed to the speech channel this cycle, if any.
    pub spoken: Option<String>,
}

/// Observer for detection-loop events.
///
/// Stands where a visual overlay would: it receives every cycle's objects
/// and decision and is cleared when detection stops. Keeps status output
/// out of the loop itself.
pub trait PipelineLogger: Send {
    /// Report one completed cycle.
    fn cycle(&mut self, report: &CycleReport);

    /// Record how long a named stage took in one cycle.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. object count).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Mark the start of a detection session. Default: no-op.
    fn begin(&mut self, _now: Instant) {}

    /// Drop per-session display state. Default: no-op.
    fn clear(&mut self) {}

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events. Used where status output is irrelevant.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn cycle(&mut self, _report: &CycleReport) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger that writes cycle status through the `log` facade and aggregates
/// per-stage timing for a session summary.
///
/// Per-object lines go to `debug`; alarm transitions go to `info`, as does
/// a status line every `throttle_cycles` cycles.
pub struct LogPipelineLogger {
    throttle_cycles: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    cycles: usize,
    alarms: usize,
    last_alarm: AlarmState,
    messages: Vec<String>,
}

impl LogPipelineLogger {
    pub fn new(throttle_cycles: usize) -> Self {
        Self {
            throttle_cycles: throttle_cycles.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            cycles: 0,
            alarms: 0,
            last_alarm: AlarmState::Safe,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no cycle ran.
    pub fn summary_string(&self) -> Option<String> {
        if self.cycles == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let cycles = self.cycles;
        let mut lines = Vec::new();

        lines.push(format!(
            "Session summary ({cycles} cycles, {} alarm cycles, {:.1}s total):",
            self.alarms,
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = average(durations);
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            lines.push(format!("  {name}: avg {:.1}", average(&self.metrics[name])));
        }

        if elapsed_ms > 0.0 {
            let rate = cycles as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Cycle rate: {rate:.1}/s"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn cycle(&mut self, report: &CycleReport) {
        self.cycles += 1;
        let alarm = report.decision.alarm;
        if alarm.is_alert() {
            self.alarms += 1;
        }

        for object in &report.objects {
            log::debug!(
                "  {} {:.2} {} {:.1}m{}",
                object.class_name(),
                object.detection.score,
                object.position,
                object.distance_m,
                if object.hazard { " hazard" } else { "" }
            );
        }
        if alarm != self.last_alarm {
            log::info!(
                "Alarm {} (nearest {:.1}m)",
                alarm,
                report.decision.nearest_distance_m
            );
            self.last_alarm = alarm;
        }
        if let Some(text) = &report.spoken {
            log::info!("Said: {text}");
        }
        if report.cycle % self.throttle_cycles == 0 {
            log::info!(
                "Cycle {}: {} detections, {} objects, {}",
                report.cycle,
                report.detections,
                report.objects.len(),
                alarm
            );
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn begin(&mut self, now: Instant) {
        self.start_time = now;
    }

    fn clear(&mut self) {
        self.timings.clear();
        self.metrics.clear();
        self.messages.clear();
        self.cycles = 0;
        self.alarms = 0;
        self.last_alarm = AlarmState::Safe;
        self.start_time = Instant::now();
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
