use std::collections::HashMap;
use std::time::Instant;

use crate::shared::error::PipelineWarning;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Decouples use cases from specific output mechanisms (log crate, test
/// recorders) so each caller can observe pipeline behavior without changing
/// the orchestration code.
pub trait PipelineLogger {
    /// Report item-level progress (images written, samples extracted, ...).
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named pipeline stage took for one item.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Report a skipped item.
    fn warning(&mut self, warning: &PipelineWarning);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-pipeline summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn warning(&mut self, _warning: &PipelineWarning) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger that forwards to the `log` crate, tracks per-stage
/// timing and prints a summary report at pipeline completion.
///
/// Progress output is throttled to every `throttle` items.
pub struct LogPipelineLogger {
    throttle: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_items: usize,
    warnings: usize,
}

impl LogPipelineLogger {
    pub fn new(throttle: usize) -> Self {
        Self {
            throttle: throttle.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
            total_items: 0,
            warnings: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.warnings == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = Vec::new();

        lines.push(format!(
            "Pipeline summary ({} items, {:.1}s total):",
            self.total_items,
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        if self.warnings > 0 {
            lines.push(format!("  Skipped: {}", self.warnings));
        }

        Some(lines.join("\n"))
    }

    /// Returns the timing data for a given stage.
    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_items = total;
        if total > 0 && (current % self.throttle == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processing: {current}/{total} ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn warning(&mut self, warning: &PipelineWarning) {
        self.warnings += 1;
        log::warn!("{warning}");
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn decode_warning() -> PipelineWarning {
        PipelineWarning::Decode {
            path: PathBuf::from("b.png"),
            reason: "truncated".to_string(),
        }
    }

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("decode", 5.0);
        logger.warning(&decode_warning());
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = LogPipelineLogger::new(10);
        logger.timing("decode", 20.0);
        logger.timing("decode", 30.0);
        logger.timing("encode", 5.0);

        let decode = logger.timings_for("decode").unwrap();
        assert_eq!(decode.len(), 2);
        assert!((decode[0] - 20.0).abs() < f64::EPSILON);
        assert!((decode[1] - 30.0).abs() < f64::EPSILON);

        let encode = logger.timings_for("encode").unwrap();
        assert_eq!(encode.len(), 1);
    }

    #[test]
    fn test_summary_includes_stages() {
        let mut logger = LogPipelineLogger::new(10);
        logger.progress(3, 3);
        logger.timing("decode", 20.0);
        logger.timing("encode", 5.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Pipeline summary (3 items"));
        assert!(summary.contains("decode"));
        assert!(summary.contains("encode"));
        assert!(!summary.contains("Skipped"));
    }

    #[test]
    fn test_summary_counts_warnings() {
        let mut logger = LogPipelineLogger::new(10);
        logger.warning(&decode_warning());
        logger.warning(&decode_warning());

        assert_eq!(logger.warning_count(), 2);
        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Skipped: 2"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = LogPipelineLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_total() {
        let mut logger = LogPipelineLogger::new(10);
        for i in 1..=20 {
            logger.progress(i, 20);
        }
        assert_eq!(logger.total_items, 20);
    }

    #[test]
    fn test_default_throttle() {
        let logger = LogPipelineLogger::default();
        assert_eq!(logger.throttle, 10);
    }
}
