//! Report sink
//!
//! Receives every finished `JobReport`. The server only ships a sink that
//! writes reports to the log.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use pulse_core::domain::outcome::{FetchOutcome, FetchResult};
use pulse_core::domain::report::JobReport;
use tracing::{info, warn};

/// Consumer of finished job reports
pub trait ReportSink: Send + Sync {
    fn accept(&self, report: JobReport);
}

/// Writes reports to the tracing log
///
/// Successful outcomes log at info, failures at warn. Run timestamps are
/// shown at a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct LogReportSink {
    offset: FixedOffset,
}

impl LogReportSink {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Default for LogReportSink {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl ReportSink for LogReportSink {
    fn accept(&self, report: JobReport) {
        info!(
            "[{}] --- Run {} ({} trigger) ---",
            format_timestamp(report.started_at, self.offset),
            report.run_id,
            report.trigger
        );

        for (idx, outcome) in report.outcomes.iter().enumerate() {
            log_outcome(&format!("target {}/{}", idx + 1, report.outcomes.len()), outcome);
        }

        if let Some(outcome) = &report.self_ping {
            log_outcome("self-ping", outcome);
        }

        info!(
            "--- Run {} finished: {} succeeded, {} failed, took {} ms ---",
            report.run_id,
            report.success_count(),
            report.failure_count(),
            report.duration().as_millis()
        );
    }
}

fn log_outcome(label: &str, outcome: &FetchOutcome) {
    let line = describe(outcome);
    if outcome.is_success() {
        info!("{}: {}", label, line);
    } else {
        warn!("{}: {}", label, line);
    }
}

fn format_timestamp(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S %:z")
        .to_string()
}

/// One-line rendering of an outcome
pub fn describe(outcome: &FetchOutcome) -> String {
    match &outcome.result {
        FetchResult::Success {
            status_code,
            status_text,
        } => format!("{} -> OK [{} {}]", outcome.target, status_code, status_text),
        FetchResult::Failure { kind, detail } => {
            format!("{} -> FAILED ({}): {}", outcome.target, kind, detail)
        }
    }
}
