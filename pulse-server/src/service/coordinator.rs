//! Trigger coordinator
//!
//! Owns the single execution slot shared by the cron scheduler and the
//! manual-trigger endpoint. A trigger that arrives while a run is in
//! progress is skipped, never queued and never run alongside.
//!
//! The run itself executes on its own task. A caller that stops waiting
//! does not cancel it, and the slot is released when that task ends.

use pulse_core::domain::report::{JobReport, TriggerSource};
use pulse_core::domain::target::{Target, TargetList};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::service::{JobRunner, ReportSink};

/// State of the execution slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotStatus {
    Idle,
    Running,
}

/// Short summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl From<&JobReport> for RunSummary {
    fn from(report: &JobReport) -> Self {
        Self {
            run_id: report.run_id,
            total: report.outcomes.len(),
            succeeded: report.success_count(),
            failed: report.failure_count(),
            duration: report.duration(),
        }
    }
}

/// What happened to a trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The run finished and its report went to the sink
    Completed(RunSummary),
    /// Another run held the slot
    Skipped,
    /// The run task panicked; the slot has been released
    Aborted(String),
}

/// Serializes runs coming from any trigger source
pub struct TriggerCoordinator {
    runner: Arc<JobRunner>,
    sink: Arc<dyn ReportSink>,
    /// Single permit; held by the run task for the duration of a run
    slot: Arc<Semaphore>,
}

impl TriggerCoordinator {
    pub fn new(runner: Arc<JobRunner>, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            runner,
            sink,
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Runs the job unless a run is already in progress
    ///
    /// Resolves once the run has finished and its report has been handed
    /// to the sink, or immediately with `Skipped`.
    pub async fn trigger_run(&self, source: TriggerSource) -> TriggerOutcome {
        let Ok(permit) = Arc::clone(&self.slot).try_acquire_owned() else {
            warn!("{} trigger skipped: a run is already in progress", source);
            return TriggerOutcome::Skipped;
        };

        let runner = Arc::clone(&self.runner);
        let sink = Arc::clone(&self.sink);

        let handle = tokio::spawn(async move {
            // Released when the task ends, panics included
            let _permit = permit;
            let report = runner.run(source).await;
            let summary = RunSummary::from(&report);
            sink.accept(report);
            summary
        });

        match handle.await {
            Ok(summary) => {
                info!(
                    "Run {} complete: {}/{} target(s) succeeded, {} failed",
                    summary.run_id, summary.succeeded, summary.total, summary.failed
                );
                TriggerOutcome::Completed(summary)
            }
            Err(e) => {
                error!("Run task for {} trigger failed: {}", source, e);
                TriggerOutcome::Aborted(e.to_string())
            }
        }
    }

    pub fn status(&self) -> SlotStatus {
        if self.slot.available_permits() == 0 {
            SlotStatus::Running
        } else {
            SlotStatus::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.status() == SlotStatus::Running
    }

    pub fn targets(&self) -> &TargetList {
        self.runner.targets()
    }

    pub fn self_ping(&self) -> Option<&Target> {
        self.runner.self_ping()
    }
}
