//! Job report types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use super::outcome::FetchOutcome;

/// What asked for a run
///
/// Only used to label reports; both sources are handled identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerSource {
    Scheduled,
    Manual,
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerSource::Scheduled => f.write_str("scheduled"),
            TriggerSource::Manual => f.write_str("manual"),
        }
    }
}

/// Aggregate result of one job run
///
/// `outcomes` holds exactly one entry per configured target, in target
/// order. The self-ping outcome is kept apart and never counted as a
/// target outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub run_id: Uuid,
    pub trigger: TriggerSource,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<FetchOutcome>,
    pub self_ping: Option<FetchOutcome>,
}

impl JobReport {
    /// Wall-clock duration of the run, self-ping included
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    /// True when every target succeeded; the self-ping is not considered
    pub fn is_fully_successful(&self) -> bool {
        self.outcomes.iter().all(FetchOutcome::is_success)
    }
}
