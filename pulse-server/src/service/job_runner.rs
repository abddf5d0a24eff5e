//! Job runner
//!
//! Executes one full run:
//! - Spawns one fetch task per target, plus the self-ping if configured
//! - Waits for every task to settle; a failed target never cancels the others
//! - Collects outcomes in target order, not completion order
//!
//! A run cannot fail. Every branch resolves to an outcome, so the caller
//! always gets a complete report.

use chrono::Utc;
use pulse_client::Fetcher;
use pulse_core::domain::outcome::{FailureKind, FetchOutcome};
use pulse_core::domain::report::{JobReport, TriggerSource};
use pulse_core::domain::target::{Target, TargetList};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Runs the fetch job over a fixed target list
pub struct JobRunner {
    targets: Arc<TargetList>,
    self_ping: Option<Target>,
    fetcher: Arc<dyn Fetcher>,
}

impl JobRunner {
    pub fn new(
        targets: Arc<TargetList>,
        self_ping: Option<Target>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            targets,
            self_ping,
            fetcher,
        }
    }

    pub fn targets(&self) -> &TargetList {
        &self.targets
    }

    pub fn self_ping(&self) -> Option<&Target> {
        self.self_ping.as_ref()
    }

    /// Executes one run and returns its report
    pub async fn run(&self, trigger: TriggerSource) -> JobReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(
            "Run {} starting ({} trigger, {} target(s))",
            run_id,
            trigger,
            self.targets.len()
        );

        // Everything is spawned before anything is awaited
        let pending: Vec<(Target, JoinHandle<FetchOutcome>)> = self
            .targets
            .iter()
            .map(|target| (target.clone(), self.spawn_fetch(target.clone())))
            .collect();

        let self_ping = self
            .self_ping
            .clone()
            .map(|target| (target.clone(), self.spawn_fetch(target)));

        let mut outcomes = Vec::with_capacity(pending.len());
        for (target, handle) in pending {
            outcomes.push(Self::settle(target, handle).await);
        }

        let self_ping = match self_ping {
            Some((target, handle)) => Some(Self::settle(target, handle).await),
            None => None,
        };

        let finished_at = Utc::now();
        debug!("Run {} settled {} outcome(s)", run_id, outcomes.len());

        JobReport {
            run_id,
            trigger,
            started_at,
            finished_at,
            outcomes,
            self_ping,
        }
    }

    fn spawn_fetch(&self, target: Target) -> JoinHandle<FetchOutcome> {
        let fetcher = Arc::clone(&self.fetcher);
        tokio::spawn(async move { fetcher.fetch(&target).await })
    }

    /// Waits for a fetch task, turning a panicked task into a failure
    async fn settle(target: Target, handle: JoinHandle<FetchOutcome>) -> FetchOutcome {
        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Fetch task for {} failed: {}", target, e);
                FetchOutcome::failure(
                    target,
                    FailureKind::RequestSetupError,
                    format!("fetch task failed: {}", e),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{FakeFetcher, targets};
    use pulse_core::domain::outcome::{FetchResult, NO_RESPONSE_DETAIL};

    fn runner(urls: &[&str], self_ping: Option<&str>, fetcher: FakeFetcher) -> JobRunner {
        JobRunner::new(
            Arc::new(targets(urls)),
            self_ping.map(Target::new_unchecked),
            Arc::new(fetcher),
        )
    }

    fn urls(report: &JobReport) -> Vec<&str> {
        report.outcomes.iter().map(|o| o.target.url.as_str()).collect()
    }

    #[tokio::test]
    async fn test_outcomes_follow_target_order_not_completion_order() {
        let fetcher = FakeFetcher::new()
            .ok("https://slow.example", 300)
            .ok("https://fast.example", 10)
            .ok("https://medium.example", 100);
        let runner = runner(
            &[
                "https://slow.example",
                "https://fast.example",
                "https://medium.example",
            ],
            None,
            fetcher,
        );

        let report = runner.run(TriggerSource::Scheduled).await;

        assert_eq!(
            urls(&report),
            vec![
                "https://slow.example",
                "https://fast.example",
                "https://medium.example"
            ]
        );
        assert_eq!(report.trigger, TriggerSource::Scheduled);
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        let fetcher = Arc::new(
            FakeFetcher::new()
                .ok("https://a.example", 100)
                .ok("https://b.example", 100)
                .ok("https://c.example", 100),
        );
        let runner = JobRunner::new(
            Arc::new(targets(&[
                "https://a.example",
                "https://b.example",
                "https://c.example",
            ])),
            None,
            fetcher.clone(),
        );

        runner.run(TriggerSource::Manual).await;

        assert_eq!(fetcher.calls(), 3);
        assert_eq!(fetcher.max_in_flight(), 3);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_hide_the_others() {
        let fetcher = FakeFetcher::new()
            .ok("https://a.example", 50)
            .fail(
                "https://b.example",
                0,
                FailureKind::NoResponse,
                NO_RESPONSE_DETAIL,
            )
            .ok("https://c.example", 50);
        let runner = runner(
            &["https://a.example", "https://b.example", "https://c.example"],
            None,
            fetcher,
        );

        let report = runner.run(TriggerSource::Manual).await;

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes[0].is_success());
        assert_eq!(
            report.outcomes[1].failure_kind(),
            Some(FailureKind::NoResponse)
        );
        assert!(report.outcomes[2].is_success());
        assert_eq!(report.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_mixed_outcomes_scenario() {
        let fetcher = FakeFetcher::new()
            .ok("https://ok.example", 20)
            .fail(
                "https://timeout.example",
                40,
                FailureKind::NoResponse,
                NO_RESPONSE_DETAIL,
            )
            .fail(
                "https://500.example",
                0,
                FailureKind::RemoteError,
                "500/Internal Server Error",
            );
        let runner = runner(
            &[
                "https://ok.example",
                "https://timeout.example",
                "https://500.example",
            ],
            None,
            fetcher,
        );

        let report = runner.run(TriggerSource::Scheduled).await;
        let results: Vec<&FetchResult> = report.outcomes.iter().map(|o| &o.result).collect();

        assert_eq!(
            results,
            vec![
                &FetchResult::Success {
                    status_code: 200,
                    status_text: "OK".to_string()
                },
                &FetchResult::Failure {
                    kind: FailureKind::NoResponse,
                    detail: "no response received".to_string()
                },
                &FetchResult::Failure {
                    kind: FailureKind::RemoteError,
                    detail: "500/Internal Server Error".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_self_ping_failure_leaves_targets_untouched() {
        let fetcher = FakeFetcher::new()
            .ok("https://a.example", 10)
            .ok("https://b.example", 10)
            .fail(
                "https://self.example",
                30,
                FailureKind::NoResponse,
                NO_RESPONSE_DETAIL,
            );
        let runner = runner(
            &["https://a.example", "https://b.example"],
            Some("https://self.example"),
            fetcher,
        );

        let report = runner.run(TriggerSource::Scheduled).await;

        assert_eq!(report.outcomes.len(), 2);
        assert!(report.outcomes.iter().all(FetchOutcome::is_success));
        assert!(report.is_fully_successful());

        let self_ping = report.self_ping.expect("self-ping outcome");
        assert_eq!(self_ping.target.url, "https://self.example");
        assert_eq!(self_ping.failure_kind(), Some(FailureKind::NoResponse));
    }

    #[tokio::test]
    async fn test_no_self_ping_when_unconfigured() {
        let runner = runner(
            &["https://a.example"],
            None,
            FakeFetcher::new().ok("https://a.example", 0),
        );
        let report = runner.run(TriggerSource::Manual).await;
        assert!(report.self_ping.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_targets_are_fetched_separately() {
        let fetcher = Arc::new(FakeFetcher::new().ok("https://a.example", 10));
        let runner = JobRunner::new(
            Arc::new(targets(&["https://a.example", "https://a.example"])),
            None,
            fetcher.clone(),
        );

        let report = runner.run(TriggerSource::Manual).await;

        assert_eq!(urls(&report), vec!["https://a.example", "https://a.example"]);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_panicking_fetch_still_yields_an_outcome() {
        // The fake panics on unscripted URLs
        let fetcher = FakeFetcher::new()
            .ok("https://a.example", 10)
            .ok("https://c.example", 10);
        let runner = runner(
            &[
                "https://a.example",
                "https://unscripted.example",
                "https://c.example",
            ],
            None,
            fetcher,
        );

        let report = runner.run(TriggerSource::Manual).await;

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes[0].is_success());
        assert_eq!(report.outcomes[1].target.url, "https://unscripted.example");
        assert_eq!(
            report.outcomes[1].failure_kind(),
            Some(FailureKind::RequestSetupError)
        );
        assert!(report.outcomes[2].is_success());
    }
}
