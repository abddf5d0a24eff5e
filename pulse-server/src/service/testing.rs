//! Test doubles for the service layer

use async_trait::async_trait;
use pulse_client::Fetcher;
use pulse_core::domain::outcome::{FailureKind, FetchOutcome, FetchResult};
use pulse_core::domain::report::JobReport;
use pulse_core::domain::target::{Target, TargetList};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::report_sink::ReportSink;

/// Fetcher answering from a script of per-URL delays and results
///
/// Panics on URLs that were never scripted.
#[derive(Default)]
pub(crate) struct FakeFetcher {
    script: HashMap<String, (Duration, FetchResult)>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(self, url: &str, delay_ms: u64) -> Self {
        self.respond(
            url,
            delay_ms,
            FetchResult::Success {
                status_code: 200,
                status_text: "OK".to_string(),
            },
        )
    }

    pub fn fail(self, url: &str, delay_ms: u64, kind: FailureKind, detail: &str) -> Self {
        self.respond(
            url,
            delay_ms,
            FetchResult::Failure {
                kind,
                detail: detail.to_string(),
            },
        )
    }

    pub fn respond(mut self, url: &str, delay_ms: u64, result: FetchResult) -> Self {
        self.script
            .insert(url.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, target: &Target) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = self
            .script
            .get(&target.url)
            .cloned()
            .unwrap_or_else(|| panic!("unscripted target {}", target.url));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        FetchOutcome {
            target: target.clone(),
            result,
        }
    }
}

/// Sink keeping every report it receives
#[derive(Default)]
pub(crate) struct MemorySink {
    reports: Mutex<Vec<JobReport>>,
}

impl MemorySink {
    pub fn reports(&self) -> Vec<JobReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl ReportSink for MemorySink {
    fn accept(&self, report: JobReport) {
        self.reports.lock().unwrap().push(report);
    }
}

pub(crate) fn targets(urls: &[&str]) -> TargetList {
    TargetList::from_targets(urls.iter().map(|u| Target::new_unchecked(*u)).collect()).unwrap()
}
