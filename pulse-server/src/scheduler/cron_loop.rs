//! Cron loop
//!
//! Sleeps until the next fire time, then triggers a run on its own task so
//! a slow run never delays later ticks. Ticks that land while a run is in
//! progress are skipped by the coordinator.

use chrono::{DateTime, Utc};
use pulse_core::domain::report::TriggerSource;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::schedule::Schedule;
use crate::service::{TriggerCoordinator, TriggerOutcome};

/// Drives scheduled runs
pub struct CronScheduler {
    schedule: Schedule,
    coordinator: Arc<TriggerCoordinator>,
}

impl CronScheduler {
    pub fn new(schedule: Schedule, coordinator: Arc<TriggerCoordinator>) -> Self {
        Self {
            schedule,
            coordinator,
        }
    }

    /// Runs until the schedule has no further fire times
    pub async fn run(&self) {
        info!(
            "Starting scheduler (schedule: \"{}\", UTC)",
            self.schedule.expression()
        );

        let mut last_fired: Option<DateTime<Utc>> = None;

        loop {
            let now = Utc::now();
            let Some(next) = self.next_fire(now, last_fired) else {
                warn!("Schedule has no upcoming fire times, scheduler stopping");
                return;
            };

            debug!("Next scheduled run at {}", next);

            let wait = (next - now).to_std().unwrap_or_default();
            time::sleep(wait).await;

            last_fired = Some(next);
            self.fire();
        }
    }

    /// Next fire time after both `now` and the last fired tick
    ///
    /// The wall clock can lag the timer slightly, so the last tick is
    /// excluded explicitly to avoid firing it twice.
    fn next_fire(
        &self,
        now: DateTime<Utc>,
        last_fired: Option<DateTime<Utc>>,
    ) -> Option<DateTime<Utc>> {
        let from = match last_fired {
            Some(last) if last > now => last,
            _ => now,
        };
        self.schedule.next_after(&from)
    }

    /// Triggers a run without waiting for it
    fn fire(&self) -> JoinHandle<()> {
        let coordinator = Arc::clone(&self.coordinator);

        tokio::spawn(async move {
            debug!("Scheduled trigger fired");
            match coordinator.trigger_run(TriggerSource::Scheduled).await {
                TriggerOutcome::Completed(_) => {}
                TriggerOutcome::Skipped => {
                    info!("Scheduled run skipped: previous run still in progress")
                }
                TriggerOutcome::Aborted(reason) => warn!("Scheduled run aborted: {}", reason),
            }
        })
    }
}
