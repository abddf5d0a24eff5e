//! Service layer
//!
//! Services contain the job logic of the server: fanning a run out over
//! every target, guarding the single execution slot, and handing finished
//! reports to a sink.
//!
//! Fetching and reporting sit behind traits so tests can swap them out.

mod coordinator;
mod job_runner;
mod report_sink;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{SlotStatus, TriggerCoordinator, TriggerOutcome};
pub use job_runner::JobRunner;
pub use report_sink::{LogReportSink, ReportSink};
