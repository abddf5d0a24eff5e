//! Scheduler layer
//!
//! Fires the trigger coordinator at the times derived from the configured
//! cron schedule.

pub mod cron_loop;

pub use cron_loop::CronScheduler;
