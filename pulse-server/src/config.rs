//! Server configuration
//!
//! Every option can be given as a command-line flag or through its
//! environment variable. A `.env` file is loaded first; variables already
//! set in the environment take precedence over it. Raw arguments are
//! validated into a `Config` before anything is scheduled or bound.

use chrono::{FixedOffset, Offset, Utc};
use clap::Parser;
use pulse_core::ConfigError;
use pulse_core::domain::target::{Target, TargetList};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::schedule::Schedule;

/// Raw command-line / environment arguments
#[derive(Debug, Clone, Parser)]
#[command(name = "pulse")]
#[command(about = "Fetches a set of URLs on a cron schedule and logs the outcome", long_about = None)]
pub struct Args {
    /// Comma-separated list of URLs to fetch on every run
    #[arg(long, env = "URL_TO_FETCH")]
    pub url_to_fetch: String,

    /// Cron expression, 5 fields (min hour dom mon dow) or 6 with seconds first
    #[arg(long, env = "CRON_SCHEDULE")]
    pub cron_schedule: String,

    /// The service's own public URL, fetched alongside the targets on every
    /// run to keep it warm
    #[arg(long, env = "FETCH_OWN")]
    pub fetch_own: Option<String>,

    /// Port for the status and manual-trigger endpoints
    #[arg(long, env = "PORT", default_value_t = 3002)]
    pub port: u16,

    /// Address to bind the HTTP listener to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: IpAddr,

    /// Per-request timeout in seconds, 0 disables it
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// UTC offset for report timestamps, e.g. "+02:00" or "UTC"
    #[arg(long, env = "LOG_UTC_OFFSET", default_value = "+00:00")]
    pub log_utc_offset: String,
}

/// Validated server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub targets: TargetList,
    pub schedule: Schedule,
    pub self_ping: Option<Target>,
    pub port: u16,
    pub bind_addr: IpAddr,
    /// `None` leaves the transport without a timeout
    pub fetch_timeout: Option<Duration>,
    pub log_offset: FixedOffset,
}

/// Loads `.env` from the working directory or one of its parents
///
/// Returns the path of the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    load_env_file(".env")
}

fn load_env_file(name: impl AsRef<Path>) -> Option<PathBuf> {
    dotenvy::from_filename(name).ok()
}

/// Parses "+HH:MM", "-HH:MM", "Z" or "UTC"
fn parse_log_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("utc") || value.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }
    value
        .parse::<FixedOffset>()
        .map_err(|e| ConfigError::InvalidLogOffset {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

impl Config {
    /// Validates raw arguments
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let targets = TargetList::parse(&args.url_to_fetch)?;
        let schedule = Schedule::parse(&args.cron_schedule)?;

        let self_ping = match args.fetch_own.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(url) => Some(Target::parse(url).map_err(|reason| {
                ConfigError::InvalidSelfPingUrl {
                    url: url.to_string(),
                    reason,
                }
            })?),
        };

        let fetch_timeout = match args.fetch_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let log_offset = parse_log_offset(&args.log_utc_offset)?;

        Ok(Self {
            targets,
            schedule,
            self_ping,
            port: args.port,
            bind_addr: args.bind_addr,
            fetch_timeout,
            log_offset,
        })
    }
}
