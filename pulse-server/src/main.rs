//! Pulse Server
//!
//! Fetches a configured set of URLs on a cron schedule and logs a report of
//! every run.
//!
//! Architecture:
//! - Configuration: flags or environment variables, validated at startup
//! - Services: job runner (fan-out fetch), trigger coordinator (single
//!   execution slot), report sink (log output)
//! - Scheduler: cron loop firing scheduled triggers
//! - API: status page and manual trigger
//!
//! Invalid configuration stops the process before anything is scheduled.

mod api;
mod config;
mod schedule;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use pulse_client::HttpFetcher;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::AppState;
use crate::config::{Args, Config};
use crate::scheduler::CronScheduler;
use crate::service::{JobRunner, LogReportSink, TriggerCoordinator};

#[tokio::main]
async fn main() -> Result<()> {
    // Before logging so RUST_LOG can come from the file
    let env_file = config::load_dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pulse");
    if let Some(path) = &env_file {
        info!("Loaded environment from {}", path.display());
    }

    let config = match Config::from_args(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e).context("Refusing to start with invalid configuration");
        }
    };

    info!(
        "Loaded configuration: {} target(s), schedule=\"{}\", self_ping={}, fetch_timeout={:?}, log_offset={}",
        config.targets.len(),
        config.schedule.expression(),
        config.self_ping.as_ref().map_or("none", |t| t.url.as_str()),
        config.fetch_timeout,
        config.log_offset
    );
    for target in &config.targets {
        info!("  - {}", target);
    }

    let fetcher = HttpFetcher::new(config.fetch_timeout).context("Failed to build HTTP client")?;

    let runner = JobRunner::new(
        Arc::new(config.targets.clone()),
        config.self_ping.clone(),
        Arc::new(fetcher),
    );
    let coordinator = Arc::new(TriggerCoordinator::new(
        Arc::new(runner),
        Arc::new(LogReportSink::new(config.log_offset)),
    ));

    info!("Services initialized");

    let app = api::create_router(AppState {
        coordinator: Arc::clone(&coordinator),
        schedule: Arc::from(config.schedule.expression()),
    });

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Only start firing once the listener is up
    let scheduler = CronScheduler::new(config.schedule.clone(), coordinator);
    let scheduler_handle = tokio::spawn(async move { scheduler.run().await });

    info!("Server listening on {}", addr);
    info!("Visit http://localhost:{} to check server status", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    scheduler_handle.abort();
    info!("Pulse stopped");

    Ok(())
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
