//! Manual trigger handler

use axum::{extract::State, http::StatusCode};
use pulse_core::domain::report::TriggerSource;

use crate::api::AppState;
use crate::service::TriggerOutcome;

/// GET /run-manually
/// Runs the job now and waits for it to finish
///
/// Always answers 200: whether the run succeeded, partially failed or was
/// skipped is only visible in the logs and in the message text.
pub async fn run_manually(State(state): State<AppState>) -> (StatusCode, String) {
    tracing::info!("Manual trigger of fetch job requested");

    let message = match state.coordinator.trigger_run(TriggerSource::Manual).await {
        TriggerOutcome::Completed(summary) => format!(
            "Manual fetch job executed: {}/{} target(s) succeeded in {} ms. \
             Check server logs for details.",
            summary.succeeded,
            summary.total,
            summary.duration.as_millis()
        ),
        TriggerOutcome::Skipped => "A fetch job is already running, manual trigger skipped. \
             Check server logs for details."
            .to_string(),
        TriggerOutcome::Aborted(_) => {
            "Manual fetch job aborted unexpectedly. Check server logs for details.".to_string()
        }
    };

    (StatusCode::OK, message)
}
