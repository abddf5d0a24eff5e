//! Status handlers
//!
//! Read-only views of the configuration and the execution slot.

use axum::{Json, extract::State, response::Html};
use serde::Serialize;

use crate::api::AppState;
use crate::service::SlotStatus;

/// GET /
/// Human-readable page confirming the scheduler is active
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let targets = state.coordinator.targets();

    let items: String = targets
        .iter()
        .map(|t| format!("<li><code>{}</code></li>", escape_html(&t.url)))
        .collect();

    let run_state = match state.coordinator.status() {
        SlotStatus::Idle => "idle",
        SlotStatus::Running => "a run is in progress",
    };

    Html(format!(
        "<h2>&#x2705; Cron job server is running correctly.</h2>\
         <p>The job is scheduled (<code>{}</code>, UTC) and will run automatically. \
         No need to visit any other endpoint.</p>\
         <p>Currently {}.</p>\
         <p>{} target(s):</p><ul>{}</ul>",
        escape_html(&state.schedule),
        run_state,
        targets.len(),
        items
    ))
}

/// JSON view returned by `GET /status`
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub running: bool,
    pub status: SlotStatus,
    pub schedule: String,
    pub targets: Vec<String>,
    pub self_ping: Option<String>,
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<StatusView> {
    let coordinator = &state.coordinator;

    Json(StatusView {
        running: coordinator.is_running(),
        status: coordinator.status(),
        schedule: state.schedule.to_string(),
        targets: coordinator.targets().iter().map(|t| t.url.clone()).collect(),
        self_ping: coordinator.self_ping().map(|t| t.url.clone()),
    })
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
