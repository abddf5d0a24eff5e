//! Error types for the fetch client

use pulse_core::domain::outcome::{FailureKind, NO_RESPONSE_DETAIL};
use std::error::Error as StdError;
use thiserror::Error;

/// Errors that can occur while fetching a target
///
/// These never leave the client: `HttpFetcher::fetch` folds them into a
/// `FetchResult::Failure`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote answered with a 4xx/5xx status
    #[error("{status}/{status_text}")]
    RemoteError {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        status_text: String,
    },

    /// The request was sent but no response arrived
    #[error("no response received: {0}")]
    NoResponse(#[source] reqwest::Error),

    /// The request could not be built or sent
    #[error("request setup failed: {0}")]
    RequestSetup(String),
}

impl FetchError {
    /// Classifies a reqwest error
    ///
    /// Errors carrying a status come from `error_for_status` and mean a
    /// response did arrive. Builder errors never reached the network.
    /// Everything else (connect, timeout, DNS, redirect, body) counts as
    /// no response.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::RemoteError {
                status: status.as_u16(),
                status_text: status_text(status),
            };
        }

        if err.is_builder() {
            return Self::RequestSetup(error_chain(&err));
        }

        Self::NoResponse(err)
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RemoteError { .. } => FailureKind::RemoteError,
            Self::NoResponse(_) => FailureKind::NoResponse,
            Self::RequestSetup(_) => FailureKind::RequestSetupError,
        }
    }

    /// Detail string recorded in the outcome
    pub fn detail(&self) -> String {
        match self {
            Self::RemoteError {
                status,
                status_text,
            } => format!("{}/{}", status, status_text),
            Self::NoResponse(_) => NO_RESPONSE_DETAIL.to_string(),
            Self::RequestSetup(message) => message.clone(),
        }
    }
}

/// Canonical reason phrase, or "Unknown" for unregistered codes
pub(crate) fn status_text(status: reqwest::StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

/// Joins an error with all of its sources
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
