//! Fetch outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

use super::target::Target;

/// Detail recorded when a request got no response at all
pub const NO_RESPONSE_DETAIL: &str = "no response received";

/// Why a fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The remote answered with an error status
    RemoteError,
    /// The request went out but nothing came back (timeout, refused, DNS)
    NoResponse,
    /// The request could not be built or sent
    RequestSetupError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::RemoteError => "remote error",
            FailureKind::NoResponse => "no response",
            FailureKind::RequestSetupError => "request setup error",
        };
        f.write_str(name)
    }
}

/// Normalized result of one fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum FetchResult {
    Success { status_code: u16, status_text: String },
    Failure { kind: FailureKind, detail: String },
}

/// Result of attempting one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub target: Target,
    #[serde(flatten)]
    pub result: FetchResult,
}

impl FetchOutcome {
    pub fn success(target: Target, status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            target,
            result: FetchResult::Success {
                status_code,
                status_text: status_text.into(),
            },
        }
    }

    pub fn failure(target: Target, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            target,
            result: FetchResult::Failure {
                kind,
                detail: detail.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.result, FetchResult::Success { .. })
    }

    /// The failure kind, or `None` on success
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.result {
            FetchResult::Success { .. } => None,
            FetchResult::Failure { kind, .. } => Some(*kind),
        }
    }
}
