//! Fetch targets
//!
//! A `TargetList` is built once from configuration at startup and never
//! mutated afterwards. It is shared read-only by every fetch of every run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::slice;

use crate::error::ConfigError;

/// A single fetch destination
///
/// The URL string is the identity of a target. Duplicates are allowed and
/// each occurrence is fetched and reported on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub url: String,
}

impl Target {
    /// Validates `raw` as an absolute http(s) URL and wraps it
    ///
    /// The error is the human-readable reason the URL was rejected; callers
    /// wrap it in the `ConfigError` variant that fits their context.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        let parsed = url::Url::parse(raw).map_err(|e| e.to_string())?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(format!("unsupported scheme '{}'", other)),
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err("missing host".to_string());
        }

        Ok(Self {
            url: raw.to_string(),
        })
    }

    /// Builds a target without validation
    ///
    /// Used when the URL is known to be well-formed, or deliberately isn't.
    pub fn new_unchecked(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Ordered, immutable list of targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetList {
    targets: Vec<Target>,
}

impl TargetList {
    /// Parses a comma-separated list of URLs
    ///
    /// Input order and duplicates are preserved. A blank value, a blank
    /// segment (e.g. a trailing comma) or a malformed URL is rejected.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Err(ConfigError::MissingTargets);
        }

        let mut targets = Vec::new();
        for (idx, segment) in raw.split(',').enumerate() {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(ConfigError::EmptyTarget { position: idx + 1 });
            }

            let target = Target::parse(segment).map_err(|reason| ConfigError::InvalidTargetUrl {
                url: segment.to_string(),
                reason,
            })?;
            targets.push(target);
        }

        Ok(Self { targets })
    }

    /// Builds a list from already-constructed targets
    ///
    /// Returns `MissingTargets` when `targets` is empty.
    pub fn from_targets(targets: Vec<Target>) -> Result<Self, ConfigError> {
        if targets.is_empty() {
            return Err(ConfigError::MissingTargets);
        }
        Ok(Self { targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always false for a list built through `parse` or `from_targets`
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Target> {
        self.targets.iter()
    }

    pub fn as_slice(&self) -> &[Target] {
        &self.targets
    }
}

impl<'a> IntoIterator for &'a TargetList {
    type Item = &'a Target;
    type IntoIter = slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
