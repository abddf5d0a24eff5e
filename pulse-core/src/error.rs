//! Configuration errors
//!
//! Every variant is fatal: the process refuses to start when any of them
//! is raised.

use thiserror::Error;

/// Errors raised while turning raw configuration into validated values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The target specification is missing or blank
    #[error("no fetch targets configured (URL_TO_FETCH is empty)")]
    MissingTargets,

    /// One comma-separated segment of the target list is blank
    #[error("target #{position} is empty")]
    EmptyTarget {
        /// 1-based position of the offending segment
        position: usize,
    },

    /// A target is not a well-formed absolute http(s) URL
    #[error("invalid target URL '{url}': {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    /// The schedule expression does not follow the cron grammar
    #[error("invalid cron schedule '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },

    /// The self-ping URL is not a well-formed absolute http(s) URL
    #[error("invalid self-ping URL '{url}': {reason}")]
    InvalidSelfPingUrl { url: String, reason: String },

    /// The log time offset is not of the form "+HH:MM"
    #[error("invalid log UTC offset '{value}': {reason}")]
    InvalidLogOffset { value: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = ConfigError::InvalidSchedule {
            expression: "every tuesday".to_string(),
            reason: "bad field".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid cron schedule 'every tuesday': bad field"
        );

        let err = ConfigError::EmptyTarget { position: 2 };
        assert_eq!(err.to_string(), "target #2 is empty");
    }
}
