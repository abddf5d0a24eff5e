//! Cron schedule parsing
//!
//! Accepts the classic five-field form (`min hour dom mon dow`) and the
//! six-field form with a leading seconds field. Five-field expressions are
//! normalized by prepending a `0` seconds field. Times are evaluated in UTC.
//!
//! Numeric days of week use the standard cron numbering (0-7, Sunday is 0
//! or 7). The `cron` crate counts 1-7 from Sunday, so numeric day-of-week
//! items are expanded and renumbered before being handed over. Day names
//! pass through untouched.

use chrono::{DateTime, Utc};
use pulse_core::ConfigError;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Validated cron schedule
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Expression as configured, for display
    expression: String,
    inner: cron::Schedule,
}

impl Schedule {
    pub fn parse(expression: &str) -> Result<Self, ConfigError> {
        let expression = expression.trim();
        let invalid = |reason: String| ConfigError::InvalidSchedule {
            expression: expression.to_string(),
            reason,
        };

        let mut fields: Vec<String> = match expression.split_whitespace().count() {
            5 => std::iter::once("0")
                .chain(expression.split_whitespace())
                .map(str::to_string)
                .collect(),
            6 => expression.split_whitespace().map(str::to_string).collect(),
            n => return Err(invalid(format!("expected 5 or 6 fields, found {}", n))),
        };

        fields[5] = translate_day_of_week(&fields[5]).map_err(invalid)?;
        let normalized = fields.join(" ");

        let inner = cron::Schedule::from_str(&normalized).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            expression: expression.to_string(),
            inner,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First fire time strictly after `after`, if the schedule has one
    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.inner.after(after).next()
    }
}

/// Rewrites a standard day-of-week field into the `cron` crate's numbering
///
/// Numeric items (`n`, `a-b`, `*/s`, `a/s`, `a-b/s`) are expanded to the
/// days they select and emitted as one list. `*`, `?` and items using day
/// names are kept as written.
fn translate_day_of_week(field: &str) -> Result<String, String> {
    let mut kept = Vec::new();
    let mut days = BTreeSet::new();

    for item in field.split(',') {
        if item == "*" || item == "?" || item.chars().any(|c| c.is_ascii_alphabetic()) {
            kept.push(item.to_string());
            continue;
        }

        let (range, step) = match item.split_once('/') {
            Some((range, step)) => {
                let step: u32 = step
                    .parse()
                    .map_err(|_| format!("invalid day-of-week step '{}'", item))?;
                if step == 0 {
                    return Err(format!("day-of-week step must be positive in '{}'", item));
                }
                (range, step)
            }
            None => (item, 1),
        };

        let (start, end) = match range.split_once('-') {
            _ if range == "*" => (0, 7),
            Some((start, end)) => (day_number(start)?, day_number(end)?),
            // `a/s` runs to the end of the week
            None if item.contains('/') => (day_number(range)?, 7),
            None => {
                let day = day_number(range)?;
                (day, day)
            }
        };

        if start > end {
            return Err(format!("day-of-week range '{}' is reversed", item));
        }

        // Standard 0 and 7 are both Sunday, which the crate calls 1
        days.extend((start..=end).step_by(step as usize).map(|d| d % 7 + 1));
    }

    kept.extend(days.iter().map(u32::to_string));
    Ok(kept.join(","))
}

fn day_number(raw: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(day) if day <= 7 => Ok(day),
        Ok(day) => Err(format!("day-of-week {} is out of range (0-7)", day)),
        Err(_) => Err(format!("invalid day-of-week value '{}'", raw)),
    }
}
