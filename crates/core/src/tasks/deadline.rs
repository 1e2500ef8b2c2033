//! Deadline normalization at the storage boundary.

use crate::config::DeadlinePolicy;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Layouts accepted for timestamps without an offset.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a deadline into UTC.
///
/// Offset-aware RFC 3339 timestamps are converted to UTC. Naive timestamps
/// (and bare dates, read as midnight) are read as UTC under
/// [`DeadlinePolicy::AssumeUtc`] and refused under [`DeadlinePolicy::Reject`].
///
/// # Errors
///
/// [`Error::InvalidDeadline`] if the value matches no supported layout,
/// [`Error::NaiveDeadline`] if it is naive and the policy refuses that.
pub fn parse_deadline(task: &str, value: &str, policy: DeadlinePolicy) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(aware) = DateTime::parse_from_rfc3339(value) {
        return Ok(aware.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| Error::InvalidDeadline {
            task: task.to_string(),
            value: value.to_string(),
        })?;

    match policy {
        DeadlinePolicy::AssumeUtc => Ok(naive.and_utc()),
        DeadlinePolicy::Reject => Err(Error::NaiveDeadline {
            task: task.to_string(),
            value: value.to_string(),
        }),
    }
}
