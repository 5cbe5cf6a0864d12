//! Error types for timealign-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by the suggestion engine and its collaborators.
///
/// An empty suggestion list is never an error; only malformed input or a
/// failing collaborator produces one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("Invalid range: start {start} is not before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("Invalid min_coverage: {0} (expected a value in [0, 1])")]
    InvalidCoverage(f64),

    #[error("Invalid busy interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Recurrence expands to more than {limit} instances in the requested range")]
    ExpansionLimit { limit: u16 },

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Busy-time provider failed for member {member}: {message}")]
    Provider { member: String, message: String },
}

pub type Result<T> = std::result::Result<T, SchedulingError>;
