//! JSON request/response shapes for transport layers (HTTP, RPC, CLI).
//!
//! Timestamps travel as ISO-8601 / RFC 3339 strings; durations as whole
//! minutes. Omitted request fields fall back to the defaults below.

use chrono::SecondsFormat;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};
use crate::interval::parse_instant;
use crate::request::SchedulingRequest;
use crate::suggest::CandidateSlot;

pub const DEFAULT_DURATION_MINS: i64 = 60;
pub const DEFAULT_GRANULARITY_MINS: i64 = 15;
pub const DEFAULT_MIN_COVERAGE: f64 = 0.8;

/// A suggestion request as received from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub group_id: String,
    pub range_start: String,
    pub range_end: String,
    #[serde(default = "default_duration")]
    pub duration_mins: i64,
    #[serde(default = "default_granularity")]
    pub granularity_mins: i64,
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,
    /// IANA zone used to read slot start hours for scoring.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_MINS
}

fn default_granularity() -> i64 {
    DEFAULT_GRANULARITY_MINS
}

fn default_min_coverage() -> f64 {
    DEFAULT_MIN_COVERAGE
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl SuggestRequest {
    /// A request for `group_id` over `[range_start, range_end)` with default parameters.
    pub fn new(
        group_id: impl Into<String>,
        range_start: impl Into<String>,
        range_end: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            range_start: range_start.into(),
            range_end: range_end.into(),
            duration_mins: DEFAULT_DURATION_MINS,
            granularity_mins: DEFAULT_GRANULARITY_MINS,
            min_coverage: DEFAULT_MIN_COVERAGE,
            timezone: default_timezone(),
        }
    }

    /// Parse timestamps and zone, then validate into a [`SchedulingRequest`].
    pub fn to_scheduling_request(&self) -> Result<SchedulingRequest> {
        let zone: Tz = self
            .timezone
            .parse()
            .map_err(|_| SchedulingError::InvalidTimezone(self.timezone.clone()))?;

        Ok(SchedulingRequest::from_minutes(
            parse_instant(&self.range_start)?,
            parse_instant(&self.range_end)?,
            self.duration_mins,
            self.granularity_mins,
            self.min_coverage,
        )?
        .with_preference_zone(zone))
    }
}

/// One ranked slot in a suggestion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
    pub score: f64,
    pub available_members: usize,
    pub total_members: usize,
    pub coverage_ratio: f64,
}

impl From<&CandidateSlot> for TimeSlot {
    fn from(slot: &CandidateSlot) -> Self {
        Self {
            start: slot.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end: slot.end.to_rfc3339_opts(SecondsFormat::Secs, true),
            score: slot.score,
            available_members: slot.available_members,
            total_members: slot.total_members,
            coverage_ratio: slot.coverage_ratio,
        }
    }
}

impl From<CandidateSlot> for TimeSlot {
    fn from(slot: CandidateSlot) -> Self {
        Self::from(&slot)
    }
}
