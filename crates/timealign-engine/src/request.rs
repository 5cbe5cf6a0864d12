//! Scheduling parameters for one suggestion call.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SchedulingError};

/// Parameters for a single suggestion call.
///
/// `range_start < range_end`, `duration > 0`, `granularity > 0` and
/// `0 <= min_coverage <= 1` must hold; [`SchedulingRequest::validate`] checks
/// them and [`crate::suggest`] refuses requests that fail it.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingRequest {
    pub range_start: DateTime<Utc>,
    pub range_end: DateTime<Utc>,
    /// Length of every candidate slot.
    pub duration: Duration,
    /// Step by which the slot start cursor advances.
    pub granularity: Duration,
    /// Minimum fraction of members that must be free for a slot to survive.
    pub min_coverage: f64,
    /// Zone whose civil clock is used to read a slot's start hour for scoring.
    pub preference_zone: Tz,
}

impl SchedulingRequest {
    /// Build and validate a request. The preference zone defaults to UTC.
    pub fn new(
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        duration: Duration,
        granularity: Duration,
        min_coverage: f64,
    ) -> Result<Self> {
        let req = Self {
            range_start,
            range_end,
            duration,
            granularity,
            min_coverage,
            preference_zone: Tz::UTC,
        };
        req.validate()?;
        Ok(req)
    }

    /// Like [`SchedulingRequest::new`] with duration and granularity in whole minutes.
    pub fn from_minutes(
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        duration_mins: i64,
        granularity_mins: i64,
        min_coverage: f64,
    ) -> Result<Self> {
        let duration = Duration::try_minutes(duration_mins)
            .ok_or_else(|| SchedulingError::InvalidDuration(format!("{duration_mins} minutes")))?;
        let granularity = Duration::try_minutes(granularity_mins).ok_or_else(|| {
            SchedulingError::InvalidGranularity(format!("{granularity_mins} minutes"))
        })?;
        Self::new(range_start, range_end, duration, granularity, min_coverage)
    }

    /// Read slot start hours in `zone` instead of UTC.
    pub fn with_preference_zone(mut self, zone: Tz) -> Self {
        self.preference_zone = zone;
        self
    }

    /// Check every precondition of the suggestion engine.
    pub fn validate(&self) -> Result<()> {
        if self.range_start >= self.range_end {
            return Err(SchedulingError::InvalidRange {
                start: self.range_start,
                end: self.range_end,
            });
        }
        if self.duration <= Duration::zero() {
            return Err(SchedulingError::InvalidDuration(format!(
                "{}s (must be positive)",
                self.duration.num_seconds()
            )));
        }
        if self.granularity <= Duration::zero() {
            return Err(SchedulingError::InvalidGranularity(format!(
                "{}s (must be positive)",
                self.granularity.num_seconds()
            )));
        }
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(SchedulingError::InvalidCoverage(self.min_coverage));
        }
        Ok(())
    }

    /// Every candidate window `[start, start + duration)` that fits inside the
    /// range, in enumeration order.
    ///
    /// Empty when the range is shorter than one slot.
    pub fn windows(&self) -> impl Iterator<Item = (DateTime<Utc>, DateTime<Utc>)> + '_ {
        let first = self
            .range_start
            .checked_add_signed(self.duration)
            .map(|end| (self.range_start, end));

        std::iter::successors(first, move |(start, _)| {
            let next = start.checked_add_signed(self.granularity)?;
            let end = next.checked_add_signed(self.duration)?;
            Some((next, end))
        })
        .take_while(move |(_, end)| *end <= self.range_end)
    }
}
