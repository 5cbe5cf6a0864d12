//! Busy intervals and the half-open overlap rule.
//!
//! Every interval is `[start, end)`. Two intervals that merely touch
//! (`a.end == b.start`) do not overlap, so a meeting may start the instant a
//! busy block ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};

/// A half-open time range `[start, end)` during which a member is unavailable.
///
/// Construction enforces `start < end`, including when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct BusyInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for BusyInterval {
    type Error = SchedulingError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        BusyInterval::new(raw.start, raw.end)
    }
}

impl BusyInterval {
    /// Build an interval, rejecting empty or reversed ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(SchedulingError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from RFC 3339 strings (see [`parse_instant`]).
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_instant(start)?, parse_instant(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// True iff `[self.start, self.end)` and `[start, end)` share at least one instant.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        overlaps(self.start, self.end, start, end)
    }
}

/// Half-open overlap test: `[a_start, a_end)` and `[b_start, b_end)` overlap
/// iff `a_start < b_end && b_start < a_end`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Parse an RFC 3339 / ISO-8601 timestamp into a UTC instant.
///
/// The offset must be explicit (`Z` or `±hh:mm`); a bare local time is
/// rejected rather than guessed.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchedulingError::InvalidTimestamp(format!("{s:?}: {e}")))
}

/// Clip intervals to `[window_start, window_end)` and merge overlapping or
/// adjacent ones.
///
/// Returns a sorted, non-overlapping list. Intervals entirely outside the
/// window are dropped.
pub fn clip_and_merge(
    intervals: impl IntoIterator<Item = BusyInterval>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<BusyInterval> {
    let mut clipped: Vec<(DateTime<Utc>, DateTime<Utc>)> = intervals
        .into_iter()
        .filter(|iv| iv.overlaps(window_start, window_end))
        .map(|iv| (iv.start.max(window_start), iv.end.min(window_end)))
        .collect();

    clipped.sort_unstable();

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(clipped.len());
    for (start, end) in clipped {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    // Clipping an overlapping interval always leaves start < end.
    merged
        .into_iter()
        .map(|(start, end)| BusyInterval { start, end })
        .collect()
}
