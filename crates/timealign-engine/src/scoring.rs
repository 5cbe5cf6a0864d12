//! Fixed time-of-day preference and the slot score formula.
//!
//! Afternoon starts (14:00-17:59) are preferred, very early or late starts
//! (before 09:00, from 21:00) are penalised. Coverage dominates the score at
//! 70%, the time preference contributes the remaining 30%.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

pub const PREFERRED_PREFERENCE: f64 = 1.2;
pub const NEUTRAL_PREFERENCE: f64 = 1.0;
pub const OFF_HOURS_PREFERENCE: f64 = 0.5;

/// Start hours (inclusive) that earn [`PREFERRED_PREFERENCE`].
pub const PREFERRED_HOURS: std::ops::RangeInclusive<u32> = 14..=17;
/// Start hours below this earn [`OFF_HOURS_PREFERENCE`].
pub const DAY_START_HOUR: u32 = 9;
/// Start hours above this earn [`OFF_HOURS_PREFERENCE`].
pub const DAY_END_HOUR: u32 = 20;

pub const COVERAGE_WEIGHT: f64 = 0.7;
pub const TIME_WEIGHT: f64 = 0.3;

/// Preference factor for a slot starting at civil hour `hour` (0-23).
pub fn time_preference(hour: u32) -> f64 {
    if PREFERRED_HOURS.contains(&hour) {
        PREFERRED_PREFERENCE
    } else if hour < DAY_START_HOUR || hour > DAY_END_HOUR {
        OFF_HOURS_PREFERENCE
    } else {
        NEUTRAL_PREFERENCE
    }
}

/// Civil hour of `start` on the clock of `zone`.
pub fn start_hour(start: DateTime<Utc>, zone: Tz) -> u32 {
    start.with_timezone(&zone).hour()
}

/// `coverage * 0.7 + (preference / 1.2) * 0.3`, a value in `[0, 1]`.
pub fn score(coverage_ratio: f64, hour: u32) -> f64 {
    coverage_ratio * COVERAGE_WEIGHT
        + (time_preference(hour) / PREFERRED_PREFERENCE) * TIME_WEIGHT
}
