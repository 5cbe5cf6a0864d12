//! Calendar-backed busy times: one-off entries plus RFC 5545 recurring rules.
//!
//! Recurring entries are expanded with the `rrule` crate in their own IANA
//! zone, so a weekly 09:00 meeting stays at 09:00 local time across DST
//! transitions; the resulting instants are normalized to UTC.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SchedulingError};
use crate::group::MemberId;
use crate::interval::{clip_and_merge, BusyInterval};
use crate::provider::BusyTimeProvider;

/// Hard cap on instances produced by one recurring entry inside one range.
pub const MAX_INSTANCES: u16 = 2000;

/// A recurring busy block, e.g. a weekly lecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringBusy {
    /// RRULE body without the `RRULE:` prefix, e.g. `FREQ=WEEKLY;BYDAY=TU,TH`.
    pub rrule: String,
    /// First occurrence as local wall-clock time, e.g. `2025-01-07T09:00:00`.
    pub dtstart: String,
    pub duration_mins: u32,
    /// IANA zone `dtstart` and every occurrence are anchored in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Local start times of cancelled occurrences (same format as `dtstart`).
    #[serde(default)]
    pub exdates: Vec<String>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl RecurringBusy {
    /// Occurrences overlapping `[range_start, range_end)`, in chronological order.
    ///
    /// # Errors
    /// - [`SchedulingError::InvalidRule`] for an empty or unparseable RRULE
    /// - [`SchedulingError::InvalidTimezone`] for an unknown IANA zone
    /// - [`SchedulingError::InvalidTimestamp`] for a malformed `dtstart`/exdate
    /// - [`SchedulingError::InvalidDuration`] for a zero duration
    /// - [`SchedulingError::ExpansionLimit`] when more than [`MAX_INSTANCES`]
    ///   occurrences fall inside the range
    pub fn expand(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        if self.rrule.trim().is_empty() {
            return Err(SchedulingError::InvalidRule("empty RRULE string".to_string()));
        }
        if self.duration_mins == 0 {
            return Err(SchedulingError::InvalidDuration(
                "recurring entry has zero duration".to_string(),
            ));
        }
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| SchedulingError::InvalidTimezone(self.timezone.clone()))?;

        let mut text = format!(
            "DTSTART;TZID={}:{}\nRRULE:{}",
            self.timezone,
            ical_local(&self.dtstart)?,
            self.rrule.trim().trim_start_matches("RRULE:")
        );
        if !self.exdates.is_empty() {
            let exdates = self
                .exdates
                .iter()
                .map(|d| ical_local(d))
                .collect::<Result<Vec<_>>>()?;
            text.push_str(&format!("\nEXDATE;TZID={}:{}", self.timezone, exdates.join(",")));
        }

        let set: RRuleSet = text
            .parse()
            .map_err(|e| SchedulingError::InvalidRule(format!("{e}")))?;

        let duration = Duration::minutes(i64::from(self.duration_mins));
        // Occurrences that start before the range may still run into it.
        let lower = range_start.checked_sub_signed(duration).unwrap_or(range_start);
        let occurrences = set
            .after(lower.with_timezone(&rrule::Tz::UTC))
            .before(range_end.with_timezone(&rrule::Tz::UTC))
            .all(MAX_INSTANCES);

        // A truncated list would leave the tail of the range looking free.
        if occurrences.limited {
            warn!(
                rrule = %self.rrule,
                limit = MAX_INSTANCES,
                "recurring entry exceeds expansion limit inside requested range"
            );
            return Err(SchedulingError::ExpansionLimit {
                limit: MAX_INSTANCES,
            });
        }

        Ok(occurrences
            .dates
            .into_iter()
            .filter_map(|dt| {
                let start = dt.with_timezone(&Utc);
                BusyInterval::new(start, start + duration).ok()
            })
            .filter(|iv| iv.overlaps(range_start, range_end))
            .collect())
    }
}

/// Convert `2025-01-07T09:00:00` (or `2025-01-07T09:00`) to iCalendar's
/// `20250107T090000`.
fn ical_local(local: &str) -> Result<String> {
    let local = local.trim();
    NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M"))
        .map(|dt| dt.format("%Y%m%dT%H%M%S").to_string())
        .map_err(|e| SchedulingError::InvalidTimestamp(format!("{local:?}: {e}")))
}

/// One entry of a member's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarEntry {
    /// A single busy block, e.g. `{"kind":"once","start":"...Z","end":"...Z"}`.
    Once(BusyInterval),
    /// A rule-based busy block.
    Recurring(RecurringBusy),
}

/// Calendar-backed [`BusyTimeProvider`]: each member owns a list of
/// [`CalendarEntry`] values that are expanded on every lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecurringCalendar {
    calendars: BTreeMap<MemberId, Vec<CalendarEntry>>,
}

impl RecurringCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(
        mut self,
        member: impl Into<MemberId>,
        entries: impl IntoIterator<Item = CalendarEntry>,
    ) -> Self {
        self.calendars
            .entry(member.into())
            .or_default()
            .extend(entries);
        self
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.calendars.keys().map(String::as_str)
    }
}

impl BusyTimeProvider for RecurringCalendar {
    fn busy_intervals(
        &self,
        member: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        let Some(entries) = self.calendars.get(member) else {
            return Ok(Vec::new());
        };

        let mut busy = Vec::new();
        for entry in entries {
            match entry {
                CalendarEntry::Once(interval) => busy.push(*interval),
                CalendarEntry::Recurring(rule) => {
                    let expanded = rule.expand(range_start, range_end).map_err(|e| match e {
                        SchedulingError::ExpansionLimit { .. } => SchedulingError::Provider {
                            member: member.to_string(),
                            message: e.to_string(),
                        },
                        other => other,
                    })?;
                    busy.extend(expanded);
                }
            }
        }
        Ok(clip_and_merge(busy, range_start, range_end))
    }
}
