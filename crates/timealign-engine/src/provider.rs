//! Busy-time collection: the provider seam and member-map assembly.
//!
//! The suggestion core only ever sees a [`MemberBusyMap`]. Where the intervals
//! came from (an in-memory table, an expanded recurring calendar, a remote
//! free/busy API) and whether members were fetched one by one or in parallel
//! is decided here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SchedulingError};
use crate::group::{dedup_members, MemberId};
use crate::interval::{clip_and_merge, BusyInterval};
use crate::suggest::MemberBusyMap;

/// Yields a member's busy intervals within a time range.
pub trait BusyTimeProvider: Send + Sync {
    /// Busy intervals of `member` that overlap `[range_start, range_end)`.
    ///
    /// A member the provider knows nothing about has no busy intervals.
    fn busy_intervals(
        &self,
        member: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>>;
}

impl<T: BusyTimeProvider + ?Sized> BusyTimeProvider for &T {
    fn busy_intervals(
        &self,
        member: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        (**self).busy_intervals(member, range_start, range_end)
    }
}

impl<T: BusyTimeProvider + ?Sized> BusyTimeProvider for Box<T> {
    fn busy_intervals(
        &self,
        member: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        (**self).busy_intervals(member, range_start, range_end)
    }
}

/// Deterministic provider backed by a fixed `member -> intervals` table.
///
/// Serializes as a plain JSON object keyed by member id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticBusyTimes {
    table: BTreeMap<MemberId, Vec<BusyInterval>>,
}

impl StaticBusyTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StaticBusyTimes::insert`].
    pub fn with_member(
        mut self,
        member: impl Into<MemberId>,
        intervals: impl IntoIterator<Item = BusyInterval>,
    ) -> Self {
        self.insert(member, intervals);
        self
    }

    /// Append `intervals` to `member`'s entry.
    pub fn insert(
        &mut self,
        member: impl Into<MemberId>,
        intervals: impl IntoIterator<Item = BusyInterval>,
    ) {
        self.table.entry(member.into()).or_default().extend(intervals);
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl BusyTimeProvider for StaticBusyTimes {
    /// The member's intervals clipped to the range and merged.
    fn busy_intervals(
        &self,
        member: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        Ok(self
            .table
            .get(member)
            .map(|ivs| clip_and_merge(ivs.iter().copied(), range_start, range_end))
            .unwrap_or_default())
    }
}

/// Query `provider` once per distinct member, one after another.
///
/// Stops at the first provider error.
pub fn collect_busy_map<P, I, S>(
    provider: &P,
    members: I,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Result<MemberBusyMap>
where
    P: BusyTimeProvider + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut map = MemberBusyMap::new();
    for member in dedup_members(members) {
        let intervals = provider
            .busy_intervals(&member, range_start, range_end)
            .inspect_err(|e| warn!(member = %member, error = %e, "busy-time lookup failed"))?;
        debug!(member = %member, busy = intervals.len(), "collected busy intervals");
        map.insert(member, intervals);
    }
    Ok(map)
}

/// Same result as [`collect_busy_map`], with each member queried on its own
/// scoped thread.
///
/// When several members fail, the error of the first member (in roster order)
/// is returned. A panicking provider is reported as
/// [`SchedulingError::Provider`].
pub fn collect_busy_map_concurrent<P, I, S>(
    provider: &P,
    members: I,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Result<MemberBusyMap>
where
    P: BusyTimeProvider + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let roster = dedup_members(members);

    let results: Vec<(MemberId, Result<Vec<BusyInterval>>)> = std::thread::scope(|scope| {
        let handles: Vec<_> = roster
            .into_iter()
            .map(|member| {
                let id = member.clone();
                let handle =
                    scope.spawn(move || provider.busy_intervals(&id, range_start, range_end));
                (member, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(member, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(SchedulingError::Provider {
                        member: member.clone(),
                        message: "provider panicked".to_string(),
                    })
                });
                (member, result)
            })
            .collect()
    });

    let mut map = MemberBusyMap::new();
    for (member, result) in results {
        let intervals =
            result.inspect_err(|e| warn!(member = %member, error = %e, "busy-time lookup failed"))?;
        debug!(member = %member, busy = intervals.len(), "collected busy intervals");
        map.insert(member, intervals);
    }
    Ok(map)
}
