//! Slot enumeration, coverage filtering and ranking.
//!
//! Walks the request range in `granularity` steps, counts how many members are
//! free for each `[cursor, cursor + duration)` window, drops windows below
//! `min_coverage`, scores the rest and returns the best [`MAX_SUGGESTIONS`].
//!
//! The computation is pure: no I/O, no shared state, identical inputs give
//! identical output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::group::{dedup_members, MemberId};
use crate::interval::BusyInterval;
use crate::request::SchedulingRequest;
use crate::scoring;

/// Upper bound on the number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 10;

/// Busy intervals per member. Ordered so iteration is deterministic.
pub type MemberBusyMap = BTreeMap<MemberId, Vec<BusyInterval>>;

/// A scored candidate meeting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Members with no busy interval overlapping the window.
    pub available_members: usize,
    pub total_members: usize,
    /// `available_members / total_members`.
    pub coverage_ratio: f64,
    pub score: f64,
}

/// Rank candidate slots for every member that has an entry in `member_busy`.
///
/// Shorthand for [`suggest_for_members`] with the map's keys as the member set.
pub fn suggest(member_busy: &MemberBusyMap, req: &SchedulingRequest) -> Result<Vec<CandidateSlot>> {
    suggest_for_members(member_busy.keys(), member_busy, req)
}

/// Rank candidate slots for `members`.
///
/// - Repeated ids in `members` count once.
/// - A member with no entry in `member_busy` is always available.
/// - Entries in `member_busy` for ids outside `members` are ignored.
///
/// Returns at most [`MAX_SUGGESTIONS`] slots ordered by descending score;
/// equal scores keep enumeration order, so the earlier slot comes first.
/// An empty list is a valid outcome (range shorter than `duration`, no window
/// meeting `min_coverage`, or no members).
///
/// # Errors
/// Returns the [`SchedulingRequest::validate`] error if `req` breaks a
/// precondition.
pub fn suggest_for_members<I, S>(
    members: I,
    member_busy: &MemberBusyMap,
    req: &SchedulingRequest,
) -> Result<Vec<CandidateSlot>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    req.validate()?;

    let roster = dedup_members(members);
    let total_members = roster.len();
    if total_members == 0 {
        debug!("no members, nothing to suggest");
        return Ok(Vec::new());
    }

    let busy: Vec<&[BusyInterval]> = roster
        .iter()
        .map(|m| member_busy.get(m).map(Vec::as_slice).unwrap_or(&[]))
        .collect();

    let mut enumerated = 0usize;
    let mut accepted = Vec::new();

    for (start, end) in req.windows() {
        enumerated += 1;

        let available_members = busy
            .iter()
            .filter(|intervals| !intervals.iter().any(|iv| iv.overlaps(start, end)))
            .count();
        let coverage_ratio = available_members as f64 / total_members as f64;

        if coverage_ratio < req.min_coverage {
            continue;
        }

        let hour = scoring::start_hour(start, req.preference_zone);
        accepted.push(CandidateSlot {
            start,
            end,
            available_members,
            total_members,
            coverage_ratio,
            score: scoring::score(coverage_ratio, hour),
        });
    }

    let accepted_count = accepted.len();

    // `sort_by` is stable: ties stay in enumeration order.
    accepted.sort_by(|a, b| b.score.total_cmp(&a.score));
    accepted.truncate(MAX_SUGGESTIONS);

    debug!(
        total_members,
        enumerated,
        accepted = accepted_count,
        returned = accepted.len(),
        "ranked candidate slots"
    );

    Ok(accepted)
}
