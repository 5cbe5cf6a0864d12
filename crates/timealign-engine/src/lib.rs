//! # timealign-engine
//!
//! Deterministic meeting-time suggestions for a group of people.
//!
//! Given each member's busy intervals over a time range, the engine walks the
//! range at a fixed granularity, measures how many members are free for each
//! candidate slot, drops slots below a minimum attendance ratio, and ranks the
//! rest by coverage and time of day.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use timealign_engine::{suggest, BusyInterval, MemberBusyMap, SchedulingRequest};
//!
//! let at = |h| Utc.with_ymd_and_hms(2025, 1, 6, h, 0, 0).unwrap();
//! let mut busy = MemberBusyMap::new();
//! busy.insert("alice".into(), vec![BusyInterval::new(at(1), at(2)).unwrap()]);
//! busy.insert("bob".into(), vec![]);
//!
//! let req = SchedulingRequest::from_minutes(at(0), at(4), 60, 60, 1.0).unwrap();
//! let slots = suggest(&busy, &req).unwrap();
//! assert_eq!(slots.len(), 3);
//! assert!(slots.iter().all(|s| s.coverage_ratio == 1.0));
//! ```
//!
//! ## Modules
//!
//! - [`suggest`](mod@suggest) - slot enumeration, coverage filter, ranking
//! - [`scoring`] - fixed time-of-day preference and score formula
//! - [`request`] - validated scheduling parameters
//! - [`interval`] - half-open busy intervals, overlap, clip/merge
//! - [`provider`] - `BusyTimeProvider` seam and member-map collection
//! - [`recurrence`] - calendar-backed provider with RRULE expansion
//! - [`group`] - group membership and `GroupStore`
//! - [`planner`] - request-level orchestration with injected collaborators
//! - [`dto`] - JSON request/response shapes
//! - [`error`] - Error types

pub mod dto;
pub mod error;
pub mod group;
pub mod interval;
pub mod planner;
pub mod provider;
pub mod recurrence;
pub mod request;
pub mod scoring;
pub mod suggest;

pub use dto::{SuggestRequest, TimeSlot};
pub use error::SchedulingError;
pub use group::{Group, GroupStore, InMemoryGroupStore, MemberId};
pub use interval::BusyInterval;
pub use planner::{Gathering, Planner};
pub use provider::{collect_busy_map, collect_busy_map_concurrent, BusyTimeProvider, StaticBusyTimes};
pub use recurrence::{CalendarEntry, RecurringBusy, RecurringCalendar};
pub use request::SchedulingRequest;
pub use suggest::{suggest, suggest_for_members, CandidateSlot, MemberBusyMap, MAX_SUGGESTIONS};
