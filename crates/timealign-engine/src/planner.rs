//! Request-level orchestration: group lookup, busy-time gathering, ranking.
//!
//! A [`Planner`] owns its collaborators; nothing is read from global state.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dto::{SuggestRequest, TimeSlot};
use crate::error::Result;
use crate::group::GroupStore;
use crate::provider::{collect_busy_map, collect_busy_map_concurrent, BusyTimeProvider};
use crate::suggest::{suggest_for_members, CandidateSlot};

/// How member busy times are fetched from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gathering {
    /// One member after another.
    #[default]
    Sequential,
    /// All members at once on scoped threads.
    Concurrent,
}

/// Suggests meeting times for a stored group using an injected busy-time provider.
#[derive(Debug, Clone)]
pub struct Planner<G, P> {
    groups: G,
    provider: P,
    gathering: Gathering,
}

impl<G: GroupStore, P: BusyTimeProvider> Planner<G, P> {
    pub fn new(groups: G, provider: P) -> Self {
        Self {
            groups,
            provider,
            gathering: Gathering::default(),
        }
    }

    pub fn with_gathering(mut self, gathering: Gathering) -> Self {
        self.gathering = gathering;
        self
    }

    pub fn groups(&self) -> &G {
        &self.groups
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Ranked candidate slots for `request`.
    ///
    /// # Errors
    /// Any validation error of the request, [`crate::SchedulingError::GroupNotFound`],
    /// or the first provider failure.
    pub fn suggest_candidates(&self, request: &SuggestRequest) -> Result<Vec<CandidateSlot>> {
        let sched = request.to_scheduling_request()?;
        let members = self.groups.members(&request.group_id)?;

        info!(
            group = %request.group_id,
            members = members.len(),
            range_start = %sched.range_start,
            range_end = %sched.range_end,
            duration_mins = request.duration_mins,
            granularity_mins = request.granularity_mins,
            min_coverage = request.min_coverage,
            "suggesting meeting times"
        );

        let busy = match self.gathering {
            Gathering::Sequential => {
                collect_busy_map(&self.provider, &members, sched.range_start, sched.range_end)
            }
            Gathering::Concurrent => collect_busy_map_concurrent(
                &self.provider,
                &members,
                sched.range_start,
                sched.range_end,
            ),
        }
        .inspect_err(|e| warn!(group = %request.group_id, error = %e, "could not gather busy times"))?;

        suggest_for_members(&members, &busy, &sched)
    }

    /// [`Planner::suggest_candidates`] mapped to response DTOs.
    pub fn suggest(&self, request: &SuggestRequest) -> Result<Vec<TimeSlot>> {
        Ok(self
            .suggest_candidates(request)?
            .iter()
            .map(TimeSlot::from)
            .collect())
    }
}
