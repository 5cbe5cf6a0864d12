//! End-to-end tests for the planner: group lookup, busy-time gathering and
//! ranking behind injected collaborators.

use timealign_engine::{
    BusyInterval, Gathering, Group, InMemoryGroupStore, Planner, SchedulingError, StaticBusyTimes,
    SuggestRequest,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn group(id: &str, owner: &str, members: &[&str]) -> Group {
    Group {
        id: id.to_string(),
        name: format!("{id} study group"),
        owner_id: owner.to_string(),
        member_ids: members.iter().map(|m| m.to_string()).collect(),
    }
}

fn store() -> InMemoryGroupStore {
    InMemoryGroupStore::from_groups([group("algo", "alice", &["alice", "bob"])])
}

fn busy_times() -> StaticBusyTimes {
    StaticBusyTimes::new().with_member(
        "alice",
        [BusyInterval::parse("2025-01-06T01:00:00Z", "2025-01-06T02:00:00Z").unwrap()],
    )
}

fn request(min_coverage: f64) -> SuggestRequest {
    SuggestRequest {
        duration_mins: 60,
        granularity_mins: 60,
        min_coverage,
        ..SuggestRequest::new("algo", "2025-01-06T00:00:00Z", "2025-01-06T04:00:00Z")
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn planner_ranks_slots_for_group() {
    let planner = Planner::new(store(), busy_times());
    let slots = planner.suggest(&request(1.0)).unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start.as_str()).collect();
    assert_eq!(
        starts,
        vec![
            "2025-01-06T00:00:00Z",
            "2025-01-06T02:00:00Z",
            "2025-01-06T03:00:00Z"
        ]
    );
    assert!(slots.iter().all(|s| s.total_members == 2 && s.coverage_ratio == 1.0));
    assert_eq!(slots[0].end, "2025-01-06T01:00:00Z");
}

#[test]
fn planner_admits_partial_coverage_when_allowed() {
    let planner = Planner::new(store(), busy_times());
    let slots = planner.suggest(&request(0.5)).unwrap();
    assert_eq!(slots.len(), 4);
    let partial = slots.last().unwrap();
    assert_eq!(partial.start, "2025-01-06T01:00:00Z");
    assert_eq!(partial.available_members, 1);
    assert_eq!(partial.coverage_ratio, 0.5);
}

#[test]
fn concurrent_gathering_matches_sequential() {
    let sequential = Planner::new(store(), busy_times());
    let concurrent = Planner::new(store(), busy_times()).with_gathering(Gathering::Concurrent);
    assert_eq!(
        sequential.suggest(&request(0.5)).unwrap(),
        concurrent.suggest(&request(0.5)).unwrap()
    );
}

#[test]
fn unknown_group_is_an_error() {
    let planner = Planner::new(store(), busy_times());
    let mut req = request(1.0);
    req.group_id = "missing".to_string();
    assert_eq!(
        planner.suggest(&req).unwrap_err(),
        SchedulingError::GroupNotFound("missing".to_string())
    );
}

#[test]
fn invalid_request_fails_before_any_lookup() {
    let planner = Planner::new(InMemoryGroupStore::new(), StaticBusyTimes::new());
    let mut req = request(1.0);
    req.range_end = "2025-01-05T00:00:00Z".to_string();
    assert!(matches!(
        planner.suggest(&req),
        Err(SchedulingError::InvalidRange { .. })
    ));
}

#[test]
fn collaborators_can_be_borrowed() {
    let groups = store();
    let provider = busy_times();
    let planner = Planner::new(&groups, &provider);
    assert_eq!(planner.suggest(&request(1.0)).unwrap().len(), 3);
}
