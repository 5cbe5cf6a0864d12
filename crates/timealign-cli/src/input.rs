//! Input document and flag merging.
//!
//! A document bundles everything the planner needs:
//!
//! ```json
//! {
//!   "request":  { "group_id": "algo", "range_start": "...", "range_end": "..." },
//!   "groups":   [ { "id": "algo", "owner_id": "alice", "member_ids": ["bob"] } ],
//!   "calendar": { "alice": [ { "kind": "once", "start": "...", "end": "..." } ] }
//! }
//! ```
//!
//! Every section is optional; command-line flags fill or override the request.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use timealign_engine::dto::{DEFAULT_DURATION_MINS, DEFAULT_GRANULARITY_MINS, DEFAULT_MIN_COVERAGE};
use timealign_engine::{Group, InMemoryGroupStore, RecurringCalendar, SuggestRequest};

/// Group id used when members are given on the command line.
pub const AD_HOC_GROUP: &str = "ad-hoc";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputDocument {
    pub request: RequestFields,
    pub groups: Vec<Group>,
    pub calendar: RecurringCalendar,
}

/// A request where every field may still be missing.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestFields {
    pub group_id: Option<String>,
    pub range_start: Option<String>,
    pub range_end: Option<String>,
    pub duration_mins: Option<i64>,
    pub granularity_mins: Option<i64>,
    pub min_coverage: Option<f64>,
    pub timezone: Option<String>,
}

impl RequestFields {
    /// Fields set in `overrides` win over fields set in `self`.
    pub fn overridden_by(self, overrides: RequestFields) -> RequestFields {
        RequestFields {
            group_id: overrides.group_id.or(self.group_id),
            range_start: overrides.range_start.or(self.range_start),
            range_end: overrides.range_end.or(self.range_end),
            duration_mins: overrides.duration_mins.or(self.duration_mins),
            granularity_mins: overrides.granularity_mins.or(self.granularity_mins),
            min_coverage: overrides.min_coverage.or(self.min_coverage),
            timezone: overrides.timezone.or(self.timezone),
        }
    }

    /// Fill defaults and require the fields that have none.
    pub fn into_request(self) -> Result<SuggestRequest> {
        let Some(group_id) = self.group_id else {
            bail!("No group given: set request.group_id in the document, --group, or --members");
        };
        let Some(range_start) = self.range_start else {
            bail!("No range start given: set request.range_start or --range-start");
        };
        let Some(range_end) = self.range_end else {
            bail!("No range end given: set request.range_end or --range-end");
        };

        let mut request = SuggestRequest::new(group_id, range_start, range_end);
        request.duration_mins = self.duration_mins.unwrap_or(DEFAULT_DURATION_MINS);
        request.granularity_mins = self.granularity_mins.unwrap_or(DEFAULT_GRANULARITY_MINS);
        request.min_coverage = self.min_coverage.unwrap_or(DEFAULT_MIN_COVERAGE);
        if let Some(timezone) = self.timezone {
            request.timezone = timezone;
        }
        Ok(request)
    }
}

pub fn parse_document(text: &str) -> Result<InputDocument> {
    if text.trim().is_empty() {
        return Ok(InputDocument::default());
    }
    serde_json::from_str(text).context("Failed to parse input document")
}

/// Groups from the document, plus an ad-hoc group when `members` is non-empty.
pub fn build_group_store(groups: Vec<Group>, members: &[String]) -> Result<InMemoryGroupStore> {
    let mut store = InMemoryGroupStore::from_groups(groups);
    if let Some((owner, rest)) = members.split_first() {
        if store.get(AD_HOC_GROUP).is_some() {
            bail!("Document already defines a group named '{AD_HOC_GROUP}'; drop --members or rename it");
        }
        store.insert(Group {
            id: AD_HOC_GROUP.to_string(),
            name: "command-line members".to_string(),
            owner_id: owner.clone(),
            member_ids: rest.to_vec(),
        });
    }
    Ok(store)
}
