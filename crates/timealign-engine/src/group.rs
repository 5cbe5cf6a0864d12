//! Group membership: who a suggestion is computed for.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};

/// Opaque member identifier (user id in the surrounding system).
pub type MemberId = String;

/// A scheduling group. The owner is always a member, whether or not it also
/// appears in `member_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub owner_id: MemberId,
    #[serde(default)]
    pub member_ids: Vec<MemberId>,
}

impl Group {
    /// Owner followed by invitees, deduplicated in first-seen order.
    pub fn members(&self) -> Vec<MemberId> {
        dedup_members(std::iter::once(&self.owner_id).chain(self.member_ids.iter()))
    }
}

/// Resolves a group id to its member set.
pub trait GroupStore: Send + Sync {
    /// Deduplicated member ids of `group_id`, or [`SchedulingError::GroupNotFound`].
    fn members(&self, group_id: &str) -> Result<Vec<MemberId>>;
}

impl<T: GroupStore + ?Sized> GroupStore for &T {
    fn members(&self, group_id: &str) -> Result<Vec<MemberId>> {
        (**self).members(group_id)
    }
}

/// A [`GroupStore`] over a fixed set of groups held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupStore {
    groups: BTreeMap<String, Group>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `groups`; a later group with a repeated id replaces
    /// the earlier one.
    pub fn from_groups(groups: impl IntoIterator<Item = Group>) -> Self {
        let mut store = Self::new();
        for group in groups {
            store.insert(group);
        }
        store
    }

    pub fn insert(&mut self, group: Group) {
        self.groups.insert(group.id.clone(), group);
    }

    pub fn get(&self, group_id: &str) -> Option<&Group> {
        self.groups.get(group_id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl GroupStore for InMemoryGroupStore {
    fn members(&self, group_id: &str) -> Result<Vec<MemberId>> {
        self.get(group_id)
            .map(Group::members)
            .ok_or_else(|| SchedulingError::GroupNotFound(group_id.to_string()))
    }
}

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup_members<I, S>(members: I) -> Vec<MemberId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    members
        .into_iter()
        .filter_map(|m| {
            let m = m.as_ref();
            seen.insert(m.to_string()).then(|| m.to_string())
        })
        .collect()
}
