//! Revision tracker

use indexmap::IndexMap;

use crate::models::{SearchId, SearchStatus};

/// Last seen status of every active search, in the order the remote
/// listed them
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatusTracker {
    statuses: IndexMap<SearchId, SearchStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every status with the contents of a poll response
    ///
    /// Returns the identifiers that were tracked before but are absent now.
    pub fn replace_all(&mut self, statuses: Vec<SearchStatus>) -> Vec<SearchId> {
        let fresh: IndexMap<SearchId, SearchStatus> =
            statuses.into_iter().map(|s| (s.id.clone(), s)).collect();

        let dropped = self
            .statuses
            .keys()
            .filter(|id| !fresh.contains_key(*id))
            .cloned()
            .collect();

        self.statuses = fresh;
        dropped
    }

    pub fn get(&self, id: &SearchId) -> Option<&SearchStatus> {
        self.statuses.get(id)
    }

    pub fn contains(&self, id: &SearchId) -> bool {
        self.statuses.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchStatus> {
        self.statuses.values()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
