//! Expanded comment panels
//!
//! Entries are keyed independently of any fetch and are only removed by an
//! explicit collapse.

use std::collections::HashMap;

use crate::models::{GroupingMode, SearchId};

/// Address of one comment panel
///
/// In the sender grouping `outer` is the sender and `inner` the content id;
/// in the file grouping it is the other way round.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailKey {
    pub search: SearchId,
    pub mode: GroupingMode,
    pub outer: String,
    pub inner: String,
}

impl DetailKey {
    pub fn new(
        search: SearchId,
        mode: GroupingMode,
        outer: impl Into<String>,
        inner: impl Into<String>,
    ) -> Self {
        Self {
            search,
            mode,
            outer: outer.into(),
            inner: inner.into(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ExpandedComments {
    entries: HashMap<DetailKey, String>,
}

impl ExpandedComments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain `content` for `key`, replacing any earlier content
    pub fn expand(&mut self, key: DetailKey, content: impl Into<String>) {
        self.entries.insert(key, content.into());
    }

    /// Returns true if the panel was expanded
    pub fn collapse(&mut self, key: &DetailKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn get(&self, key: &DetailKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_expanded(&self, key: &DetailKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
