//! Search session models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of one remote search session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SearchId(pub String);

impl SearchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SearchId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SearchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SearchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Snapshot of one active search as reported by a status poll
///
/// Superseded wholesale on every poll, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatus {
    pub id: SearchId,
    /// Query text the search was started with
    pub query: String,
    /// Grows whenever the remote result set for this search changes
    pub revision: u64,
    pub sender_count: u32,
    pub result_count: u32,
}

impl SearchStatus {
    pub fn new(
        id: SearchId,
        query: impl Into<String>,
        revision: u64,
        sender_count: u32,
        result_count: u32,
    ) -> Self {
        Self {
            id,
            query: query.into(),
            revision,
            sender_count,
            result_count,
        }
    }

    /// True when `self` is a strictly newer revision than `previous`
    pub fn is_newer_than(&self, previous: &SearchStatus) -> bool {
        self.revision > previous.revision
    }
}

/// The two alternate hierarchical views of a search's results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    #[default]
    Sender,
    File,
}

impl GroupingMode {
    /// Value of the `section` query parameter for this grouping
    pub fn section(self) -> &'static str {
        match self {
            GroupingMode::Sender => "groupBySender",
            GroupingMode::File => "groupByFile",
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingMode::Sender => f.write_str("sender"),
            GroupingMode::File => f.write_str("file"),
        }
    }
}
