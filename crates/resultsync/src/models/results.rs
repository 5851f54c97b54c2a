//! Hierarchical result sets in their two groupings
//!
//! Buckets keep the order the remote listed them in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One result offered by a sender, as seen in the by-sender grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub name: String,
    pub size: u64,
    pub content_id: String,
    pub download_in_progress: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

/// All results received from one sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderBucket {
    /// Human-readable sender name
    pub sender: String,
    /// Key used to address the sender in browse requests
    pub sender_key: String,
    pub browse_capable: bool,
    pub currently_browsing: bool,
    /// Keyed by content id
    pub results: IndexMap<String, ResultEntry>,
}

/// One sender offering a file, as seen in the by-file grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderEntry {
    pub sender: String,
    pub sender_key: String,
    pub browse_capable: bool,
    pub currently_browsing: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

/// All senders offering one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBucket {
    pub name: String,
    pub content_id: String,
    pub size: u64,
    pub download_in_progress: bool,
    /// Keyed by sender name
    pub results: IndexMap<String, SenderEntry>,
}

/// Result set of one search grouped by sender
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderResults {
    pub buckets: IndexMap<String, SenderBucket>,
}

impl SenderResults {
    pub fn new(buckets: IndexMap<String, SenderBucket>) -> Self {
        Self { buckets }
    }

    pub fn bucket(&self, sender: &str) -> Option<&SenderBucket> {
        self.buckets.get(sender)
    }

    /// Comment attached to the result `content_id` offered by `sender`
    pub fn comment(&self, sender: &str, content_id: &str) -> Option<&str> {
        self.bucket(sender)?
            .results
            .get(content_id)?
            .comment
            .as_deref()
    }

    pub fn sender_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of results across all senders
    pub fn result_count(&self) -> usize {
        self.buckets.values().map(|b| b.results.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Result set of one search grouped by file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResults {
    pub buckets: IndexMap<String, FileBucket>,
}

impl FileResults {
    pub fn new(buckets: IndexMap<String, FileBucket>) -> Self {
        Self { buckets }
    }

    pub fn bucket(&self, content_id: &str) -> Option<&FileBucket> {
        self.buckets.get(content_id)
    }

    /// Comment `sender` attached to the file `content_id`
    pub fn comment(&self, content_id: &str, sender: &str) -> Option<&str> {
        self.bucket(content_id)?
            .results
            .get(sender)?
            .comment
            .as_deref()
    }

    pub fn file_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
