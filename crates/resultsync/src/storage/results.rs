//! Result store
//!
//! Each `(search, grouping)` slot holds an `Arc` root that is swapped as a
//! whole. Readers keep the snapshot they cloned, so a replacement is never
//! observed half-built.

use std::collections::HashMap;
use std::sync::Arc;

use super::DetailKey;
use crate::models::{FileResults, GroupingMode, SearchId, SenderResults};

#[derive(Debug, Default, Clone)]
pub struct ResultStore {
    by_sender: HashMap<SearchId, Arc<SenderResults>>,
    by_file: HashMap<SearchId, Arc<FileResults>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_sender_results(&mut self, search: SearchId, results: SenderResults) {
        self.by_sender.insert(search, Arc::new(results));
    }

    pub fn replace_file_results(&mut self, search: SearchId, results: FileResults) {
        self.by_file.insert(search, Arc::new(results));
    }

    pub fn sender_results(&self, search: &SearchId) -> Option<Arc<SenderResults>> {
        self.by_sender.get(search).cloned()
    }

    pub fn file_results(&self, search: &SearchId) -> Option<Arc<FileResults>> {
        self.by_file.get(search).cloned()
    }

    /// Whether the grouping has been fetched for this search
    pub fn contains(&self, search: &SearchId, mode: GroupingMode) -> bool {
        match mode {
            GroupingMode::Sender => self.by_sender.contains_key(search),
            GroupingMode::File => self.by_file.contains_key(search),
        }
    }

    /// Drop both groupings of a search
    pub fn remove(&mut self, search: &SearchId) -> bool {
        let sender = self.by_sender.remove(search).is_some();
        let file = self.by_file.remove(search).is_some();
        sender || file
    }

    /// Comment addressed by an expanded-detail key, read from the current
    /// result set of the key's grouping
    pub fn comment(&self, key: &DetailKey) -> Option<String> {
        match key.mode {
            GroupingMode::Sender => self
                .by_sender
                .get(&key.search)?
                .comment(&key.outer, &key.inner)
                .map(str::to_string),
            GroupingMode::File => self
                .by_file
                .get(&key.search)?
                .comment(&key.outer, &key.inner)
                .map(str::to_string),
        }
    }

    pub fn searches(&self) -> impl Iterator<Item = &SearchId> {
        let files = self.by_file.keys().filter(|id| !self.by_sender.contains_key(*id));
        self.by_sender.keys().chain(files)
    }
}
