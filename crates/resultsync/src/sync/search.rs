//! Search result synchronization
//!
//! Polls search status, re-fetches the selected search's results when its
//! revision grows, and keeps the selection, detail view and expanded
//! comments alive across every replacement.

use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;

use super::{PollOutcome, Selection, SyncStats};
use crate::actions::ActionHandler;
use crate::models::{FileResults, GroupingMode, SearchId, SearchStatus, SenderResults};
use crate::remote::api::{GroupByFileResponse, GroupBySenderResponse, StatusResponse};
use crate::remote::{
    RemoteService, normalize_file_results, normalize_sender_results, normalize_status,
};
use crate::storage::{DetailKey, ExpandedComments, ResultStore, StatusTracker};
use crate::view::{self, DetailView, FileRow, SenderRow, StatusRow};

/// Synchronization engine for search results
///
/// Owns the revision tracker, result store, selection and expanded
/// comments. All mutation goes through `&mut self` on one thread.
pub struct SearchSync {
    remote: Arc<dyn RemoteService>,
    actions: ActionHandler,
    statuses: StatusTracker,
    results: ResultStore,
    expanded: ExpandedComments,
    selection: Selection,
    detail: Option<DetailView>,
    stats: SyncStats,
}

impl SearchSync {
    /// Create an engine; `default_mode` is used until a search is selected
    pub fn new(remote: Arc<dyn RemoteService>, default_mode: GroupingMode) -> Self {
        Self {
            actions: ActionHandler::new(Arc::clone(&remote)),
            remote,
            statuses: StatusTracker::new(),
            results: ResultStore::new(),
            expanded: ExpandedComments::new(),
            selection: Selection::new(default_mode),
            detail: None,
            stats: SyncStats::default(),
        }
    }

    // ========================================================================
    // Status polling
    // ========================================================================

    /// Poll search status and re-fetch the selected search if it grew
    pub fn poll_status(&mut self) -> PollOutcome {
        self.stats.polls += 1;
        let response = self.remote.search_status();
        self.apply_status(response)
    }

    /// Completion of a status poll
    pub fn apply_status(&mut self, response: Result<StatusResponse>) -> PollOutcome {
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                debug!("Status poll failed: {:#}", e);
                self.stats.failures += 1;
                return PollOutcome::Dropped;
            }
        };
        let statuses = match normalize_status(response) {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!("{}", e);
                self.stats.malformed += 1;
                return PollOutcome::Dropped;
            }
        };

        let previous = self
            .selection
            .search
            .as_ref()
            .and_then(|id| self.statuses.get(id))
            .cloned();

        let dropped = self.statuses.replace_all(statuses);
        for id in dropped {
            // The selected search keeps its results so the stale view stays readable
            if self.selection.search.as_ref() == Some(&id) {
                debug!("Selected search {} is no longer active", id);
                continue;
            }
            if self.results.remove(&id) {
                info!("Dropped results of expired search {}", id);
            }
        }

        let Some(search) = self.selection.search.clone() else {
            return PollOutcome::Unchanged;
        };
        let grew = match (previous, self.statuses.get(&search)) {
            (Some(previous), Some(current)) => current.is_newer_than(&previous),
            _ => false,
        };
        if !grew {
            return PollOutcome::Unchanged;
        }

        debug!("Search {} has a new revision, re-fetching", search);
        self.fetch_results(&search, self.selection.mode);
        PollOutcome::Refetched
    }

    // ========================================================================
    // Result fetching
    // ========================================================================

    /// Fetch one grouping of a search and replace it in the store
    ///
    /// Returns true if the store was replaced.
    pub fn fetch_results(&mut self, search: &SearchId, mode: GroupingMode) -> bool {
        self.stats.fetches += 1;
        match mode {
            GroupingMode::Sender => {
                let response = self.remote.results_by_sender(search);
                self.apply_sender_results(search.clone(), response)
            }
            GroupingMode::File => {
                let response = self.remote.results_by_file(search);
                self.apply_file_results(search.clone(), response)
            }
        }
    }

    /// Completion of a group-by-sender fetch
    pub fn apply_sender_results(
        &mut self,
        search: SearchId,
        response: Result<GroupBySenderResponse>,
    ) -> bool {
        let Some(results) = self.accept(response, normalize_sender_results, &search) else {
            return false;
        };
        info!(
            "Replaced sender results of {} ({} senders, {} results)",
            search,
            results.sender_count(),
            results.result_count()
        );
        self.results.replace_sender_results(search.clone(), results);
        self.stats.replacements += 1;

        if self.selection.is_selected(&search, GroupingMode::Sender) {
            self.reapply_selection();
        }
        true
    }

    /// Completion of a group-by-file fetch
    pub fn apply_file_results(
        &mut self,
        search: SearchId,
        response: Result<GroupByFileResponse>,
    ) -> bool {
        let Some(results) = self.accept(response, normalize_file_results, &search) else {
            return false;
        };
        info!("Replaced file results of {} ({} files)", search, results.file_count());
        self.results.replace_file_results(search.clone(), results);
        self.stats.replacements += 1;

        if self.selection.is_selected(&search, GroupingMode::File) {
            self.reapply_selection();
        }
        true
    }

    /// Unwrap and normalize a fetch completion, counting what went wrong
    fn accept<W, T, E: std::fmt::Display>(
        &mut self,
        response: Result<W>,
        normalize: impl FnOnce(W) -> std::result::Result<T, E>,
        search: &SearchId,
    ) -> Option<T> {
        let wire = match response {
            Ok(wire) => wire,
            Err(e) => {
                debug!("Result fetch for {} failed: {:#}", search, e);
                self.stats.failures += 1;
                return None;
            }
        };
        match normalize(wire) {
            Ok(results) => Some(results),
            Err(e) => {
                warn!("Ignoring results for {}: {}", search, e);
                self.stats.malformed += 1;
                None
            }
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select a search and grouping
    ///
    /// Fetches only when this grouping has never been fetched for the
    /// search. Returns true if a fetch was issued.
    pub fn select(&mut self, search: SearchId, mode: GroupingMode) -> bool {
        let changed = self.selection.search.as_ref() != Some(&search);
        self.selection.set_search(search.clone(), mode);
        if changed {
            self.detail = None;
            self.purge_untracked();
        }

        if self.results.contains(&search, mode) {
            self.reapply_selection();
            return false;
        }
        self.fetch_results(&search, mode);
        true
    }

    /// Switch grouping for the selected search
    ///
    /// Returns true if a fetch was issued.
    pub fn set_grouping(&mut self, mode: GroupingMode) -> bool {
        match self.selection.search.clone() {
            Some(search) => self.select(search, mode),
            None => {
                self.selection.mode = mode;
                false
            }
        }
    }

    /// Focus a sender of the selected search
    ///
    /// Switches to sender grouping, fetching it if it was never fetched for
    /// the search. Returns true if the detail view was built.
    pub fn select_sender(&mut self, sender: impl Into<String>) -> bool {
        self.selection.sender = Some(sender.into());
        self.focus_grouping(GroupingMode::Sender)
    }

    /// Focus a file of the selected search
    ///
    /// Switches to file grouping, fetching it if it was never fetched for
    /// the search. Returns true if the detail view was built.
    pub fn select_file(&mut self, content_id: impl Into<String>) -> bool {
        self.selection.file = Some(content_id.into());
        self.focus_grouping(GroupingMode::File)
    }

    fn focus_grouping(&mut self, mode: GroupingMode) -> bool {
        if let Some(search) = self.selection.search.clone()
            && !self.results.contains(&search, mode)
        {
            self.select(search, mode);
        }
        self.selection.mode = mode;
        self.reapply_selection()
    }

    /// Rebuild the detail view for the focused key from the current store
    ///
    /// A focused key that is missing or has no results leaves the previous
    /// view as it was.
    fn reapply_selection(&mut self) -> bool {
        let Some(search) = self.selection.search.as_ref() else {
            return false;
        };
        let Some(focus) = self.selection.focus() else {
            return false;
        };

        let view = match self.selection.mode {
            GroupingMode::Sender => self
                .results
                .sender_results(search)
                .and_then(|r| {
                    r.bucket(focus)
                        .filter(|b| !b.results.is_empty())
                        .map(|b| view::sender_detail(search, b, &self.expanded))
                }),
            GroupingMode::File => self
                .results
                .file_results(search)
                .and_then(|r| {
                    r.bucket(focus)
                        .filter(|b| !b.results.is_empty())
                        .map(|b| view::file_detail(search, b, &self.expanded))
                }),
        };

        match view {
            Some(view) => {
                self.detail = Some(view);
                true
            }
            None => {
                debug!(
                    "{} {} not in current results, keeping detail view",
                    self.selection.mode, focus
                );
                false
            }
        }
    }

    /// Drop cached results of searches the last status poll no longer lists
    fn purge_untracked(&mut self) {
        let stale: Vec<SearchId> = self
            .results
            .searches()
            .filter(|id| !self.statuses.contains(id) && self.selection.search.as_ref() != Some(*id))
            .cloned()
            .collect();
        for id in stale {
            self.results.remove(&id);
        }
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Expand a comment panel, retaining the comment from current results
    ///
    /// Returns false if the key has no comment in the current results.
    pub fn expand_comment(&mut self, key: DetailKey) -> bool {
        let Some(comment) = self.results.comment(&key) else {
            return false;
        };
        self.expanded.expand(key, comment);
        self.reapply_selection();
        true
    }

    /// Collapse a comment panel; the only way an expanded entry goes away
    pub fn collapse_comment(&mut self, key: &DetailKey) -> bool {
        let removed = self.expanded.collapse(key);
        if removed {
            self.reapply_selection();
        }
        removed
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Request a download; the entry shows as downloading after a later fetch
    pub fn download(&self, content_id: &str, search: &SearchId) -> bool {
        match self.actions.download(content_id, search) {
            Ok(()) => true,
            Err(e) => {
                debug!("{:#}", e);
                false
            }
        }
    }

    /// Request browsing a sender; shows as browsing after a later fetch
    pub fn browse(&self, sender_key: &str) -> bool {
        match self.actions.browse(sender_key) {
            Ok(()) => true,
            Err(e) => {
                debug!("{:#}", e);
                false
            }
        }
    }

    // ========================================================================
    // Read-only accessors
    // ========================================================================

    pub fn status(&self, search: &SearchId) -> Option<&SearchStatus> {
        self.statuses.get(search)
    }

    pub fn status_rows(&self) -> Vec<StatusRow> {
        self.statuses.iter().map(StatusRow::from).collect()
    }

    pub fn sender_results(&self, search: &SearchId) -> Option<Arc<SenderResults>> {
        self.results.sender_results(search)
    }

    pub fn file_results(&self, search: &SearchId) -> Option<Arc<FileResults>> {
        self.results.file_results(search)
    }

    /// Sender overview of the selected search, if fetched
    pub fn sender_rows(&self) -> Option<Vec<SenderRow>> {
        let search = self.selection.search.as_ref()?;
        self.results.sender_results(search).map(|r| view::sender_overview(&r))
    }

    /// File overview of the selected search, if fetched
    pub fn file_rows(&self) -> Option<Vec<FileRow>> {
        let search = self.selection.search.as_ref()?;
        self.results.file_results(search).map(|r| view::file_overview(&r))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn expanded(&self) -> &ExpandedComments {
        &self.expanded
    }

    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }
}
