//! Subscription list synchronization
//!
//! Polls the global trust revision and re-fetches the subscription list
//! when it grows. Trust mutations skip the revision check and re-fetch
//! right away.

use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;

use super::{PollOutcome, SyncStats};
use crate::actions::ActionHandler;
use crate::models::{PersonaLists, SortConfig, SortKey, TrustAction, TrustListSummary};
use crate::remote::api::{RevisionResponse, SubscriptionsResponse, TrustListResponse};
use crate::remote::{
    RemoteService, normalize_revision, normalize_subscriptions, normalize_trust_list,
};

/// Synchronization engine for subscribed trust lists
pub struct SubscriptionSync {
    remote: Arc<dyn RemoteService>,
    actions: ActionHandler,
    revision: Option<u64>,
    lists: Arc<Vec<TrustListSummary>>,
    sort: SortConfig,
    /// User whose persona lists are open
    current_user: Option<String>,
    personas: Option<Arc<PersonaLists>>,
    stats: SyncStats,
}

impl SubscriptionSync {
    pub fn new(remote: Arc<dyn RemoteService>, sort: SortConfig) -> Self {
        Self {
            actions: ActionHandler::new(Arc::clone(&remote)),
            remote,
            revision: None,
            lists: Arc::new(Vec::new()),
            sort,
            current_user: None,
            personas: None,
            stats: SyncStats::default(),
        }
    }

    /// Poll the trust revision and refresh the list if it grew
    pub fn poll_revision(&mut self) -> PollOutcome {
        self.stats.polls += 1;
        let response = self.remote.subscription_revision();
        self.apply_revision(response)
    }

    /// Completion of a revision poll
    ///
    /// The first revision ever seen counts as growth.
    pub fn apply_revision(&mut self, response: Result<RevisionResponse>) -> PollOutcome {
        let revision = match response.map(normalize_revision) {
            Ok(Ok(revision)) => revision,
            Ok(Err(e)) => {
                warn!("{}", e);
                self.stats.malformed += 1;
                return PollOutcome::Dropped;
            }
            Err(e) => {
                debug!("Trust revision poll failed: {:#}", e);
                self.stats.failures += 1;
                return PollOutcome::Dropped;
            }
        };

        if self.revision.is_some_and(|seen| revision <= seen) {
            return PollOutcome::Unchanged;
        }
        debug!("Trust revision {:?} -> {}", self.revision, revision);
        self.revision = Some(revision);
        self.refresh_lists();
        PollOutcome::Refetched
    }

    /// Fetch the subscription list with the current sort
    ///
    /// Returns true if the list was replaced.
    pub fn refresh_lists(&mut self) -> bool {
        self.stats.fetches += 1;
        let response = self.remote.subscriptions(self.sort);
        self.apply_subscriptions(response)
    }

    /// Completion of a subscription list fetch
    ///
    /// Also re-fetches the open persona lists.
    pub fn apply_subscriptions(&mut self, response: Result<SubscriptionsResponse>) -> bool {
        let lists = match response.map(normalize_subscriptions) {
            Ok(Ok(lists)) => lists,
            Ok(Err(e)) => {
                warn!("{}", e);
                self.stats.malformed += 1;
                return false;
            }
            Err(e) => {
                debug!("Subscription list fetch failed: {:#}", e);
                self.stats.failures += 1;
                return false;
            }
        };

        info!("Replaced subscription list ({} lists)", lists.len());
        self.lists = Arc::new(lists);
        self.stats.replacements += 1;

        if self.current_user.is_some() {
            self.refresh_persona_list();
        }
        true
    }

    /// Sort by a column and re-fetch
    ///
    /// The same column flips the order; a new column starts at its default.
    pub fn sort_by(&mut self, key: SortKey) -> bool {
        self.sort.toggle(key);
        debug!("Sorting subscriptions by {} {}", key.as_str(), self.sort.order.as_str());
        self.refresh_lists()
    }

    // ========================================================================
    // Persona lists
    // ========================================================================

    /// Open the persona lists published by `user`
    ///
    /// Returns true if the lists were fetched.
    pub fn display_list(&mut self, user: impl Into<String>) -> bool {
        self.current_user = Some(user.into());
        self.refresh_persona_list()
    }

    /// Close the open persona lists
    pub fn close_list(&mut self) {
        self.current_user = None;
        self.personas = None;
    }

    fn refresh_persona_list(&mut self) -> bool {
        let Some(user) = self.current_user.clone() else {
            return false;
        };
        let Some(user_key) = self.summary(&user).map(|s| s.user_key.clone()) else {
            debug!("{} is not in the subscription list", user);
            return false;
        };

        self.stats.fetches += 1;
        let response = self.remote.trust_list(&user_key);
        self.apply_persona_list(&user, response)
    }

    /// Completion of a persona list fetch
    ///
    /// Ignored if another user's lists were opened in the meantime.
    pub fn apply_persona_list(&mut self, user: &str, response: Result<TrustListResponse>) -> bool {
        if self.current_user.as_deref() != Some(user) {
            return false;
        }
        match response.map(|r| normalize_trust_list(user, r)) {
            Ok(Ok(lists)) => {
                debug!(
                    "Loaded trust list of {} ({} trusted, {} distrusted)",
                    user,
                    lists.trusted.len(),
                    lists.distrusted.len()
                );
                self.personas = Some(Arc::new(lists));
                self.stats.replacements += 1;
                true
            }
            Ok(Err(e)) => {
                warn!("{}", e);
                self.stats.malformed += 1;
                false
            }
            Err(e) => {
                debug!("Trust list fetch for {} failed: {:#}", user, e);
                self.stats.failures += 1;
                false
            }
        }
    }

    // ========================================================================
    // Trust mutations
    // ========================================================================

    pub fn mark_trusted(&mut self, user_key: &str, reason: &str) -> bool {
        self.mutate(TrustAction::Trust, user_key, Some(reason))
    }

    pub fn mark_distrusted(&mut self, user_key: &str, reason: &str) -> bool {
        self.mutate(TrustAction::Distrust, user_key, Some(reason))
    }

    pub fn mark_neutral(&mut self, user_key: &str) -> bool {
        self.mutate(TrustAction::Neutral, user_key, None)
    }

    pub fn unsubscribe(&mut self, user_key: &str) -> bool {
        self.mutate(TrustAction::Unsubscribe, user_key, None)
    }

    /// Ask the remote to re-download a subscribed list now
    pub fn force_refresh(&mut self, user_key: &str) -> bool {
        self.mutate(TrustAction::Subscribe, user_key, None)
    }

    /// Apply a trust action and, if accepted, re-fetch without looking at
    /// the revision
    fn mutate(&mut self, action: TrustAction, user_key: &str, reason: Option<&str>) -> bool {
        if let Err(e) = self.actions.trust(action, user_key, reason) {
            debug!("{:#}", e);
            return false;
        }
        self.refresh_lists();
        true
    }

    // ========================================================================
    // Read-only accessors
    // ========================================================================

    pub fn lists(&self) -> Arc<Vec<TrustListSummary>> {
        Arc::clone(&self.lists)
    }

    pub fn summary(&self, user: &str) -> Option<&TrustListSummary> {
        self.lists.iter().find(|s| s.user == user)
    }

    pub fn personas(&self) -> Option<Arc<PersonaLists>> {
        self.personas.clone()
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }
}
