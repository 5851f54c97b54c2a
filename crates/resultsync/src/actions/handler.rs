//! Action handler for remote mutations
//!
//! Every action is a single request. Local state is never updated
//! optimistically: the remote reports the effect on a later fetch.

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use crate::models::{SearchId, TrustAction};
use crate::remote::RemoteService;

/// Issues mutating requests against the remote service
pub struct ActionHandler {
    remote: Arc<dyn RemoteService>,
}

impl ActionHandler {
    pub fn new(remote: Arc<dyn RemoteService>) -> Self {
        Self { remote }
    }

    /// Ask the remote to download a result of a search
    ///
    /// The entry shows as downloading once the next result fetch says so.
    pub fn download(&self, content_id: &str, search: &SearchId) -> Result<()> {
        self.remote
            .download(content_id, search)
            .with_context(|| format!("Failed to start download of {}", content_id))?;
        info!("Requested download of {} from search {}", content_id, search);
        Ok(())
    }

    /// Ask the remote to browse a sender's shared files
    pub fn browse(&self, sender_key: &str) -> Result<()> {
        self.remote
            .browse(sender_key)
            .with_context(|| format!("Failed to start browsing {}", sender_key))?;
        info!("Requested browse of {}", sender_key);
        Ok(())
    }

    /// Apply a trust action to a persona
    ///
    /// `reason` is only sent for trust and distrust.
    pub fn trust(&self, action: TrustAction, persona: &str, reason: Option<&str>) -> Result<()> {
        let reason = match action {
            TrustAction::Trust | TrustAction::Distrust => Some(reason.unwrap_or_default()),
            TrustAction::Neutral | TrustAction::Subscribe | TrustAction::Unsubscribe => None,
        };

        self.remote
            .trust(action, persona, reason)
            .with_context(|| format!("Failed to {} {}", action.as_str(), persona))?;
        info!("Applied {} to {}", action.as_str(), persona);
        Ok(())
    }
}
