//! HTTP client for the remote search/trust service
//!
//! Uses synchronous HTTP (ureq) to be executor-agnostic. Each call is a
//! single request; there is no retry or backoff.

use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::api::{
    GroupByFileResponse, GroupBySenderResponse, RevisionResponse, StatusResponse,
    SubscriptionsResponse, TrustListResponse,
};
use super::{RemoteService, RemoteStatusError};
use crate::models::{GroupingMode, SearchId, SortConfig, TrustAction};

/// HTTP implementation of [`RemoteService`]
pub struct HttpRemote {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpRemote {
    /// Create a client rooted at `base_url` (e.g. `http://127.0.0.1:7070/api`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn status_url(&self) -> String {
        format!("{}/search?section=status", self.base_url)
    }

    fn results_url(&self, search: &SearchId, mode: GroupingMode) -> String {
        format!(
            "{}/search?section={}&searchId={}",
            self.base_url,
            mode.section(),
            urlencoding::encode(search.as_str())
        )
    }

    fn subscriptions_url(&self, sort: SortConfig) -> String {
        format!(
            "{}/trust?section=subscriptions&key={}&order={}",
            self.base_url,
            urlencoding::encode(sort.key.as_str()),
            sort.order.as_str()
        )
    }

    fn trust_list_url(&self, user_key: &str) -> String {
        format!(
            "{}/trust?section=list&userKey={}",
            self.base_url,
            urlencoding::encode(user_key)
        )
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!("GET {}", url);
        match self.agent.get(url).call() {
            Ok(mut response) => response
                .body_mut()
                .read_json()
                .with_context(|| format!("Failed to parse {} response", what)),
            Err(ureq::Error::StatusCode(status)) => Err(RemoteStatusError { status }.into()),
            Err(e) => {
                Err(anyhow::Error::new(e).context(format!("Failed to send {} request", what)))
            }
        }
    }

    fn post_form(&self, path: &str, form: &[(&str, &str)], what: &str) -> Result<()> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("POST {} action={:?}", url, form.first().map(|(_, v)| *v));
        match self.agent.post(&url).send_form(form.iter().copied()) {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(status)) => Err(RemoteStatusError { status }.into()),
            Err(e) => {
                Err(anyhow::Error::new(e).context(format!("Failed to send {} request", what)))
            }
        }
    }
}

impl RemoteService for HttpRemote {
    fn search_status(&self) -> Result<StatusResponse> {
        self.get_json(&self.status_url(), "status")
    }

    fn results_by_sender(&self, search: &SearchId) -> Result<GroupBySenderResponse> {
        self.get_json(&self.results_url(search, GroupingMode::Sender), "group by sender")
    }

    fn results_by_file(&self, search: &SearchId) -> Result<GroupByFileResponse> {
        self.get_json(&self.results_url(search, GroupingMode::File), "group by file")
    }

    fn download(&self, content_id: &str, search: &SearchId) -> Result<()> {
        self.post_form(
            "download",
            &[("action", "start"), ("contentId", content_id), ("searchId", search.as_str())],
            "download",
        )
    }

    fn browse(&self, sender_key: &str) -> Result<()> {
        self.post_form("browse", &[("action", "browse"), ("senderKey", sender_key)], "browse")
    }

    fn subscription_revision(&self) -> Result<RevisionResponse> {
        let url = format!("{}/trust?section=revision", self.base_url);
        self.get_json(&url, "trust revision")
    }

    fn subscriptions(&self, sort: SortConfig) -> Result<SubscriptionsResponse> {
        self.get_json(&self.subscriptions_url(sort), "subscriptions")
    }

    fn trust_list(&self, user_key: &str) -> Result<TrustListResponse> {
        self.get_json(&self.trust_list_url(user_key), "trust list")
    }

    fn trust(&self, action: TrustAction, persona: &str, reason: Option<&str>) -> Result<()> {
        let mut form = vec![("action", action.as_str()), ("persona", persona)];
        if let Some(reason) = reason {
            form.push(("reason", reason));
        }
        self.post_form("trust", &form, "trust")
    }
}
