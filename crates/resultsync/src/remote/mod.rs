//! Remote search/trust service integration
//!
//! This module provides:
//! - Wire types for the service's JSON responses
//! - The [`RemoteService`] seam the sync engines talk through
//! - An HTTP client implementing it
//! - Normalization of wire records into domain models

mod client;
mod normalize;

pub use client::HttpRemote;
pub use normalize::{
    normalize_file_results, normalize_revision, normalize_sender_results, normalize_status,
    normalize_subscriptions, normalize_trust_list,
};

use anyhow::Result;

use crate::models::{SearchId, SortConfig, TrustAction};

/// The remote answered with a non-success status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Remote returned status {status}")]
pub struct RemoteStatusError {
    pub status: u16,
}

/// A response was missing a field it must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Malformed {record} response: missing field `{field}`")]
pub struct MalformedResponse {
    pub record: &'static str,
    pub field: &'static str,
}

/// Request/response contracts of the remote search and trust service
///
/// Every call is one request; implementations must not retry.
pub trait RemoteService {
    /// Status of every active search
    fn search_status(&self) -> Result<api::StatusResponse>;

    /// Results of one search grouped by sender
    fn results_by_sender(&self, search: &SearchId) -> Result<api::GroupBySenderResponse>;

    /// Results of one search grouped by file
    fn results_by_file(&self, search: &SearchId) -> Result<api::GroupByFileResponse>;

    /// Ask the remote to start downloading a result
    fn download(&self, content_id: &str, search: &SearchId) -> Result<()>;

    /// Ask the remote to browse everything a sender shares
    fn browse(&self, sender_key: &str) -> Result<()>;

    /// Global revision of the subscription list
    fn subscription_revision(&self) -> Result<api::RevisionResponse>;

    /// Subscribed trust lists, sorted remotely
    fn subscriptions(&self, sort: SortConfig) -> Result<api::SubscriptionsResponse>;

    /// Trusted and distrusted personas published by one user
    fn trust_list(&self, user_key: &str) -> Result<api::TrustListResponse>;

    /// Apply a trust mutation to a persona
    fn trust(&self, action: TrustAction, persona: &str, reason: Option<&str>) -> Result<()>;
}

/// Wire response types
///
/// Fields the remote must send are still `Option` here so that a missing
/// field is reported by name during normalization.
pub mod api {
    use serde::{Deserialize, Serialize};

    /// Response from the status section
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StatusResponse {
        pub searches: Option<Vec<SearchStatusRecord>>,
    }

    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SearchStatusRecord {
        pub search_id: Option<String>,
        pub query: Option<String>,
        pub revision: Option<u64>,
        pub senders: Option<u32>,
        pub results: Option<u32>,
    }

    /// Response from the group-by-sender section
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupBySenderResponse {
        pub results_by_sender: Option<Vec<SenderRecord>>,
    }

    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SenderRecord {
        pub sender: Option<String>,
        pub sender_key: Option<String>,
        pub browse: Option<bool>,
        pub browsing: Option<bool>,
        #[serde(default)]
        pub results: Vec<SenderResultRecord>,
    }

    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SenderResultRecord {
        pub name: Option<String>,
        pub size: Option<u64>,
        pub content_id: Option<String>,
        pub downloading: Option<bool>,
        pub comment: Option<String>,
    }

    /// Response from the group-by-file section
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupByFileResponse {
        pub results_by_file: Option<Vec<FileRecord>>,
    }

    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileRecord {
        pub name: Option<String>,
        pub content_id: Option<String>,
        pub size: Option<u64>,
        pub downloading: Option<bool>,
        #[serde(default)]
        pub results: Vec<FileResultRecord>,
    }

    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileResultRecord {
        pub sender: Option<String>,
        pub sender_key: Option<String>,
        pub browse: Option<bool>,
        pub browsing: Option<bool>,
        pub comment: Option<String>,
    }

    /// Response from the trust revision section
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    pub struct RevisionResponse {
        pub revision: Option<u64>,
    }

    /// Response from the subscriptions section
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    pub struct SubscriptionsResponse {
        pub subscriptions: Option<Vec<SubscriptionRecord>>,
    }

    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SubscriptionRecord {
        pub user: Option<String>,
        pub user_key: Option<String>,
        pub status: Option<String>,
        /// Milliseconds since the epoch
        pub timestamp: Option<i64>,
        pub trusted: Option<u32>,
        pub distrusted: Option<u32>,
    }

    /// Response from the trust list section
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    pub struct TrustListResponse {
        pub trusted: Option<Vec<PersonaRecord>>,
        pub distrusted: Option<Vec<PersonaRecord>>,
    }

    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PersonaRecord {
        pub user: Option<String>,
        pub user_key: Option<String>,
        pub reason: Option<String>,
        pub status: Option<String>,
    }
}
