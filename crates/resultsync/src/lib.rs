//! Resultsync crate - Business logic for keeping search results in sync
//!
//! This crate provides a polling client for a remote peer-to-peer search
//! service, including:
//! - Domain models (SearchStatus, result buckets, trust lists)
//! - Remote service trait, HTTP client and response normalization
//! - In-memory revision tracker, result store and expanded comment state
//! - Revision-gated sync engines for search results and subscriptions
//! - Presentation-neutral view models for front ends
//!
//! This crate has zero UI dependencies.

pub mod actions;
pub mod config;
pub mod models;
pub mod remote;
pub mod storage;
pub mod sync;
pub mod view;

pub use actions::ActionHandler;
pub use config::ClientConfig;
pub use models::{
    FileBucket, FileResults, GroupingMode, Persona, PersonaLists, ResultEntry, SearchId,
    SearchStatus, SenderBucket, SenderEntry, SenderResults, SortConfig, SortKey, SortOrder,
    TrustAction, TrustLevel, TrustListSummary,
};
pub use remote::{HttpRemote, MalformedResponse, RemoteService, RemoteStatusError};
pub use storage::{DetailKey, ExpandedComments, ResultStore, StatusTracker};
pub use sync::{
    DEFAULT_POLL_INTERVAL_MS, PollOutcome, SearchSync, Selection, SubscriptionSync, SyncStats,
    poll_due, time_until_due,
};
pub use view::{BrowseCell, CommentCell, DetailView, DownloadCell};
