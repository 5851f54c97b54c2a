//! Presentation-neutral row models
//!
//! Front ends turn these into markup, widgets or log lines. Nothing here
//! talks to the remote or mutates engine state.

use serde::Serialize;

use crate::models::{
    FileBucket, FileResults, GroupingMode, SearchId, SearchStatus, SenderBucket, SenderResults,
};
use crate::storage::{DetailKey, ExpandedComments};

/// What to show in a download column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DownloadCell {
    /// Offer a download action
    Link,
    /// The remote reported the download as started
    Downloading,
}

impl DownloadCell {
    pub fn from_state(download_in_progress: bool) -> Self {
        if download_in_progress {
            DownloadCell::Downloading
        } else {
            DownloadCell::Link
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DownloadCell::Link => "Download",
            DownloadCell::Downloading => "Downloading",
        }
    }
}

/// What to show in a browse column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BrowseCell {
    /// Sender does not allow browsing
    Unavailable,
    Link { sender_key: String },
    Browsing,
}

impl BrowseCell {
    pub fn from_state(browse_capable: bool, currently_browsing: bool, sender_key: &str) -> Self {
        match (browse_capable, currently_browsing) {
            (false, _) => BrowseCell::Unavailable,
            (true, true) => BrowseCell::Browsing,
            (true, false) => BrowseCell::Link {
                sender_key: sender_key.to_string(),
            },
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            BrowseCell::Unavailable => None,
            BrowseCell::Link { .. } => Some("Browse"),
            BrowseCell::Browsing => Some("Browsing"),
        }
    }
}

/// Comment state of a detail row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CommentCell {
    None,
    Collapsed,
    Expanded(String),
}

impl CommentCell {
    fn resolve(comment: Option<&String>, key: &DetailKey, expanded: &ExpandedComments) -> Self {
        match (comment, expanded.get(key)) {
            (None, _) => CommentCell::None,
            (Some(_), Some(retained)) => CommentCell::Expanded(retained.to_string()),
            (Some(_), None) => CommentCell::Collapsed,
        }
    }
}

/// One row of the active searches table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub search: SearchId,
    pub query: String,
    pub senders: u32,
    pub results: u32,
}

impl From<&SearchStatus> for StatusRow {
    fn from(status: &SearchStatus) -> Self {
        Self {
            search: status.id.clone(),
            query: status.query.clone(),
            senders: status.sender_count,
            results: status.result_count,
        }
    }
}

/// One sender in the by-sender overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderRow {
    pub sender: String,
    pub browse: BrowseCell,
}

/// One file in the by-file overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    pub content_id: String,
    pub name: String,
    pub size: u64,
    pub download: DownloadCell,
}

pub fn sender_overview(results: &SenderResults) -> Vec<SenderRow> {
    results
        .buckets
        .values()
        .map(|b| SenderRow {
            sender: b.sender.clone(),
            browse: BrowseCell::from_state(b.browse_capable, b.currently_browsing, &b.sender_key),
        })
        .collect()
}

pub fn file_overview(results: &FileResults) -> Vec<FileRow> {
    results
        .buckets
        .values()
        .map(|b| FileRow {
            content_id: b.content_id.clone(),
            name: b.name.clone(),
            size: b.size,
            download: DownloadCell::from_state(b.download_in_progress),
        })
        .collect()
}

/// One result of the selected sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderDetailRow {
    pub content_id: String,
    pub name: String,
    pub size: u64,
    pub download: DownloadCell,
    pub comment: CommentCell,
}

/// One sender of the selected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDetailRow {
    pub sender: String,
    pub browse: BrowseCell,
    pub comment: CommentCell,
}

/// Detail view of the selected sender or file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DetailView {
    Sender {
        search: SearchId,
        sender: String,
        rows: Vec<SenderDetailRow>,
    },
    File {
        search: SearchId,
        content_id: String,
        name: String,
        rows: Vec<FileDetailRow>,
    },
}

impl DetailView {
    pub fn mode(&self) -> GroupingMode {
        match self {
            DetailView::Sender { .. } => GroupingMode::Sender,
            DetailView::File { .. } => GroupingMode::File,
        }
    }

    pub fn title(&self) -> String {
        match self {
            DetailView::Sender { sender, .. } => format!("Results From {}", sender),
            DetailView::File { name, .. } => format!("Results For {}", name),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            DetailView::Sender { rows, .. } => rows.len(),
            DetailView::File { rows, .. } => rows.len(),
        }
    }
}

pub fn sender_detail(
    search: &SearchId,
    bucket: &SenderBucket,
    expanded: &ExpandedComments,
) -> DetailView {
    let rows = bucket
        .results
        .values()
        .map(|r| {
            let key = DetailKey::new(
                search.clone(),
                GroupingMode::Sender,
                &bucket.sender,
                &r.content_id,
            );
            SenderDetailRow {
                content_id: r.content_id.clone(),
                name: r.name.clone(),
                size: r.size,
                download: DownloadCell::from_state(r.download_in_progress),
                comment: CommentCell::resolve(r.comment.as_ref(), &key, expanded),
            }
        })
        .collect();

    DetailView::Sender {
        search: search.clone(),
        sender: bucket.sender.clone(),
        rows,
    }
}

pub fn file_detail(
    search: &SearchId,
    bucket: &FileBucket,
    expanded: &ExpandedComments,
) -> DetailView {
    let rows = bucket
        .results
        .values()
        .map(|r| {
            let key = DetailKey::new(
                search.clone(),
                GroupingMode::File,
                &bucket.content_id,
                &r.sender,
            );
            FileDetailRow {
                sender: r.sender.clone(),
                browse: BrowseCell::from_state(
                    r.browse_capable,
                    r.currently_browsing,
                    &r.sender_key,
                ),
                comment: CommentCell::resolve(r.comment.as_ref(), &key, expanded),
            }
        })
        .collect();

    DetailView::File {
        search: search.clone(),
        content_id: bucket.content_id.clone(),
        name: bucket.name.clone(),
        rows,
    }
}
