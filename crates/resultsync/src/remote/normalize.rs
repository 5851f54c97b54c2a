//! Normalize wire records to domain models
//!
//! A record missing a required field fails the whole response, so a
//! partially understood result set never reaches the store.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::MalformedResponse;
use super::api::{
    FileRecord, GroupByFileResponse, GroupBySenderResponse, PersonaRecord, RevisionResponse,
    SenderRecord, StatusResponse, SubscriptionsResponse, TrustListResponse,
};
use crate::models::{
    FileBucket, FileResults, Persona, PersonaLists, ResultEntry, SearchId, SearchStatus,
    SenderBucket, SenderEntry, SenderResults, TrustLevel, TrustListSummary,
};

type Normalized<T> = Result<T, MalformedResponse>;

fn required<T>(value: Option<T>, record: &'static str, field: &'static str) -> Normalized<T> {
    value.ok_or(MalformedResponse { record, field })
}

/// Convert a status response into one status per active search
pub fn normalize_status(response: StatusResponse) -> Normalized<Vec<SearchStatus>> {
    const RECORD: &str = "status";

    required(response.searches, RECORD, "searches")?
        .into_iter()
        .map(|s| {
            Ok(SearchStatus {
                id: SearchId::new(required(s.search_id, RECORD, "searchId")?),
                query: required(s.query, RECORD, "query")?,
                revision: required(s.revision, RECORD, "revision")?,
                sender_count: required(s.senders, RECORD, "senders")?,
                result_count: required(s.results, RECORD, "results")?,
            })
        })
        .collect()
}

/// Convert a group-by-sender response into a [`SenderResults`]
pub fn normalize_sender_results(response: GroupBySenderResponse) -> Normalized<SenderResults> {
    let records = required(response.results_by_sender, "groupBySender", "resultsBySender")?;

    let mut buckets = IndexMap::with_capacity(records.len());
    for record in records {
        let bucket = normalize_sender_bucket(record)?;
        buckets.insert(bucket.sender.clone(), bucket);
    }
    Ok(SenderResults::new(buckets))
}

fn normalize_sender_bucket(record: SenderRecord) -> Normalized<SenderBucket> {
    const RECORD: &str = "groupBySender";

    let mut results = IndexMap::with_capacity(record.results.len());
    for r in record.results {
        let entry = ResultEntry {
            name: required(r.name, RECORD, "name")?,
            size: required(r.size, RECORD, "size")?,
            content_id: required(r.content_id, RECORD, "contentId")?,
            download_in_progress: required(r.downloading, RECORD, "downloading")?,
            comment: r.comment,
        };
        results.insert(entry.content_id.clone(), entry);
    }

    Ok(SenderBucket {
        sender: required(record.sender, RECORD, "sender")?,
        sender_key: required(record.sender_key, RECORD, "senderKey")?,
        browse_capable: required(record.browse, RECORD, "browse")?,
        currently_browsing: required(record.browsing, RECORD, "browsing")?,
        results,
    })
}

/// Convert a group-by-file response into a [`FileResults`]
pub fn normalize_file_results(response: GroupByFileResponse) -> Normalized<FileResults> {
    let records = required(response.results_by_file, "groupByFile", "resultsByFile")?;

    let mut buckets = IndexMap::with_capacity(records.len());
    for record in records {
        let bucket = normalize_file_bucket(record)?;
        buckets.insert(bucket.content_id.clone(), bucket);
    }
    Ok(FileResults::new(buckets))
}

fn normalize_file_bucket(record: FileRecord) -> Normalized<FileBucket> {
    const RECORD: &str = "groupByFile";

    let mut results = IndexMap::with_capacity(record.results.len());
    for r in record.results {
        let entry = SenderEntry {
            sender: required(r.sender, RECORD, "sender")?,
            sender_key: required(r.sender_key, RECORD, "senderKey")?,
            browse_capable: required(r.browse, RECORD, "browse")?,
            currently_browsing: required(r.browsing, RECORD, "browsing")?,
            comment: r.comment,
        };
        results.insert(entry.sender.clone(), entry);
    }

    Ok(FileBucket {
        name: required(record.name, RECORD, "name")?,
        content_id: required(record.content_id, RECORD, "contentId")?,
        size: required(record.size, RECORD, "size")?,
        download_in_progress: required(record.downloading, RECORD, "downloading")?,
        results,
    })
}

pub fn normalize_revision(response: RevisionResponse) -> Normalized<u64> {
    required(response.revision, "revision", "revision")
}

/// Convert a subscriptions response, keeping the remote's sort order
pub fn normalize_subscriptions(
    response: SubscriptionsResponse,
) -> Normalized<Vec<TrustListSummary>> {
    const RECORD: &str = "subscriptions";

    required(response.subscriptions, RECORD, "subscriptions")?
        .into_iter()
        .map(|s| {
            Ok(TrustListSummary {
                user: required(s.user, RECORD, "user")?,
                user_key: required(s.user_key, RECORD, "userKey")?,
                status: required(s.status, RECORD, "status")?,
                last_updated: s.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis),
                trusted_count: required(s.trusted, RECORD, "trusted")?,
                distrusted_count: required(s.distrusted, RECORD, "distrusted")?,
            })
        })
        .collect()
}

/// Convert a trust list response for `user`
pub fn normalize_trust_list(user: &str, response: TrustListResponse) -> Normalized<PersonaLists> {
    let trusted = required(response.trusted, "trustList", "trusted")?;
    let distrusted = required(response.distrusted, "trustList", "distrusted")?;

    Ok(PersonaLists {
        user: user.to_string(),
        trusted: normalize_personas(trusted)?,
        distrusted: normalize_personas(distrusted)?,
    })
}

fn normalize_personas(records: Vec<PersonaRecord>) -> Normalized<Vec<Persona>> {
    const RECORD: &str = "trustList";

    records
        .into_iter()
        .map(|p| {
            let status = required(p.status, RECORD, "status")?;
            Ok(Persona {
                user: required(p.user, RECORD, "user")?,
                user_key: required(p.user_key, RECORD, "userKey")?,
                reason: p.reason.unwrap_or_default(),
                trust: TrustLevel::parse(&status).ok_or(MalformedResponse {
                    record: RECORD,
                    field: "status",
                })?,
            })
        })
        .collect()
}
