//! Integration tests for search result synchronization
//!
//! These tests drive the engine through a scripted remote and check what
//! gets fetched, replaced and kept.

mod common;

use anyhow::anyhow;
use common::{ScriptedRemote, file_response, sender_response};
use serde_json::json;
use std::sync::Arc;

use resultsync::remote::api::GroupBySenderResponse;
use resultsync::view::SenderDetailRow;
use resultsync::{
    CommentCell, DetailKey, DetailView, DownloadCell, GroupingMode, PollOutcome, SearchId,
    SearchSync,
};

fn engine(remote: &Arc<ScriptedRemote>) -> SearchSync {
    SearchSync::new(remote.clone(), GroupingMode::Sender)
}

fn s1() -> SearchId {
    SearchId::new("S1")
}

fn sender_rows(view: Option<&DetailView>) -> Vec<SenderDetailRow> {
    match view {
        Some(DetailView::Sender { rows, .. }) => rows.clone(),
        other => panic!("expected sender detail view, got {:?}", other),
    }
}

#[test]
fn test_refetch_only_on_revision_increase() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    assert!(sync.select(s1(), GroupingMode::Sender));
    assert_eq!(remote.calls("by_sender"), 1);

    // same revision: no fetch
    assert_eq!(sync.poll_status(), PollOutcome::Unchanged);
    assert_eq!(remote.calls("by_sender"), 1);

    // 1 -> 2: exactly one fetch of results(S1, sender)
    remote.set_status(&[("S1", 2)]);
    assert_eq!(sync.poll_status(), PollOutcome::Refetched);
    assert_eq!(remote.calls("by_sender"), 1 + 1);
    assert_eq!(remote.calls("by_file"), 0);

    // equal again, then lower: nothing
    assert_eq!(sync.poll_status(), PollOutcome::Unchanged);
    remote.set_status(&[("S1", 1)]);
    assert_eq!(sync.poll_status(), PollOutcome::Unchanged);
    assert_eq!(remote.calls("by_sender"), 2);
}

#[test]
fn test_revision_sequence_with_gaps() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 0)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    let base = remote.calls("by_sender");

    let revisions = [0, 3, 3, 4, 9, 9, 9, 10];
    let mut increases = 0;
    let mut last = 0;
    for revision in revisions {
        if revision > last {
            increases += 1;
        }
        last = revision;
        remote.set_status(&[("S1", revision)]);
        sync.poll_status();
    }

    assert_eq!(remote.calls("by_sender") - base, increases);
}

#[test]
fn test_first_selection_before_any_status_does_not_refetch_on_first_poll() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));

    let mut sync = engine(&remote);
    sync.select(s1(), GroupingMode::Sender);
    assert_eq!(remote.calls("by_sender"), 1);

    // previous revision unknown: treated as missing
    assert_eq!(sync.poll_status(), PollOutcome::Unchanged);
    assert_eq!(remote.calls("by_sender"), 1);
}

#[test]
fn test_unchanged_poll_is_idempotent() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 4)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, Some("hi"))])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    sync.select_sender("alice");

    let results_before = sync.sender_results(&s1()).unwrap();
    let selection_before = sync.selection().clone();
    let detail_before = sync.detail().cloned();

    for _ in 0..3 {
        sync.poll_status();
    }

    assert!(Arc::ptr_eq(&results_before, &sync.sender_results(&s1()).unwrap()));
    assert_eq!(sync.selection(), &selection_before);
    assert_eq!(sync.detail().cloned(), detail_before);
}

#[test]
fn test_switching_grouping_uses_cache() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));
    remote.set_file_results("S1", file_response(&[("h1", &[("alice", None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    assert!(sync.select(s1(), GroupingMode::Sender));
    assert!(sync.set_grouping(GroupingMode::File));
    assert_eq!(remote.calls("by_sender"), 1);
    assert_eq!(remote.calls("by_file"), 1);

    // both fetched: switching back and forth costs nothing
    assert!(!sync.set_grouping(GroupingMode::Sender));
    assert!(!sync.set_grouping(GroupingMode::File));
    assert!(!sync.select(s1(), GroupingMode::Sender));
    assert_eq!(remote.calls("by_sender"), 1);
    assert_eq!(remote.calls("by_file"), 1);
}

#[test]
fn test_revision_increase_fetches_only_selected_grouping() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));
    remote.set_file_results("S1", file_response(&[("h1", &[("alice", None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    sync.set_grouping(GroupingMode::File);

    remote.set_status(&[("S1", 2)]);
    sync.poll_status();
    assert_eq!(remote.calls("by_file"), 2);
    assert_eq!(remote.calls("by_sender"), 1);
}

#[test]
fn test_download_shows_after_next_fetch() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("H1", false, None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    sync.select_sender("alice");
    assert_eq!(sender_rows(sync.detail())[0].download, DownloadCell::Link);

    assert!(sync.download("H1", &s1()));
    assert_eq!(remote.posts(), vec!["download H1 S1".to_string()]);
    // not optimistic
    assert_eq!(sender_rows(sync.detail())[0].download, DownloadCell::Link);

    remote.set_sender_results("S1", sender_response(&[("alice", &[("H1", true, None)])]));
    remote.set_status(&[("S1", 2)]);
    sync.poll_status();

    let row = &sender_rows(sync.detail())[0];
    assert_eq!(row.download, DownloadCell::Downloading);
    assert_eq!(row.download.label(), "Downloading");
}

#[test]
fn test_browse_request() {
    let remote = ScriptedRemote::new();
    let sync = engine(&remote);

    assert!(sync.browse("alice-key"));
    remote.fail("browse");
    assert!(!sync.browse("alice-key"));
    assert_eq!(remote.posts(), vec!["browse alice-key".to_string()]);
}

#[test]
fn test_vanished_sender_keeps_stale_detail() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results(
        "S1",
        sender_response(&[("alice", &[("h1", false, None)]), ("bob", &[("h2", false, None)])]),
    );

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    assert!(sync.select_sender("alice"));
    let before = sync.detail().cloned();

    remote.set_sender_results("S1", sender_response(&[("bob", &[("h2", false, None)])]));
    remote.set_status(&[("S1", 2)]);
    assert_eq!(sync.poll_status(), PollOutcome::Refetched);

    // store moved on, detail did not
    assert!(sync.sender_results(&s1()).unwrap().bucket("alice").is_none());
    assert_eq!(sync.detail().cloned(), before);
    assert_eq!(sync.selection().sender.as_deref(), Some("alice"));
}

#[test]
fn test_selected_sender_detail_regenerates() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    sync.select_sender("alice");
    assert_eq!(sync.detail().unwrap().row_count(), 1);

    remote.set_sender_results(
        "S1",
        sender_response(&[("alice", &[("h1", false, None), ("h2", false, None)])]),
    );
    remote.set_status(&[("S1", 2)]);
    sync.poll_status();
    assert_eq!(sync.detail().unwrap().row_count(), 2);
}

#[test]
fn test_selected_file_detail_regenerates() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_file_results("S1", file_response(&[("h1", &[("alice", None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::File);
    assert!(sync.select_file("h1"));
    assert_eq!(sync.detail().unwrap().title(), "Results For h1.iso");

    remote.set_file_results("S1", file_response(&[("h1", &[("alice", None), ("bob", None)])]));
    remote.set_status(&[("S1", 5)]);
    sync.poll_status();
    assert_eq!(sync.detail().unwrap().row_count(), 2);
}

#[test]
fn test_focusing_sender_fetches_uncached_sender_grouping() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_file_results("S1", file_response(&[("h1", &[("alice", None)])]));
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));

    let mut sync = SearchSync::new(remote.clone(), GroupingMode::File);
    sync.poll_status();
    sync.select(s1(), GroupingMode::File);
    assert_eq!(remote.calls("by_sender"), 0);

    assert!(sync.select_sender("alice"));
    assert_eq!(sync.selection().mode, GroupingMode::Sender);
    assert_eq!(remote.calls("by_sender"), 1);
    assert!(sync.sender_rows().is_some());
    assert_eq!(sync.detail().unwrap().title(), "Results From alice");

    // cached now, focusing again does not fetch
    sync.select_sender("alice");
    assert_eq!(remote.calls("by_sender"), 1);
}

#[test]
fn test_focusing_file_fetches_uncached_file_grouping() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));
    remote.set_file_results("S1", file_response(&[("h1", &[("alice", None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    assert_eq!(remote.calls("by_file"), 0);

    assert!(sync.select_file("h1"));
    assert_eq!(sync.selection().mode, GroupingMode::File);
    assert_eq!(remote.calls("by_file"), 1);
    assert!(sync.file_rows().is_some());
    assert_eq!(sync.detail().unwrap().title(), "Results For h1.iso");
}

#[test]
fn test_expanded_comment_survives_replacement() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results(
        "S1",
        sender_response(&[(
            "alice",
            &[("h1", false, Some("clean rip")), ("h2", false, Some("cam"))],
        )]),
    );

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    sync.select_sender("alice");

    let key = DetailKey::new(s1(), GroupingMode::Sender, "alice", "h1");
    assert!(sync.expand_comment(key.clone()));
    assert_eq!(
        sender_rows(sync.detail())[0].comment,
        CommentCell::Expanded("clean rip".to_string())
    );

    remote.set_sender_results(
        "S1",
        sender_response(&[(
            "alice",
            &[("h1", false, Some("clean rip")), ("h2", false, Some("cam")), ("h3", false, None)],
        )]),
    );
    remote.set_status(&[("S1", 2)]);
    sync.poll_status();

    let rows = sender_rows(sync.detail());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].comment, CommentCell::Expanded("clean rip".to_string()));
    assert_eq!(rows[1].comment, CommentCell::Collapsed);
    assert_eq!(rows[2].comment, CommentCell::None);
    assert!(sync.expanded().is_expanded(&key));

    assert!(sync.collapse_comment(&key));
    assert!(!sync.expanded().is_expanded(&key));
    assert_eq!(sender_rows(sync.detail())[0].comment, CommentCell::Collapsed);
}

#[test]
fn test_expanded_comment_survives_search_expiry() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1), ("S2", 1)]);
    remote.set_file_results("S2", file_response(&[("h9", &[("carol", Some("verified"))])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(SearchId::new("S2"), GroupingMode::File);
    let key = DetailKey::new(SearchId::new("S2"), GroupingMode::File, "h9", "carol");
    assert!(sync.expand_comment(key.clone()));

    remote.set_status(&[("S1", 1)]);
    sync.poll_status();
    assert_eq!(sync.expanded().get(&key), Some("verified"));
}

#[test]
fn test_expand_unknown_comment_is_rejected() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);

    assert!(!sync.expand_comment(DetailKey::new(s1(), GroupingMode::Sender, "alice", "h1")));
    assert!(sync.expanded().is_empty());
}

#[test]
fn test_expired_selected_search_keeps_stale_view() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1), ("S2", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));
    remote.set_sender_results("S2", sender_response(&[("bob", &[("h2", false, None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(SearchId::new("S2"), GroupingMode::Sender);
    sync.select(s1(), GroupingMode::Sender);
    sync.select_sender("alice");
    let detail = sync.detail().cloned();

    remote.set_status(&[]);
    assert_eq!(sync.poll_status(), PollOutcome::Unchanged);
    assert_eq!(remote.calls("by_sender"), 2);

    assert!(sync.status(&s1()).is_none());
    assert!(sync.status_rows().is_empty());
    // unselected expired search is gone, the selected one stays readable
    assert!(sync.sender_results(&SearchId::new("S2")).is_none());
    assert!(sync.sender_results(&s1()).is_some());
    assert_eq!(sync.detail().cloned(), detail);
}

#[test]
fn test_failed_and_malformed_responses_leave_state() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    let before = sync.sender_results(&s1()).unwrap();

    // transport failure on status
    remote.fail("status");
    assert_eq!(sync.poll_status(), PollOutcome::Dropped);
    remote.recover("status");

    // malformed status: missing revision
    remote.set_raw_status(json!({
        "searches": [{ "searchId": "S1", "query": "q", "senders": 1, "results": 1 }]
    }));
    assert_eq!(sync.poll_status(), PollOutcome::Dropped);
    assert_eq!(sync.status(&s1()).unwrap().revision, 1);

    // revision grows but the result fetch fails
    remote.set_status(&[("S1", 2)]);
    remote.fail("by_sender");
    assert_eq!(sync.poll_status(), PollOutcome::Refetched);
    assert!(Arc::ptr_eq(&before, &sync.sender_results(&s1()).unwrap()));

    // malformed results: bucket without sender key
    remote.recover("by_sender");
    remote.set_sender_results(
        "S1",
        json!({ "resultsBySender": [{ "sender": "alice", "browse": true, "browsing": false }] }),
    );
    remote.set_status(&[("S1", 3)]);
    sync.poll_status();
    assert!(Arc::ptr_eq(&before, &sync.sender_results(&s1()).unwrap()));

    let stats = sync.stats();
    assert_eq!(stats.failures, 2);
    assert_eq!(stats.malformed, 2);
    assert_eq!(stats.replacements, 1);
}

#[test]
fn test_last_completion_wins() {
    let remote = ScriptedRemote::new();
    let mut sync = engine(&remote);
    sync.select(s1(), GroupingMode::Sender);

    let older: GroupBySenderResponse =
        serde_json::from_value(sender_response(&[("alice", &[("h1", false, None)])])).unwrap();
    let newer: GroupBySenderResponse = serde_json::from_value(sender_response(&[
        ("alice", &[("h1", false, None)]),
        ("bob", &[("h2", false, None)]),
    ]))
    .unwrap();

    // newer request completes first, older one lands afterwards
    assert!(sync.apply_sender_results(s1(), Ok(newer)));
    assert!(sync.apply_sender_results(s1(), Ok(older)));
    assert_eq!(sync.sender_results(&s1()).unwrap().sender_count(), 1);

    // a failed completion changes nothing
    assert!(!sync.apply_sender_results(s1(), Err(anyhow!("connection reset"))));
    assert_eq!(sync.sender_results(&s1()).unwrap().sender_count(), 1);
}

#[test]
fn test_replacement_is_never_a_mix() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results(
        "S1",
        sender_response(&[
            ("alice", &[("h1", false, None), ("h2", false, None)]),
            ("bob", &[("h3", false, None)]),
        ]),
    );

    let mut sync = engine(&remote);
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);
    let first = sync.sender_results(&s1()).unwrap();

    remote.set_sender_results("S1", sender_response(&[("carol", &[("h9", false, None)])]));
    remote.set_status(&[("S1", 2)]);
    sync.poll_status();
    let second = sync.sender_results(&s1()).unwrap();

    assert_eq!(first.result_count(), 3);
    assert_eq!(second.result_count(), 1);
    assert!(second.bucket("alice").is_none() && second.bucket("bob").is_none());
}

#[test]
fn test_overview_rows() {
    let remote = ScriptedRemote::new();
    remote.set_status(&[("S1", 1)]);
    remote.set_sender_results("S1", sender_response(&[("alice", &[("h1", false, None)])]));

    let mut sync = engine(&remote);
    assert!(sync.sender_rows().is_none());
    sync.poll_status();
    sync.select(s1(), GroupingMode::Sender);

    let rows = sync.sender_rows().unwrap();
    assert_eq!(rows[0].sender, "alice");
    assert!(sync.file_rows().is_none());
    assert_eq!(sync.status_rows()[0].query, "query S1");
}
