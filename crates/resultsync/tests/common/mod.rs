//! Scripted remote service shared by the integration tests

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use resultsync::models::{SearchId, SortConfig, TrustAction};
use resultsync::remote::api::{
    GroupByFileResponse, GroupBySenderResponse, RevisionResponse, StatusResponse,
    SubscriptionsResponse, TrustListResponse,
};
use resultsync::{RemoteService, RemoteStatusError};

#[derive(Default)]
struct Script {
    status: Value,
    by_sender: HashMap<String, Value>,
    by_file: HashMap<String, Value>,
    revision: Value,
    subscriptions: Value,
    trust_lists: HashMap<String, Value>,
    failing: HashSet<&'static str>,
    calls: HashMap<&'static str, usize>,
    posts: Vec<String>,
    sorts: Vec<SortConfig>,
}

/// Remote double that answers from canned JSON and counts calls
#[derive(Default)]
pub struct ScriptedRemote {
    script: Mutex<Script>,
}

impl ScriptedRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_status(&self, searches: &[(&str, u64)]) {
        let searches: Vec<Value> = searches
            .iter()
            .map(|(id, revision)| {
                json!({
                    "searchId": id,
                    "query": format!("query {id}"),
                    "revision": revision,
                    "senders": 1,
                    "results": 1
                })
            })
            .collect();
        self.script.lock().unwrap().status = json!({ "searches": searches });
    }

    pub fn set_raw_status(&self, status: Value) {
        self.script.lock().unwrap().status = status;
    }

    pub fn set_sender_results(&self, search: &str, response: Value) {
        self.script.lock().unwrap().by_sender.insert(search.to_string(), response);
    }

    pub fn set_file_results(&self, search: &str, response: Value) {
        self.script.lock().unwrap().by_file.insert(search.to_string(), response);
    }

    pub fn set_revision(&self, revision: u64) {
        self.script.lock().unwrap().revision = json!({ "revision": revision });
    }

    pub fn set_subscriptions(&self, response: Value) {
        self.script.lock().unwrap().subscriptions = response;
    }

    pub fn set_trust_list(&self, user_key: &str, response: Value) {
        self.script.lock().unwrap().trust_lists.insert(user_key.to_string(), response);
    }

    /// Make every call to `method` fail until [`ScriptedRemote::recover`]
    pub fn fail(&self, method: &'static str) {
        self.script.lock().unwrap().failing.insert(method);
    }

    pub fn recover(&self, method: &'static str) {
        self.script.lock().unwrap().failing.remove(method);
    }

    pub fn calls(&self, method: &str) -> usize {
        self.script.lock().unwrap().calls.get(method).copied().unwrap_or(0)
    }

    pub fn posts(&self) -> Vec<String> {
        self.script.lock().unwrap().posts.clone()
    }

    pub fn sorts(&self) -> Vec<SortConfig> {
        self.script.lock().unwrap().sorts.clone()
    }

    fn answer<T: DeserializeOwned>(
        &self,
        method: &'static str,
        pick: impl FnOnce(&Script) -> Value,
    ) -> Result<T> {
        let mut script = self.script.lock().unwrap();
        *script.calls.entry(method).or_default() += 1;
        if script.failing.contains(method) {
            return Err(RemoteStatusError { status: 503 }.into());
        }
        let value = pick(&*script);
        if value.is_null() {
            return Err(anyhow!("no scripted response for {method}"));
        }
        Ok(serde_json::from_value(value)?)
    }

    fn post(&self, method: &'static str, line: String) -> Result<()> {
        let mut script = self.script.lock().unwrap();
        *script.calls.entry(method).or_default() += 1;
        if script.failing.contains(method) {
            return Err(RemoteStatusError { status: 500 }.into());
        }
        script.posts.push(line);
        Ok(())
    }
}

impl RemoteService for ScriptedRemote {
    fn search_status(&self) -> Result<StatusResponse> {
        self.answer("status", |s| s.status.clone())
    }

    fn results_by_sender(&self, search: &SearchId) -> Result<GroupBySenderResponse> {
        self.answer("by_sender", |s| s.by_sender.get(search.as_str()).cloned().unwrap_or_default())
    }

    fn results_by_file(&self, search: &SearchId) -> Result<GroupByFileResponse> {
        self.answer("by_file", |s| s.by_file.get(search.as_str()).cloned().unwrap_or_default())
    }

    fn download(&self, content_id: &str, search: &SearchId) -> Result<()> {
        self.post("download", format!("download {content_id} {search}"))
    }

    fn browse(&self, sender_key: &str) -> Result<()> {
        self.post("browse", format!("browse {sender_key}"))
    }

    fn subscription_revision(&self) -> Result<RevisionResponse> {
        self.answer("revision", |s| s.revision.clone())
    }

    fn subscriptions(&self, sort: SortConfig) -> Result<SubscriptionsResponse> {
        self.script.lock().unwrap().sorts.push(sort);
        self.answer("subscriptions", |s| s.subscriptions.clone())
    }

    fn trust_list(&self, user_key: &str) -> Result<TrustListResponse> {
        self.answer("trust_list", |s| s.trust_lists.get(user_key).cloned().unwrap_or_default())
    }

    fn trust(&self, action: TrustAction, persona: &str, reason: Option<&str>) -> Result<()> {
        self.post(
            "trust",
            format!("{} {} {}", action.as_str(), persona, reason.unwrap_or("-")),
        )
    }
}

/// Group-by-sender fixture: `(sender, [(content_id, downloading, comment)])`
pub fn sender_response(senders: &[(&str, &[(&str, bool, Option<&str>)])]) -> Value {
    let buckets: Vec<Value> = senders
        .iter()
        .map(|(sender, results)| {
            let results: Vec<Value> = results
                .iter()
                .map(|(content_id, downloading, comment)| {
                    let mut r = json!({
                        "name": format!("{content_id}.iso"),
                        "size": 4096,
                        "contentId": content_id,
                        "downloading": downloading
                    });
                    if let Some(comment) = comment {
                        r["comment"] = json!(comment);
                    }
                    r
                })
                .collect();
            json!({
                "sender": sender,
                "senderKey": format!("{sender}-key"),
                "browse": true,
                "browsing": false,
                "results": results
            })
        })
        .collect();
    json!({ "resultsBySender": buckets })
}

/// Group-by-file fixture: `(content_id, [(sender, comment)])`
pub fn file_response(files: &[(&str, &[(&str, Option<&str>)])]) -> Value {
    let buckets: Vec<Value> = files
        .iter()
        .map(|(content_id, senders)| {
            let results: Vec<Value> = senders
                .iter()
                .map(|(sender, comment)| {
                    let mut r = json!({
                        "sender": sender,
                        "senderKey": format!("{sender}-key"),
                        "browse": true,
                        "browsing": false
                    });
                    if let Some(comment) = comment {
                        r["comment"] = json!(comment);
                    }
                    r
                })
                .collect();
            json!({
                "name": format!("{content_id}.iso"),
                "contentId": content_id,
                "size": 4096,
                "downloading": false,
                "results": results
            })
        })
        .collect();
    json!({ "resultsByFile": buckets })
}

/// Subscriptions fixture: `(user, trusted, distrusted)`
pub fn subscriptions_response(lists: &[(&str, u32, u32)]) -> Value {
    let subs: Vec<Value> = lists
        .iter()
        .map(|(user, trusted, distrusted)| {
            json!({
                "user": user,
                "userKey": format!("{user}-key"),
                "status": "UPDATED",
                "timestamp": 1_700_000_000_000_i64,
                "trusted": trusted,
                "distrusted": distrusted
            })
        })
        .collect();
    json!({ "subscriptions": subs })
}
