//! Root application state for the Swarmwatch client

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info};
use resultsync::view::{DetailView, StatusRow};
use resultsync::{
    ClientConfig, GroupingMode, PollOutcome, RemoteService, SearchId, SearchSync,
    SubscriptionSync, poll_due, time_until_due,
};
use std::sync::Arc;

/// Sender or file to show details for
#[derive(Debug, Clone)]
pub enum Focus {
    Sender(String),
    File(String),
}

/// Drives both poll loops and prints what changed
pub struct SwarmwatchApp {
    searches: SearchSync,
    subscriptions: SubscriptionSync,
    poll_interval_ms: u64,
    last_status_poll_at: Option<DateTime<Utc>>,
    last_revision_poll_at: Option<DateTime<Utc>>,
    /// Last printed detail view, to avoid reprinting unchanged output
    shown_detail: Option<DetailView>,
    shown_lists: usize,
}

impl SwarmwatchApp {
    pub fn new(remote: Arc<dyn RemoteService>, cfg: ClientConfig) -> Self {
        Self {
            searches: SearchSync::new(Arc::clone(&remote), cfg.default_grouping),
            subscriptions: SubscriptionSync::new(remote, cfg.sort),
            poll_interval_ms: cfg.poll_interval_ms,
            last_status_poll_at: None,
            last_revision_poll_at: None,
            shown_detail: None,
            shown_lists: 0,
        }
    }

    /// Select a search, optionally focusing a sender or file
    ///
    /// The focus decides the grouping; without one the configured
    /// default is used.
    pub fn watch(&mut self, search: SearchId, focus: Option<Focus>) {
        let mode = match &focus {
            Some(Focus::Sender(_)) => GroupingMode::Sender,
            Some(Focus::File(_)) => GroupingMode::File,
            None => self.searches.selection().mode,
        };
        info!("Watching search {} grouped by {}", search, mode);
        self.searches.select(search, mode);

        match focus {
            Some(Focus::Sender(sender)) => {
                self.searches.select_sender(sender);
            }
            Some(Focus::File(content_id)) => {
                self.searches.select_file(content_id);
            }
            None => {}
        }
    }

    pub fn open_trust_list(&mut self, user: String) {
        info!("Opening trust list of {}", user);
        self.subscriptions.display_list(user);
    }

    /// Run whichever polls are due and print the result
    pub fn tick(&mut self) {
        if poll_due(self.last_status_poll_at, self.poll_interval_ms) {
            self.last_status_poll_at = Some(Utc::now());
            let outcome = self.searches.poll_status();
            debug!("Status poll: {:?}", outcome);
            if outcome != PollOutcome::Dropped {
                self.render_searches();
            }
        }

        if poll_due(self.last_revision_poll_at, self.poll_interval_ms) {
            self.last_revision_poll_at = Some(Utc::now());
            let outcome = self.subscriptions.poll_revision();
            debug!("Trust revision poll: {:?}", outcome);
            if outcome == PollOutcome::Refetched {
                self.render_subscriptions();
            }
        }
    }

    /// Poll forever
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.tick();
            let wait = time_until_due(self.last_status_poll_at, self.poll_interval_ms)
                .min(time_until_due(self.last_revision_poll_at, self.poll_interval_ms));
            std::thread::sleep(wait);
        }
    }

    fn render_searches(&mut self) {
        let rows = self.searches.status_rows();
        if rows.is_empty() {
            debug!("No active searches");
        }
        for row in &rows {
            println!("{}", format_status_row(row));
        }

        let detail = self.searches.detail().cloned();
        if detail != self.shown_detail {
            if let Some(view) = &detail {
                print_detail(view);
            }
            self.shown_detail = detail;
        }
    }

    fn render_subscriptions(&mut self) {
        let lists = self.subscriptions.lists();
        if lists.len() != self.shown_lists {
            info!("{} subscribed trust lists", lists.len());
            self.shown_lists = lists.len();
        }
        for list in lists.iter() {
            let updated = list
                .last_updated
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string());
            println!(
                "{:<24} {:>4} trusted {:>4} distrusted  {:<10} {}",
                list.user, list.trusted_count, list.distrusted_count, list.status, updated
            );
        }

        if let Some(personas) = self.subscriptions.personas() {
            println!("Trust list of {}", personas.user);
            for p in personas.trusted.iter().chain(personas.distrusted.iter()) {
                println!("  {:<24} {:<10} {}", p.user, p.trust.as_str(), p.reason);
            }
        }
    }
}

fn format_status_row(row: &StatusRow) -> String {
    format!(
        "{:<12} {:<32} {:>4} senders {:>5} results",
        row.search, row.query, row.senders, row.results
    )
}

fn print_detail(view: &DetailView) {
    println!("{}", view.title());
    match view {
        DetailView::Sender { rows, .. } => {
            for row in rows {
                println!("  {:<40} {:>12} {}", row.name, row.size, row.download.label());
            }
        }
        DetailView::File { rows, .. } => {
            for row in rows {
                println!("  {:<24} {}", row.sender, row.browse.label().unwrap_or(""));
            }
        }
    }
}
