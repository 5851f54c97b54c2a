//! Revision-gated synchronization engines
//!
//! Both engines poll a cheap revision source and only re-fetch the heavy
//! dataset when the revision grows. Each fetch is split into the request
//! and an `apply_*` completion so a driver can deliver completions in
//! whatever order they arrive; the last one applied wins.

mod search;
mod selection;
mod stats;
mod subscriptions;
mod timing;

pub use search::SearchSync;
pub use selection::Selection;
pub use stats::{PollOutcome, SyncStats};
pub use subscriptions::SubscriptionSync;
pub use timing::{DEFAULT_POLL_INTERVAL_MS, poll_due, time_until_due};
