//! Poll timing utilities
//!
//! Pure functions that can be tested without a running loop.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Interval between two polls of the same source
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Check whether a poll is due.
///
/// # Arguments
/// * `last_poll_at` - When the source was last polled (None if never)
/// * `interval_ms` - Fixed interval between polls
///
/// # Returns
/// `true` if the interval has elapsed or the source was never polled
pub fn poll_due(last_poll_at: Option<DateTime<Utc>>, interval_ms: u64) -> bool {
    match last_poll_at {
        Some(last) => {
            let elapsed = Utc::now() - last;
            elapsed.num_milliseconds() >= interval_ms as i64
        }
        None => true, // first poll happens immediately
    }
}

/// Time left until the next poll is due, zero if it already is
pub fn time_until_due(last_poll_at: Option<DateTime<Utc>>, interval_ms: u64) -> Duration {
    let Some(last) = last_poll_at else {
        return Duration::ZERO;
    };
    let elapsed = (Utc::now() - last).num_milliseconds().max(0) as u64;
    Duration::from_millis(interval_ms.saturating_sub(elapsed))
}
