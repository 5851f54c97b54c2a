//! Counters kept by the sync engines

/// Statistics accumulated by a sync engine
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    /// Revision or status polls issued
    pub polls: usize,
    /// Dataset fetches issued
    pub fetches: usize,
    /// Successful wholesale replacements
    pub replacements: usize,
    /// Requests that failed at the transport or remote
    pub failures: usize,
    /// Responses that could not be normalized
    pub malformed: usize,
}

/// What a single poll led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The request failed or the response was malformed; state untouched
    Dropped,
    /// Revision did not grow for what is being watched
    Unchanged,
    /// Revision grew and a re-fetch was issued
    Refetched,
}
