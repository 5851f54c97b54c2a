//! Domain models for search and trust entities

mod results;
mod search;
mod trust;

pub use results::{FileBucket, FileResults, ResultEntry, SenderBucket, SenderEntry, SenderResults};
pub use search::{GroupingMode, SearchId, SearchStatus};
pub use trust::{
    Persona, PersonaLists, SortConfig, SortKey, SortOrder, TrustAction, TrustLevel,
    TrustListSummary,
};
