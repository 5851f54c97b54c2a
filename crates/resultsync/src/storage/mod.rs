//! In-memory state owned by the sync engines
//!
//! - [`StatusTracker`]: last seen status per search (revision tracker)
//! - [`ResultStore`]: result sets per search and grouping, replaced wholesale
//! - [`ExpandedComments`]: expanded comment panels, independent of fetches

mod expanded;
mod results;
mod status;

pub use expanded::{DetailKey, ExpandedComments};
pub use results::ResultStore;
pub use status::StatusTracker;
