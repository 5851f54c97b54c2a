//! Selection state

use crate::models::{GroupingMode, SearchId};

/// Which search, sender and file the user is looking at
///
/// Sender and file focus are kept separately so switching grouping back
/// and forth returns to the same detail.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    pub search: Option<SearchId>,
    pub mode: GroupingMode,
    pub sender: Option<String>,
    pub file: Option<String>,
}

impl Selection {
    pub fn new(mode: GroupingMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Point at a search, dropping sender and file focus when it changes
    pub fn set_search(&mut self, search: SearchId, mode: GroupingMode) {
        if self.search.as_ref() != Some(&search) {
            self.sender = None;
            self.file = None;
        }
        self.search = Some(search);
        self.mode = mode;
    }

    /// Focused key for the current grouping (sender or content id)
    pub fn focus(&self) -> Option<&str> {
        match self.mode {
            GroupingMode::Sender => self.sender.as_deref(),
            GroupingMode::File => self.file.as_deref(),
        }
    }

    pub fn is_selected(&self, search: &SearchId, mode: GroupingMode) -> bool {
        self.search.as_ref() == Some(search) && self.mode == mode
    }
}
