//! Trust list and persona models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local trust level assigned to a persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrustLevel {
    Trusted,
    Neutral,
    Distrusted,
}

impl TrustLevel {
    /// Parse the remote's upper-case status label
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRUSTED" => Some(TrustLevel::Trusted),
            "NEUTRAL" => Some(TrustLevel::Neutral),
            "DISTRUSTED" => Some(TrustLevel::Distrusted),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrustLevel::Trusted => "TRUSTED",
            TrustLevel::Neutral => "NEUTRAL",
            TrustLevel::Distrusted => "DISTRUSTED",
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutations accepted by the remote trust endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustAction {
    Trust,
    Distrust,
    Neutral,
    Subscribe,
    Unsubscribe,
}

impl TrustAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TrustAction::Trust => "trust",
            TrustAction::Distrust => "distrust",
            TrustAction::Neutral => "neutral",
            TrustAction::Subscribe => "subscribe",
            TrustAction::Unsubscribe => "unsubscribe",
        }
    }
}

/// Summary row for one subscribed trust list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustListSummary {
    pub user: String,
    pub user_key: String,
    /// Remote update status of the subscription (e.g. "UPDATED")
    pub status: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub trusted_count: u32,
    pub distrusted_count: u32,
}

/// A persona appearing on someone's trust list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub user: String,
    pub user_key: String,
    /// Empty when the list owner gave no reason
    pub reason: String,
    /// Our own trust level for this persona
    pub trust: TrustLevel,
}

impl Persona {
    /// Trust changes that make sense from the persona's current level
    pub fn available_actions(&self) -> [TrustAction; 2] {
        match self.trust {
            TrustLevel::Trusted => [TrustAction::Neutral, TrustAction::Distrust],
            TrustLevel::Neutral => [TrustAction::Trust, TrustAction::Distrust],
            TrustLevel::Distrusted => [TrustAction::Trust, TrustAction::Neutral],
        }
    }
}

/// The two halves of one user's trust list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaLists {
    pub user: String,
    pub trusted: Vec<Persona>,
    pub distrusted: Vec<Persona>,
}

/// Column the subscription list is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Name,
    Trusted,
    Distrusted,
    Status,
    LastUpdated,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Trusted => "Trusted",
            SortKey::Distrusted => "Distrusted",
            SortKey::Status => "Status",
            SortKey::LastUpdated => "Last Updated",
        }
    }

    /// Order applied when this key is first selected
    pub fn default_order(self) -> SortOrder {
        match self {
            SortKey::Name | SortKey::Status => SortOrder::Ascending,
            SortKey::Trusted | SortKey::Distrusted | SortKey::LastUpdated => SortOrder::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Current sort of the subscription list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortConfig {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Select a column: the same key flips the order, a new key starts
    /// at that key's default order.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.order = self.order.flipped();
        } else {
            self.key = key;
            self.order = key.default_order();
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        let key = SortKey::default();
        Self::new(key, key.default_order())
    }
}
