//! Client configuration loading
//!
//! Supports loading the client configuration from (in order of priority):
//! 1. An explicit JSON file
//! 2. `client.json` in the Swarmwatch config directory
//! 3. Runtime environment variables
//! 4. Built-in defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::{GroupingMode, SortConfig};
use crate::sync::DEFAULT_POLL_INTERVAL_MS;

/// Config filename in the Swarmwatch config directory
pub const CLIENT_CONFIG_FILE: &str = "client.json";

/// Environment variable overriding the remote base URL
const BASE_URL_ENV: &str = "SWARMWATCH_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7070/api";

/// Settings for talking to the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the remote service
    pub base_url: String,
    /// Interval between two polls of the same source
    pub poll_interval_ms: u64,
    /// Per-request timeout
    pub request_timeout_ms: u64,
    /// Grouping used until the user picks one
    pub default_grouping: GroupingMode,
    /// Initial sort of the subscription list
    pub sort: SortConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: 10_000,
            default_grouping: GroupingMode::Sender,
            sort: SortConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration using the following priority:
    /// 1. `path`, when given
    /// 2. ~/.config/swarmwatch/client.json
    /// 3. Environment variables on top of the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        if config::config_exists(CLIENT_CONFIG_FILE) {
            let loaded: ClientConfig = config::load_json(CLIENT_CONFIG_FILE)?;
            return Ok(loaded);
        }

        Ok(Self::from_env())
    }

    /// Load configuration from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse client config JSON")
    }

    /// Defaults, with the base URL taken from the environment if set
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            cfg.base_url = url;
        }
        cfg
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
