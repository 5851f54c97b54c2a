//! Swarmwatch config directory
//!
//! Everything Swarmwatch persists lives as JSON under one per-user
//! directory, `swarmwatch/` inside the platform config dir (for example
//! `~/.config/swarmwatch/` on Linux). [`init`] creates it on startup.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "swarmwatch";

/// Create the config directory if needed and return it
pub fn init() -> Result<PathBuf> {
    ensure_config_dir()
}

/// `None` when the platform has no notion of a config dir
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR))
}

pub fn config_path(filename: &str) -> Option<PathBuf> {
    Some(config_dir()?.join(filename))
}

pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|path| path.is_file())
}

fn require_config_dir() -> Result<PathBuf> {
    config_dir().context("No config directory on this platform")
}

pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = require_config_dir()?;
    std::fs::create_dir_all(&dir).with_context(|| format!("Cannot create {}", dir.display()))?;
    Ok(dir)
}

/// Read `filename` from the config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    load_json_file(&require_config_dir()?.join(filename))
}

pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Write `value` to `filename` in the config directory, returning the
/// path written
pub fn save_json<T: Serialize>(filename: &str, value: &T) -> Result<PathBuf> {
    let path = ensure_config_dir()?.join(filename);
    save_json_file(&path, value)?;
    Ok(path)
}

pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))
}
