//! # Item Quest Config
//!
//! Stores the API base URL to disk as JSON so it survives restarts.
//!
//! The file lives at `~/.config/item-quest/config.json` unless the
//! `ITEM_QUEST_CONFIG` environment variable (or an explicit path) points
//! elsewhere. A missing file means the default endpoint.

use quest_core::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Endpoint used until the user sets one
pub const DEFAULT_BASE_URL: &str = "https://fast-api-demo-4qmb.onrender.com";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "ITEM_QUEST_CONFIG";

/// On-disk shape
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    base_url: String,
}

/// Persisted base URL
#[derive(Debug, Clone)]
pub struct ConfigStore {
    /// Path to config file
    path: PathBuf,

    /// Current base URL, never ending in `/`
    base_url: String,
}

impl ConfigStore {
    /// Open the store at the default location
    pub fn default_location() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Self::open(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("item-quest");

        Self::open(config_dir.join("config.json"))
    }

    /// Open the store at a specific path, loading the persisted URL if any
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let base_url = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let file: ConfigFile = serde_json::from_str(&content)?;
            file.base_url
        } else {
            DEFAULT_BASE_URL.to_string()
        };

        debug!(path = %path.display(), %base_url, "config loaded");
        Ok(Self { path, base_url })
    }

    /// Get the storage path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current base URL
    pub fn get(&self) -> &str {
        &self.base_url
    }

    /// Set and persist the base URL.
    ///
    /// Exactly one trailing slash is dropped; nothing else is normalized or
    /// validated. Returns the stored value.
    pub fn set(&mut self, url: &str) -> Result<&str> {
        self.base_url = strip_trailing_slash(url).to_string();
        self.save()?;
        info!(base_url = %self.base_url, "base URL updated");
        Ok(&self.base_url)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&ConfigFile {
            base_url: self.base_url.clone(),
        })?;

        // Write to temp file first, then rename (atomic)
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

/// Drop a single trailing `/`
pub fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
