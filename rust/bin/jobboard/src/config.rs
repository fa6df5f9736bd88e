//! Client-side configuration.
//!
//! Reads/writes `~/.jobboard/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable overriding the configured server.
pub const API_URL_ENV: &str = "JOBBOARD_API_URL";

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Client configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend URL (e.g. "http://localhost:3001").
    #[serde(default = "default_server")]
    pub server: String,

    /// Bearer token for like and application endpoints.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,

    /// Snapshot cache file (default: ~/.jobboard/cache.redb).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_server() -> String {
    jobboard_client::DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            token: String::new(),
            cache_path: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Default config file path: ~/.jobboard/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Effective server: `--server` flag, then `JOBBOARD_API_URL`, then the file.
    pub fn server_url(&self, flag: Option<&str>, env: Option<String>) -> String {
        flag.map(str::to_string)
            .or(env)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.server.clone())
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(|| dirs_path().join("cache.redb"))
    }
}

/// Return the jobboard config directory (~/.jobboard).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".jobboard")
}
