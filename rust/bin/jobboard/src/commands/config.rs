//! `jobboard config show|set`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{ClientConfig, API_URL_ENV};

pub fn show(config_path: &Path, json: bool) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("Config:    {}", config_path.display());
    println!("Server:    {}", config.server);
    if let Ok(url) = std::env::var(API_URL_ENV) {
        println!("           (overridden by {}={})", API_URL_ENV, url);
    }
    println!("Token:     {}", if config.token.is_empty() { "-" } else { "set" });
    println!("Cache:     {}", config.cache_file().display());
    println!("Page size: {}", config.page_size);
    Ok(())
}

pub fn set(
    config_path: &Path,
    server: Option<&str>,
    token: Option<&str>,
    cache_path: Option<PathBuf>,
    page_size: Option<u32>,
) -> Result<()> {
    if server.is_none() && token.is_none() && cache_path.is_none() && page_size.is_none() {
        anyhow::bail!("Nothing to set. Use --server, --token, --cache-path or --page-size.");
    }

    let mut config = ClientConfig::load(config_path)?;
    if let Some(server) = server {
        if server.trim().is_empty() {
            anyhow::bail!("Server URL cannot be empty.");
        }
        config.server = server.trim().to_string();
    }
    if let Some(token) = token {
        config.token = token.trim().to_string();
    }
    if let Some(path) = cache_path {
        config.cache_path = Some(path);
    }
    if let Some(size) = page_size {
        if size == 0 {
            anyhow::bail!("Page size must be at least 1.");
        }
        config.page_size = size;
    }
    config.save(config_path)?;
    println!("Config updated.");
    Ok(())
}
