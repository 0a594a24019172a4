//! Profile configuration for the Zanshin API.
//!
//! Credentials live in `~/.zanshin`, a TOML file with one table per profile:
//!
//! ```toml
//! [default]
//! api_key = "..."
//!
//! [staging]
//! api_key = "..."
//! api_url = "https://api.staging.example.com"
//! ```
//!
//! `ZANSHIN_API_KEY` / `ZANSHIN_API_URL` override the file entirely, which
//! keeps CI and one-off runs away from the home directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.zanshin.tenchisecurity.com";

const CONFIG_FILE_NAME: &str = ".zanshin";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_url: String,
}

/// Resolve settings for `profile`, preferring environment overrides.
pub fn load(profile: &str) -> Result<Settings> {
    if let Ok(api_key) = std::env::var("ZANSHIN_API_KEY") {
        let api_url =
            std::env::var("ZANSHIN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        return Ok(Settings { api_key, api_url });
    }
    let path = config_path()?;
    load_from(&path, profile)
}

pub fn load_from(path: &Path, profile: &str) -> Result<Settings> {
    let raw = std::fs::read_to_string(path).with_context(|| {
        format!(
            "could not read the configuration file at {} (set ZANSHIN_API_KEY to skip it)",
            path.display()
        )
    })?;
    let table: toml::Table = raw
        .parse()
        .with_context(|| format!("invalid configuration file at {}", path.display()))?;
    let section = table
        .get(profile)
        .and_then(toml::Value::as_table)
        .with_context(|| format!("profile '{profile}' not found in {}", path.display()))?;

    let api_key = section
        .get("api_key")
        .and_then(toml::Value::as_str)
        .with_context(|| format!("profile '{profile}' has no api_key"))?
        .to_string();
    let api_url = section
        .get("api_url")
        .and_then(toml::Value::as_str)
        .unwrap_or(DEFAULT_API_URL)
        .to_string();

    Ok(Settings { api_key, api_url })
}

fn config_path() -> Result<PathBuf> {
    let dir = home::home_dir().context("home directory not found: set HOME")?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
