// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest to highest: built-in defaults, the TOML config file,
//! `PRODDB_*` environment variables. Command-line flags are applied by the
//! caller on top.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted by `proddb config`
pub const KEYS: [&str; 5] = ["data_dir", "cache_dir", "api_url", "timeout_secs", "log_level"];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for persistent data (catalog.json)
    pub data_dir: PathBuf,
    /// Directory for cached data
    pub cache_dir: PathBuf,
    /// Base URL of the catalog API
    pub api_url: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "hyperpolymath", "proddb")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: project_dirs()
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".proddb")),
            cache_dir: project_dirs()
                .map(|d| d.cache_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".proddb/cache")),
            api_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Read a key as a display string
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_dir" => Some(self.data_dir.display().to_string()),
            "cache_dir" => Some(self.cache_dir.display().to_string()),
            "api_url" => Some(self.api_url.clone()),
            "timeout_secs" => Some(self.timeout_secs.to_string()),
            "log_level" => Some(self.log_level.clone()),
            _ => None,
        }
    }
}

/// Default location of the config file
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from defaults, the config file and the environment
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = Config::default();

    let mut builder = config::Config::builder()
        .set_default("data_dir", defaults.data_dir.display().to_string())?
        .set_default("cache_dir", defaults.cache_dir.display().to_string())?
        .set_default("api_url", defaults.api_url)?
        .set_default("timeout_secs", defaults.timeout_secs)?
        .set_default("log_level", defaults.log_level)?;

    if let Some(file) = path.map(Path::to_path_buf).or_else(default_path) {
        builder = builder.add_source(config::File::from(file).required(false));
    }

    builder
        .add_source(config::Environment::with_prefix("PRODDB"))
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}

/// Persist one key to the config file, keeping the other keys in it
pub fn set(path: &Path, key: &str, value: &str) -> Result<()> {
    if !KEYS.contains(&key) {
        anyhow::bail!("Unknown config key: {}. Valid: {}", key, KEYS.join(", "));
    }

    let mut table: toml::Table = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        toml::Table::new()
    };

    let parsed = if key == "timeout_secs" {
        let secs: i64 = value
            .parse()
            .with_context(|| format!("timeout_secs must be a whole number, got '{value}'"))?;
        toml::Value::Integer(secs)
    } else {
        toml::Value::String(value.to_string())
    };
    table.insert(key.to_string(), parsed);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(&table).context("Failed to serialize config")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        set(&path, "api_url", "https://catalog.example").unwrap();
        set(&path, "timeout_secs", "5").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.api_url, "https://catalog.example");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.get("timeout_secs").as_deref(), Some("5"));
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set(&path, "colour", "red").is_err());
        assert!(set(&path, "timeout_secs", "soon").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.log_level, Config::default().log_level);
    }
}
