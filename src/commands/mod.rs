// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod export;
pub mod helper;
pub mod product;
pub mod pull;
pub mod relationship;
pub mod tree;
pub mod vendor;
pub mod version;
pub mod view;

use crate::catalog::Catalog;
use crate::config::Config;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Resolved configuration (flags already applied)
    pub config: Config,
    /// Config file the configuration was read from
    pub config_path: Option<PathBuf>,
    /// Emit JSON instead of text
    pub json: bool,
}

impl CommandContext {
    /// Load the catalog from the data directory
    pub fn load_catalog(&self) -> Result<Catalog> {
        let dir = &self.config.data_dir;
        Catalog::load(dir).with_context(|| format!("Failed to load catalog from {}", dir.display()))
    }

    /// Save the catalog to the data directory
    pub fn save_catalog(&self, catalog: &Catalog) -> Result<()> {
        catalog.save(&self.config.data_dir)
    }

    /// Print a value as pretty JSON on stdout
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{json}");
        Ok(())
    }
}

/// Require an optional positional or flag value
pub(crate) fn required(value: Option<String>, what: &str) -> Result<String> {
    value.ok_or_else(|| anyhow::anyhow!("{what} is required"))
}
