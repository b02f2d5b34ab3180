// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use super::CommandContext;
use anyhow::Result;

/// Run config command: print `key`, or persist `value` for it
pub fn run(ctx: &CommandContext, key: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(v) => {
            let path = ctx
                .config_path
                .clone()
                .or_else(crate::config::default_path)
                .ok_or_else(|| anyhow::anyhow!("No config location available; pass --config"))?;
            tracing::info!("Setting {} = {}", key, v);
            crate::config::set(&path, key, &v)?;
            println!("Set {} = {} in {}", key, v, path.display());
        }
        None => {
            let current = ctx
                .config
                .get(key)
                .ok_or_else(|| anyhow::anyhow!("Unknown config key: {}. Valid: {}", key, crate::config::KEYS.join(", ")))?;
            println!("{current}");
        }
    }
    Ok(())
}
