// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Pull command - replace the local catalog with the remote one

use super::CommandContext;
use crate::api::ApiClient;
use crate::catalog::Catalog;
use anyhow::{Context, Result};
use std::time::Duration;

/// Run pull command
pub fn run(ctx: &CommandContext, api_url: Option<String>) -> Result<()> {
    let url = api_url.unwrap_or_else(|| ctx.config.api_url.clone());
    let client = ApiClient::new(&url, Duration::from_secs(ctx.config.timeout_secs))?;

    let store = client
        .fetch_store()
        .with_context(|| format!("Failed to pull catalog from {url}"))?;
    let catalog = Catalog::try_from_store(store)?;
    ctx.save_catalog(&catalog)?;

    println!(
        "Pulled {} vendors, {} products, {} versions, {} relationships, {} helpers",
        catalog.store.vendors.len(),
        catalog.store.products.len(),
        catalog.store.versions.len(),
        catalog.store.relationships.len(),
        catalog.store.helpers.len()
    );
    Ok(())
}
