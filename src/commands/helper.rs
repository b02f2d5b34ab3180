// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Identification helper commands

use super::{required, CommandContext};
use crate::helpers::{HelperCategory, HelperMetadata};
use crate::types::IdentificationHelper;
use anyhow::Result;

/// Run helper command
pub fn run(
    ctx: &CommandContext,
    action: &str,
    version: Option<String>,
    category: Option<String>,
    data: Option<String>,
    id: Option<String>,
) -> Result<()> {
    let mut catalog = ctx.load_catalog()?;

    match action {
        "add" | "create" => {
            let version = required(version, "--for")?;
            let category = HelperCategory::parse(&required(category, "--category")?)?;
            let data = required(data, "--data")?;

            let version_id = catalog.resolve_version(&version, None)?.id.clone();
            let metadata = HelperMetadata::from_cli(category, &data)?;
            let helper = IdentificationHelper::new(&version_id, metadata);
            let helper_id = helper.id.clone();

            catalog.add_helper(helper)?;
            ctx.save_catalog(&catalog)?;
            tracing::info!(id = %helper_id, %category, "helper added");

            println!("Added {} helper to {}", category, catalog.label(&version_id));
            println!("  id: {}", helper_id);
        }

        "list" | "ls" => {
            let version_id = match &version {
                Some(v) => Some(catalog.resolve_version(v, None)?.id.clone()),
                None => None,
            };
            let helpers: Vec<&IdentificationHelper> = catalog
                .store
                .helpers
                .iter()
                .filter(|h| version_id.as_ref().map_or(true, |v| &h.version_id == v))
                .collect();

            if ctx.json {
                return ctx.print_json(&helpers);
            }
            if helpers.is_empty() {
                println!("No identification helpers. Use 'proddb helper add' to attach one.");
                return Ok(());
            }

            println!("Identification helpers ({}):", helpers.len());
            for helper in helpers {
                println!(
                    "  {} {}: {}  ({})",
                    catalog.label(&helper.version_id),
                    helper.metadata.category(),
                    helper.metadata.summary(),
                    helper.id
                );
            }
        }

        "remove" | "delete" | "rm" => {
            let id = required(id, "--id")?;
            let helper = catalog.remove_helper(&id)?;
            ctx.save_catalog(&catalog)?;
            println!(
                "Removed {} helper from {}",
                helper.metadata.category(),
                catalog.label(&helper.version_id)
            );
        }

        "categories" => {
            for category in HelperCategory::ALL {
                println!("{:<15} {}", category.as_str(), category.data_hint());
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: add, list, remove, categories", other);
        }
    }

    Ok(())
}
