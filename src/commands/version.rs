// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Product version management commands

use super::{required, CommandContext};
use crate::types::ProductVersion;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::{OwoColorize, Stream};

/// Arguments for version commands
pub struct VersionArgs {
    /// Owning product (name or ID)
    pub product: Option<String>,
    /// Release date (YYYY-MM-DD)
    pub released: Option<String>,
    /// Description
    pub description: Option<String>,
}

/// Run version command
pub fn run(ctx: &CommandContext, action: &str, name: Option<String>, args: VersionArgs) -> Result<()> {
    let mut catalog = ctx.load_catalog()?;

    let product_id = match &args.product {
        Some(p) => Some(catalog.resolve_product(p, None)?.id.clone()),
        None => None,
    };

    match action {
        "create" | "new" => {
            let name = required(name, "Version name")?;
            let product_id = required(product_id, "--product")?;
            let released_at = args
                .released
                .as_deref()
                .map(|d| {
                    NaiveDate::parse_from_str(d, "%Y-%m-%d")
                        .with_context(|| format!("Invalid release date '{d}', expected YYYY-MM-DD"))
                })
                .transpose()?;

            let version = ProductVersion::new(&product_id, &name, released_at, args.description);
            let id = version.id.clone();
            catalog.add_version(version)?;
            ctx.save_catalog(&catalog)?;
            tracing::info!(%id, "version created");

            println!("Created version: {} {} ({})", catalog.label(&product_id), name, id);
        }

        "list" | "ls" => {
            let versions: Vec<&ProductVersion> = catalog
                .store
                .versions
                .iter()
                .filter(|v| product_id.as_ref().map_or(true, |p| &v.product_id == p))
                .collect();

            if ctx.json {
                return ctx.print_json(&versions);
            }
            if versions.is_empty() {
                println!("No versions defined. Use 'proddb version create <name> --product <product>' to create one.");
                return Ok(());
            }

            println!("Versions ({}):", versions.len());
            for version in versions {
                let released = version
                    .released_at
                    .map(|d| format!(", released {d}"))
                    .unwrap_or_default();
                println!(
                    "  {} [{}] - {} helpers{}",
                    catalog.label(&version.id).if_supports_color(Stream::Stdout, |t| t.bold()),
                    version.id.if_supports_color(Stream::Stdout, |t| t.dimmed()),
                    catalog.helpers_for(&version.id).len(),
                    released
                );
            }
        }

        "show" => {
            let name = required(name, "Version name or ID")?;
            let version = catalog.resolve_version(&name, product_id.as_deref())?;
            if ctx.json {
                return ctx.print_json(version);
            }

            println!("Version: {}", catalog.label(&version.id).if_supports_color(Stream::Stdout, |t| t.bold()));
            println!("  id: {}", version.id);
            if let Some(date) = version.released_at {
                println!("  released: {}", date);
            }
            if let Some(desc) = &version.description {
                println!("  description: {}", desc);
            }

            let helpers = catalog.helpers_for(&version.id);
            println!("  identification helpers ({}):", helpers.len());
            for helper in helpers {
                println!("    {} {} [{}]", helper.metadata.category(), helper.metadata.summary(), helper.id);
            }

            let relationships = catalog.relationships_of(&version.id);
            println!("  relationships ({}):", relationships.len());
            for rel in relationships {
                println!(
                    "    {} --[{}]--> {}",
                    catalog.label(&rel.source_id),
                    rel.category,
                    catalog.label(&rel.target_id)
                );
            }
        }

        "delete" | "rm" => {
            let name = required(name, "Version name or ID")?;
            let id = catalog.resolve_version(&name, product_id.as_deref())?.id.clone();
            let label = catalog.label(&id);
            catalog.remove_version(&id)?;
            ctx.save_catalog(&catalog)?;
            tracing::info!(%id, "version deleted");

            println!("Deleted version: {}", label);
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: create, list, show, delete", other);
        }
    }

    Ok(())
}
