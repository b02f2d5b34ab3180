// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Vendor management commands

use super::{required, CommandContext};
use crate::types::Vendor;
use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

/// Run vendor command
pub fn run(ctx: &CommandContext, action: &str, name: Option<String>, description: Option<String>) -> Result<()> {
    let mut catalog = ctx.load_catalog()?;

    match action {
        "create" | "new" => {
            let name = required(name, "Vendor name")?;
            let vendor = Vendor::new(&name, description);
            let id = vendor.id.clone();

            catalog.add_vendor(vendor)?;
            ctx.save_catalog(&catalog)?;
            tracing::info!(%id, "vendor created");

            println!("Created vendor: {} ({})", name, id);
        }

        "list" | "ls" => {
            if ctx.json {
                return ctx.print_json(&catalog.store.vendors);
            }
            if catalog.store.vendors.is_empty() {
                println!("No vendors defined. Use 'proddb vendor create <name>' to create one.");
                return Ok(());
            }

            println!("Vendors ({}):", catalog.store.vendors.len());
            for vendor in &catalog.store.vendors {
                println!(
                    "  {} [{}] - {} products",
                    vendor.name.if_supports_color(Stream::Stdout, |t| t.bold()),
                    vendor.id.if_supports_color(Stream::Stdout, |t| t.dimmed()),
                    catalog.products_of(&vendor.id).len()
                );
            }
        }

        "show" => {
            let name = required(name, "Vendor name or ID")?;
            let vendor = catalog.resolve_vendor(&name)?;
            if ctx.json {
                return ctx.print_json(vendor);
            }

            println!("Vendor: {}", vendor.name.if_supports_color(Stream::Stdout, |t| t.bold()));
            println!("  id: {}", vendor.id);
            if let Some(desc) = &vendor.description {
                println!("  description: {}", desc);
            }
            let products = catalog.products_of(&vendor.id);
            println!("  products ({}):", products.len());
            for product in products {
                println!("    {} [{}] - {}", product.name, product.id, product.product_type);
            }
        }

        "delete" | "rm" => {
            let name = required(name, "Vendor name or ID")?;
            let id = catalog.resolve_vendor(&name)?.id.clone();
            let vendor = catalog.remove_vendor(&id)?;
            ctx.save_catalog(&catalog)?;
            tracing::info!(%id, "vendor deleted");

            println!("Deleted vendor: {} (with its products and versions)", vendor.name);
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: create, list, show, delete", other);
        }
    }

    Ok(())
}
