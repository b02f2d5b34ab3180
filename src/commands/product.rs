// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Product management commands, including bulk export of selected products

use super::{required, CommandContext};
use crate::catalog::Catalog;
use crate::types::{Product, ProductType};
use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Arguments for product commands
pub struct ProductArgs {
    /// Owning vendor (name or ID)
    pub vendor: Option<String>,
    /// Product type
    pub product_type: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Selected product IDs or names (selectable mode)
    pub select: Vec<String>,
    /// Export destination (stdout if not specified)
    pub output: Option<PathBuf>,
}

/// How the list renders rows. Owned by one list invocation.
enum ListMode {
    Plain,
    Selectable(HashSet<String>),
}

impl ListMode {
    fn marker(&self, id: &str) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Selectable(selected) if selected.contains(id) => "[x] ",
            Self::Selectable(_) => "[ ] ",
        }
    }
}

/// Run product command
pub fn run(ctx: &CommandContext, action: &str, name: Option<String>, args: ProductArgs) -> Result<()> {
    let mut catalog = ctx.load_catalog()?;

    match action {
        "create" | "new" => {
            let name = required(name, "Product name")?;
            let vendor = required(args.vendor, "--vendor")?;
            let vendor_id = catalog.resolve_vendor(&vendor)?.id.clone();
            let product_type = match args.product_type.as_deref() {
                None => ProductType::default(),
                Some(t) => ProductType::parse(t).ok_or_else(|| {
                    anyhow::anyhow!("Unknown product type: {}. Valid: software, hardware, firmware", t)
                })?,
            };

            let product = Product::new(&vendor_id, &name, product_type, args.description);
            let id = product.id.clone();
            catalog.add_product(product)?;
            ctx.save_catalog(&catalog)?;
            tracing::info!(%id, "product created");

            println!("Created product: {} ({})", name, id);
            println!("  type: {}", product_type);
        }

        "list" | "ls" => {
            let vendor_id = match &args.vendor {
                Some(v) => Some(catalog.resolve_vendor(v)?.id.clone()),
                None => None,
            };
            let products: Vec<&Product> = catalog
                .store
                .products
                .iter()
                .filter(|p| vendor_id.as_ref().map_or(true, |v| &p.vendor_id == v))
                .collect();

            if ctx.json {
                return ctx.print_json(&products);
            }
            if products.is_empty() {
                println!("No products defined. Use 'proddb product create <name> --vendor <vendor>' to create one.");
                return Ok(());
            }

            let mode = if args.select.is_empty() {
                ListMode::Plain
            } else {
                ListMode::Selectable(resolve_selection(&catalog, &args.select)?)
            };

            println!("Products ({}):", products.len());
            for product in products {
                print_row(&catalog, product, &mode);
            }
        }

        "show" => {
            let name = required(name, "Product name or ID")?;
            let product = catalog.resolve_product(&name, None)?;
            if ctx.json {
                return ctx.print_json(product);
            }

            println!("Product: {}", product.name.if_supports_color(Stream::Stdout, |t| t.bold()));
            println!("  id: {}", product.id);
            println!("  vendor: {}", catalog.label(&product.vendor_id));
            println!("  type: {}", product.product_type);
            if let Some(desc) = &product.description {
                println!("  description: {}", desc);
            }
            let versions = catalog.versions_of(&product.id);
            println!("  versions ({}):", versions.len());
            for version in versions {
                println!("    {} [{}]", version.name, version.id);
            }
        }

        "delete" | "rm" => {
            let name = required(name, "Product name or ID")?;
            let id = catalog.resolve_product(&name, None)?.id.clone();
            let product = catalog.remove_product(&id)?;
            ctx.save_catalog(&catalog)?;
            tracing::info!(%id, "product deleted");

            println!("Deleted product: {} (with its versions)", product.name);
        }

        "export" => {
            if args.select.is_empty() {
                anyhow::bail!("Select at least one product with --select");
            }
            let selected: Vec<String> = resolve_selection(&catalog, &args.select)?.into_iter().collect();
            let export = catalog.export_products(&selected);
            let json = serde_json::to_string_pretty(&export).context("Failed to serialize export")?;

            match args.output {
                Some(path) => {
                    fs::write(&path, &json)
                        .with_context(|| format!("Failed to write to {}", path.display()))?;
                    println!(
                        "Exported {} products ({} versions) to {}",
                        export.products.len(),
                        export.versions.len(),
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: create, list, show, delete, export", other);
        }
    }

    Ok(())
}

fn resolve_selection(catalog: &Catalog, select: &[String]) -> Result<HashSet<String>> {
    select
        .iter()
        .map(|s| -> Result<String> { Ok(catalog.resolve_product(s, None)?.id.clone()) })
        .collect()
}

fn print_row(catalog: &Catalog, product: &Product, mode: &ListMode) {
    println!(
        "  {}{} [{}] - {}, {} versions ({})",
        mode.marker(&product.id),
        product.name.if_supports_color(Stream::Stdout, |t| t.bold()),
        product.id.if_supports_color(Stream::Stdout, |t| t.dimmed()),
        product.product_type,
        catalog.versions_of(&product.id).len(),
        catalog.label(&product.vendor_id)
    );
}
