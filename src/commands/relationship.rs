// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Relationship management commands - link product versions

use super::{required, CommandContext};
use crate::catalog::Catalog;
use crate::types::{Relationship, RelationshipCategory};
use anyhow::Result;

/// Run relationship command
pub fn run(
    ctx: &CommandContext,
    action: &str,
    from: Option<String>,
    to: Option<String>,
    category: Option<String>,
    id: Option<String>,
) -> Result<()> {
    let mut catalog = ctx.load_catalog()?;

    match action {
        "add" | "create" => {
            let from = required(from, "--from")?;
            let to = required(to, "--to")?;
            let category = parse_category(category.as_deref().unwrap_or("default_component_of"))?;

            let source_id = catalog.resolve_version(&from, None)?.id.clone();
            let target_id = catalog.resolve_version(&to, None)?.id.clone();

            let rel = Relationship::new(&source_id, &target_id, category);
            let rel_id = rel.id.clone();
            catalog.add_relationship(rel)?;
            ctx.save_catalog(&catalog)?;
            tracing::info!(id = %rel_id, "relationship created");

            println!(
                "Created relationship: {} --[{}]--> {}",
                catalog.label(&source_id),
                category,
                catalog.label(&target_id)
            );
            println!("  id: {}", rel_id);
        }

        "remove" | "delete" | "rm" => {
            let removed = if let Some(id) = id {
                vec![catalog.remove_relationship(&id)?]
            } else {
                let from = required(from, "--id or --from")?;
                let to = required(to, "--to")?;
                remove_between(&mut catalog, &from, &to, category.as_deref())?
            };

            if removed.is_empty() {
                println!("No matching relationships found");
            } else {
                ctx.save_catalog(&catalog)?;
                println!("Removed {} relationship(s)", removed.len());
            }
        }

        "list" | "ls" => {
            if ctx.json {
                return ctx.print_json(&catalog.store.relationships);
            }
            if catalog.store.relationships.is_empty() {
                println!("No relationships defined. Use 'proddb relationship add' to create one.");
                return Ok(());
            }

            println!("Relationships ({}):", catalog.store.relationships.len());
            for rel in &catalog.store.relationships {
                println!(
                    "  {} --[{}]--> {}  ({})",
                    catalog.label(&rel.source_id),
                    rel.category,
                    catalog.label(&rel.target_id),
                    rel.id
                );
            }
        }

        "categories" => {
            for category in RelationshipCategory::ALL {
                println!("{category}");
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: add, remove, list, categories", other);
        }
    }

    Ok(())
}

fn parse_category(s: &str) -> Result<RelationshipCategory> {
    RelationshipCategory::parse(s).ok_or_else(|| {
        let valid: Vec<&str> = RelationshipCategory::ALL.iter().map(RelationshipCategory::as_str).collect();
        anyhow::anyhow!("Unknown relationship category: {}. Valid: {}", s, valid.join(", "))
    })
}

fn remove_between(
    catalog: &mut Catalog,
    from: &str,
    to: &str,
    category: Option<&str>,
) -> Result<Vec<Relationship>> {
    let source_id = catalog.resolve_version(from, None)?.id.clone();
    let target_id = catalog.resolve_version(to, None)?.id.clone();
    let category = category.map(parse_category).transpose()?;

    let ids: Vec<String> = catalog
        .store
        .relationships
        .iter()
        .filter(|r| r.source_id == source_id && r.target_id == target_id)
        .filter(|r| category.map_or(true, |c| r.category == c))
        .map(|r| r.id.clone())
        .collect();

    let mut removed = Vec::with_capacity(ids.len());
    for id in ids {
        removed.push(catalog.remove_relationship(&id)?);
    }
    Ok(removed)
}
