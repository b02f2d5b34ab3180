// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use super::CommandContext;
use anyhow::Result;

/// Run view command: open the Tree View over the local catalog
pub fn run(ctx: &CommandContext) -> Result<()> {
    let catalog = ctx.load_catalog()?;
    if catalog.is_empty() {
        println!("Catalog is empty. Use 'proddb vendor create <name>' or 'proddb pull' first.");
        return Ok(());
    }

    tracing::info!("Launching Tree View...");
    let selected = crate::tui::run(catalog)?;

    if ctx.json {
        return ctx.print_json(&selected);
    }
    if !selected.is_empty() {
        println!("Selected ({}):", selected.len());
        for id in selected {
            println!("  {id}");
        }
    }
    Ok(())
}
