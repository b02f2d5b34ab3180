// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - exports the catalog to various formats

use super::CommandContext;
use crate::tree::{render_text, TreeSelection};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT of version relationships
    Dot,
    /// The full store as JSON
    Json,
    /// Indented vendor/product/version tree
    Tree,
}

impl ExportFormat {
    /// Parse format from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Some(Self::Dot),
            "json" => Some(Self::Json),
            "tree" | "txt" | "text" => Some(Self::Tree),
            _ => None,
        }
    }

    /// Get file extension for format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Json => "json",
            Self::Tree => "txt",
        }
    }
}

/// Run the export command
pub fn run(ctx: &CommandContext, format: &str, output: Option<PathBuf>) -> Result<()> {
    info!("Exporting to {}", format);

    let export_format = ExportFormat::parse(format)
        .ok_or_else(|| anyhow::anyhow!("Unknown export format: {}. Supported: dot, json, tree", format))?;

    let catalog = ctx.load_catalog()?;
    if catalog.is_empty() {
        eprintln!("Warning: Catalog is empty. Run 'proddb pull' or create a vendor first.");
    }

    let content = match export_format {
        ExportFormat::Dot => catalog.to_dot(),
        ExportFormat::Json => catalog.to_json()?,
        ExportFormat::Tree => render_text(&catalog.product_tree(), &TreeSelection::new()),
    };

    match output {
        Some(mut path) => {
            if path.extension().is_none() {
                path.set_extension(export_format.extension());
            }
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
