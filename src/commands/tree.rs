// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Tree command - print the catalog tree, replaying checkbox toggles

use super::CommandContext;
use crate::tree::{render_text, TreeNode, TreeSelection};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct TreeOutput<'a> {
    tree: &'a [TreeNode],
    selected: &'a [String],
}

/// Run tree command. Each `--select` value toggles one node, in order.
pub fn run(ctx: &CommandContext, select: &[String]) -> Result<()> {
    let catalog = ctx.load_catalog()?;
    let tree = catalog.product_tree();

    let mut selection = TreeSelection::new();
    for name in select {
        let id = resolve_node(&tree, name)?;
        selection.toggle(&tree, &id);
    }

    if ctx.json {
        return ctx.print_json(&TreeOutput {
            tree: &tree,
            selected: selection.selected(),
        });
    }

    if tree.is_empty() {
        println!("Catalog is empty. Use 'proddb vendor create <name>' to start.");
        return Ok(());
    }

    print!("{}", render_text(&tree, &selection));
    if !selection.is_empty() {
        println!();
        println!("{} selected", selection.selected().len());
    }
    Ok(())
}

/// Resolve a node id, or a label that names exactly one node
fn resolve_node(tree: &[TreeNode], name: &str) -> Result<String> {
    fn collect<'a>(nodes: &'a [TreeNode], name: &str, out: &mut Vec<&'a TreeNode>) {
        for node in nodes {
            if node.id == name || node.label.eq_ignore_ascii_case(name) {
                out.push(node);
            }
            collect(&node.children, name, out);
        }
    }

    let mut matches = Vec::new();
    collect(tree, name, &mut matches);
    if let Some(exact) = matches.iter().find(|n| n.id == name) {
        return Ok(exact.id.clone());
    }
    match matches.as_slice() {
        [] => anyhow::bail!("No tree node matches: {}", name),
        [one] => Ok(one.id.clone()),
        many => {
            let ids: Vec<&str> = many.iter().map(|n| n.id.as_str()).collect();
            anyhow::bail!("Ambiguous node '{}', use one of: {}", name, ids.join(", "))
        }
    }
}
