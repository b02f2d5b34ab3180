// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Vendor → product → version tree and checkbox selection propagation
//!
//! The tree is a plain forest rebuilt from a [`CatalogStore`] on every
//! refresh. Parents are found by traversal, never stored, and the selected
//! id set is the only selection state: a node is "checked" exactly when its
//! id is in the set.

use crate::types::CatalogStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One selectable entity (vendor, product or version)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Unique across the whole tree
    pub id: String,
    /// Display name
    pub label: String,
    /// Ordered children, empty for leaves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf node
    #[must_use]
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Create a node with children
    #[must_use]
    pub fn branch(id: impl Into<String>, label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children,
        }
    }

    /// Whether the node has no children
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Build the vendor → product → version forest from a catalog snapshot.
///
/// Store order is kept at every level. Products whose vendor is missing,
/// versions whose product is missing and records whose id is already taken
/// by an earlier node are left out.
#[must_use]
pub fn build_tree(store: &CatalogStore) -> Vec<TreeNode> {
    let mut used: HashSet<&str> = HashSet::new();
    let mut roots = Vec::new();

    for vendor in &store.vendors {
        if !claim_id(&mut used, &vendor.id) {
            continue;
        }
        let mut products = Vec::new();
        for product in store.products.iter().filter(|p| p.vendor_id == vendor.id) {
            if !claim_id(&mut used, &product.id) {
                continue;
            }
            let versions = store
                .versions
                .iter()
                .filter(|v| v.product_id == product.id)
                .filter(|v| claim_id(&mut used, &v.id))
                .map(|v| TreeNode::leaf(&v.id, &v.name))
                .collect();
            products.push(TreeNode::branch(&product.id, &product.name, versions));
        }
        roots.push(TreeNode::branch(&vendor.id, &vendor.name, products));
    }
    roots
}

/// Node ids are unique across the whole forest; a repeat is left out
fn claim_id<'a>(used: &mut HashSet<&'a str>, id: &'a str) -> bool {
    if used.insert(id) {
        true
    } else {
        tracing::warn!(id, "id already used in the tree, record left out");
        false
    }
}

/// Find a node by id anywhere in the forest
#[must_use]
pub fn find_node<'a>(tree: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Find the immediate parent of `target_id`.
///
/// Returns `None` for root nodes and unknown ids.
#[must_use]
pub fn find_parent<'a>(tree: &'a [TreeNode], target_id: &str) -> Option<&'a TreeNode> {
    for node in tree {
        if node.children.iter().any(|child| child.id == target_id) {
            return Some(node);
        }
        if let Some(parent) = find_parent(&node.children, target_id) {
            return Some(parent);
        }
    }
    None
}

/// Ancestor ids of `target_id`, nearest first, excluding the node itself
#[must_use]
pub fn ancestor_chain(tree: &[TreeNode], target_id: &str) -> Vec<String> {
    let mut chain = Vec::new();
    let mut seen = HashSet::from([target_id]);
    let mut current = target_id;
    while let Some(parent) = find_parent(tree, current) {
        // a repeated id would climb forever
        if !seen.insert(parent.id.as_str()) {
            break;
        }
        chain.push(parent.id.clone());
        current = &parent.id;
    }
    chain
}

/// Expand `ids` with every descendant of every selected node.
///
/// Selections are found at any depth, including below unselected ancestors.
/// Unknown ids contribute nothing. The result is deduplicated and in tree
/// pre-order.
#[must_use]
pub fn expand_with_descendants<S: AsRef<str>>(tree: &[TreeNode], ids: &[S]) -> Vec<String> {
    let wanted: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    if !wanted.is_empty() {
        collect_selected(tree, &wanted, &mut seen, &mut out);
    }
    out
}

fn collect_selected(nodes: &[TreeNode], wanted: &HashSet<&str>, seen: &mut HashSet<String>, out: &mut Vec<String>) {
    for node in nodes {
        if wanted.contains(node.id.as_str()) {
            collect_subtree(node, seen, out);
        } else {
            collect_selected(&node.children, wanted, seen, out);
        }
    }
}

fn collect_subtree(node: &TreeNode, seen: &mut HashSet<String>, out: &mut Vec<String>) {
    if seen.insert(node.id.clone()) {
        out.push(node.id.clone());
    }
    for child in &node.children {
        collect_subtree(child, seen, out);
    }
}

/// Compute the next selected-id set after the tree widget reports a toggle.
///
/// A shorter `requested` than `current` is a deselection of exactly one id:
/// that id, its descendants and all its ancestors leave the set. Otherwise
/// exactly one id was added: it gains its descendants, and each ancestor
/// whose children are now all selected is added, walking up until the first
/// ancestor that is only partially selected.
#[must_use]
pub fn reconcile<S: AsRef<str>>(tree: &[TreeNode], requested: &[S], current: &[S]) -> Vec<String> {
    if requested.len() < current.len() {
        let still_requested: HashSet<&str> = requested.iter().map(AsRef::as_ref).collect();
        let Some(removed) = current
            .iter()
            .map(AsRef::as_ref)
            .find(|id| !still_requested.contains(id))
        else {
            return dedup(requested);
        };

        let mut dropped: HashSet<String> = ancestor_chain(tree, removed).into_iter().collect();
        dropped.extend(expand_with_descendants(tree, &[removed]));
        // the removed id itself may be unknown to the tree
        dropped.insert(removed.to_string());

        let kept: Vec<&str> = requested
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| !dropped.contains(*id))
            .collect();
        return dedup(&kept);
    }

    let previous: HashSet<&str> = current.iter().map(AsRef::as_ref).collect();
    let added = requested
        .iter()
        .map(AsRef::as_ref)
        .find(|id| !previous.contains(id));

    let mut ids = expand_with_descendants(tree, requested);
    let mut selected: HashSet<String> = ids.iter().cloned().collect();

    if let Some(added) = added {
        let mut visited = HashSet::from([added.to_string()]);
        let mut cursor = added.to_string();
        while let Some(parent) = find_parent(tree, &cursor) {
            if !visited.insert(parent.id.clone()) {
                break;
            }
            if !parent.children.iter().all(|child| selected.contains(&child.id)) {
                break;
            }
            if selected.insert(parent.id.clone()) {
                ids.push(parent.id.clone());
            }
            cursor.clone_from(&parent.id);
        }
    }

    ids
}

fn dedup<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(AsRef::as_ref)
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Display state of a checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Node id is in the selected set
    Checked,
    /// Some descendant is selected but the node is not
    Partial,
    /// Neither the node nor any descendant is selected
    Unchecked,
}

impl CheckState {
    /// Checkbox marker for text rendering
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Checked => "[x]",
            Self::Partial => "[-]",
            Self::Unchecked => "[ ]",
        }
    }
}

/// Selection state held by the Tree View: the selected id set plus the
/// node whose details are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSelection {
    selected: Vec<String>,
    focused: Option<String>,
}

impl TreeSelection {
    /// Empty selection, no focused node
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the checkbox of `id` and reconcile the selected set.
    ///
    /// The toggled node also becomes the focused node.
    pub fn toggle(&mut self, tree: &[TreeNode], id: &str) {
        let mut requested = self.selected.clone();
        if let Some(pos) = requested.iter().position(|s| s == id) {
            requested.remove(pos);
        } else {
            requested.push(id.to_string());
        }
        let next = reconcile(tree, &requested, &self.selected);
        tracing::debug!(node = id, before = self.selected.len(), after = next.len(), "selection reconciled");
        self.selected = next;
        self.focused = Some(id.to_string());
    }

    /// Show the details of `id` without changing the selected set
    pub fn focus(&mut self, id: &str) {
        self.focused = Some(id.to_string());
    }

    /// Clear Selection: empty the set and close the detail panel
    pub fn clear(&mut self) {
        self.selected.clear();
        self.focused = None;
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether `id` is in the selected set
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// The selected ids
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// The focused node id, if any
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Checkbox state of `node` for display
    #[must_use]
    pub fn check_state(&self, node: &TreeNode) -> CheckState {
        if self.contains(&node.id) {
            CheckState::Checked
        } else if node.children.iter().any(|c| self.check_state(c) != CheckState::Unchecked) {
            CheckState::Partial
        } else {
            CheckState::Unchecked
        }
    }
}

/// Render the forest as indented text with checkbox markers
#[must_use]
pub fn render_text(tree: &[TreeNode], selection: &TreeSelection) -> String {
    fn walk(nodes: &[TreeNode], depth: usize, selection: &TreeSelection, out: &mut String) {
        for node in nodes {
            out.push_str(&"  ".repeat(depth));
            out.push_str(selection.check_state(node).marker());
            out.push(' ');
            out.push_str(&node.label);
            out.push('\n');
            walk(&node.children, depth + 1, selection, out);
        }
    }

    let mut out = String::new();
    walk(tree, 0, selection, &mut out);
    out
}
