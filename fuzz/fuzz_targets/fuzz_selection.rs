// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use proddb::tree::{TreeNode, TreeSelection};

#[derive(Debug, Arbitrary)]
struct Input {
    /// products per vendor, versions per product
    shape: Vec<Vec<u8>>,
    /// node picks, taken modulo the node count
    toggles: Vec<u16>,
}

fuzz_target!(|input: Input| {
    let tree: Vec<TreeNode> = input
        .shape
        .iter()
        .take(8)
        .enumerate()
        .map(|(v, products)| {
            let children = products
                .iter()
                .take(8)
                .enumerate()
                .map(|(p, versions)| {
                    let leaves = (0..versions % 8)
                        .map(|n| TreeNode::leaf(format!("{v}/{p}@{n}"), n.to_string()))
                        .collect();
                    TreeNode::branch(format!("{v}/{p}"), p.to_string(), leaves)
                })
                .collect();
            TreeNode::branch(v.to_string(), v.to_string(), children)
        })
        .collect();

    let mut ids = Vec::new();
    let mut stack: Vec<&TreeNode> = tree.iter().collect();
    while let Some(node) = stack.pop() {
        ids.push(node.id.clone());
        stack.extend(node.children.iter());
    }
    if ids.is_empty() {
        return;
    }

    let mut selection = TreeSelection::new();
    for pick in input.toggles.iter().take(64) {
        let id = &ids[usize::from(*pick) % ids.len()];
        let before = selection.contains(id);
        selection.toggle(&tree, id);
        assert_ne!(before, selection.contains(id));
    }
});
