// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;
use proddb::catalog::Catalog;
use proddb::types::CatalogStore;

// Any store that parses must build a tree and render without panicking,
// including dangling parent ids and relationships to missing versions.
fuzz_target!(|data: &[u8]| {
    let Ok(store) = serde_json::from_slice::<CatalogStore>(data) else {
        return;
    };
    let catalog = Catalog::from_store(store);
    let tree = catalog.product_tree();
    let _ = catalog.to_dot();
    for helper in &catalog.store.helpers {
        let _ = helper.metadata.validate();
        let _ = helper.metadata.summary();
    }
    if let Some(first) = tree.first() {
        let _ = catalog.node_detail(&first.id);
        let _ = catalog.relationships_of(&first.id);
    }
});
