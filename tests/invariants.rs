// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for catalog-backed tree selection
//!
//! These tests verify:
//! 1. Selection propagation over a tree built from a real catalog
//! 2. Catalog edits keep the tree consistent with the store
//! 3. API-shaped payloads load into the same store

use proddb::catalog::Catalog;
use proddb::helpers::HelperMetadata;
use proddb::tree::{ancestor_chain, expand_with_descendants, find_parent, reconcile, TreeSelection};
use proddb::types::{
    CatalogStore, IdentificationHelper, Product, ProductType, ProductVersion, Relationship,
    RelationshipCategory, Vendor,
};
use std::collections::HashSet;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Two vendors: Acme (Widget 1.0/2.0, Gadget 1.0) and Globex (Router 7)
fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for vendor in ["Acme", "Globex"] {
        catalog.add_vendor(Vendor::new(vendor, None)).unwrap();
    }
    let products = [
        ("vendor:acme", "Widget", ProductType::Software),
        ("vendor:acme", "Gadget", ProductType::Hardware),
        ("vendor:globex", "Router", ProductType::Firmware),
    ];
    for (vendor, name, kind) in products {
        catalog.add_product(Product::new(vendor, name, kind, None)).unwrap();
    }
    let versions = [
        ("product:acme/widget", "1.0"),
        ("product:acme/widget", "2.0"),
        ("product:acme/gadget", "1.0"),
        ("product:globex/router", "7"),
    ];
    for (product, name) in versions {
        catalog.add_version(ProductVersion::new(product, name, None, None)).unwrap();
    }
    catalog
}

fn set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| (*s).to_string()).collect()
}

fn as_set(ids: &[String]) -> HashSet<String> {
    ids.iter().cloned().collect()
}

// =============================================================================
// Selection over catalog trees
// =============================================================================

#[test]
fn test_vendor_selection_covers_whole_subtree() {
    let tree = sample_catalog().product_tree();
    let expanded = expand_with_descendants(&tree, &["vendor:acme"]);

    assert_eq!(
        expanded,
        vec![
            "vendor:acme",
            "product:acme/widget",
            "version:acme/widget@1.0",
            "version:acme/widget@2.0",
            "product:acme/gadget",
            "version:acme/gadget@1.0",
        ]
    );
}

#[test]
fn test_completing_a_product_does_not_complete_its_vendor() {
    let tree = sample_catalog().product_tree();
    let mut selection = TreeSelection::new();

    selection.toggle(&tree, "version:acme/widget@1.0");
    selection.toggle(&tree, "version:acme/widget@2.0");

    // Gadget is unselected, so Acme stays out
    assert_eq!(
        as_set(selection.selected()),
        set(&["version:acme/widget@1.0", "version:acme/widget@2.0", "product:acme/widget"])
    );

    selection.toggle(&tree, "version:acme/gadget@1.0");
    assert!(selection.contains("product:acme/gadget"));
    assert!(selection.contains("vendor:acme"));
    assert!(!selection.contains("vendor:globex"));
}

#[test]
fn test_single_child_chain_selects_upwards() {
    let tree = sample_catalog().product_tree();
    let next = reconcile(&tree, &["version:globex/router@7"], &[]);

    assert_eq!(
        as_set(&next),
        set(&["version:globex/router@7", "product:globex/router", "vendor:globex"])
    );
}

#[test]
fn test_deselect_leaf_under_selected_vendor() {
    let tree = sample_catalog().product_tree();
    let mut selection = TreeSelection::new();
    selection.toggle(&tree, "vendor:acme");
    selection.toggle(&tree, "version:acme/widget@2.0");

    assert_eq!(
        as_set(selection.selected()),
        set(&["version:acme/widget@1.0", "product:acme/gadget", "version:acme/gadget@1.0"])
    );
}

#[test]
fn test_parent_lookups_follow_catalog_hierarchy() {
    let tree = sample_catalog().product_tree();

    let parent = find_parent(&tree, "version:acme/gadget@1.0").unwrap();
    assert_eq!(parent.id, "product:acme/gadget");
    assert!(find_parent(&tree, "vendor:globex").is_none());
    assert_eq!(
        ancestor_chain(&tree, "version:globex/router@7"),
        vec!["product:globex/router", "vendor:globex"]
    );
}

// =============================================================================
// Catalog edits
// =============================================================================

#[test]
fn test_removed_product_leaves_tree() {
    let mut catalog = sample_catalog();
    catalog.remove_product("product:acme/widget").unwrap();
    let tree = catalog.product_tree();

    assert!(expand_with_descendants(&tree, &["version:acme/widget@1.0"]).is_empty());
    assert_eq!(
        expand_with_descendants(&tree, &["vendor:acme"]),
        vec!["vendor:acme", "product:acme/gadget", "version:acme/gadget@1.0"]
    );
}

#[test]
fn test_stale_selection_drops_out_on_next_toggle() {
    let mut catalog = sample_catalog();
    let tree = catalog.product_tree();
    let mut selection = TreeSelection::new();
    selection.toggle(&tree, "version:acme/widget@1.0");

    catalog.remove_version("version:acme/widget@1.0").unwrap();
    let refreshed = catalog.product_tree();

    // Kept until the next gesture
    assert!(selection.contains("version:acme/widget@1.0"));

    selection.toggle(&refreshed, "version:globex/router@7");
    assert!(!selection.contains("version:acme/widget@1.0"));
    assert!(selection.contains("vendor:globex"));
}

#[test]
fn test_version_removal_drops_helpers_and_relationships() {
    let mut catalog = sample_catalog();
    let rel = Relationship::new(
        "version:acme/widget@2.0",
        "version:globex/router@7",
        RelationshipCategory::InstalledOn,
    );
    catalog.add_relationship(rel).unwrap();
    let helper = IdentificationHelper::new(
        "version:globex/router@7",
        HelperMetadata::Skus { skus: vec!["RT-7".into()] },
    );
    catalog.add_helper(helper).unwrap();

    catalog.remove_vendor("vendor:globex").unwrap();

    assert!(catalog.store.relationships.is_empty());
    assert!(catalog.store.helpers.is_empty());
    assert!(catalog.relationships_of("version:acme/widget@2.0").is_empty());
}

#[test]
fn test_saved_catalog_rebuilds_same_tree() {
    let dir = TempDir::new().unwrap();
    let catalog = sample_catalog();
    catalog.save(dir.path()).unwrap();

    let loaded = Catalog::load(dir.path()).unwrap();
    assert_eq!(loaded.product_tree(), catalog.product_tree());
}

// =============================================================================
// API payloads
// =============================================================================

#[test]
fn test_api_shaped_store_deserializes() {
    let json = r#"{
        "vendors": [
            {"id": "vendor:acme", "name": "Acme", "created_at": "2025-01-01T00:00:00Z"}
        ],
        "products": [
            {"id": "product:acme/widget", "vendor_id": "vendor:acme", "name": "Widget",
             "type": "firmware", "created_at": "2025-01-01T00:00:00Z"}
        ],
        "versions": [
            {"id": "version:acme/widget@3.1", "product_id": "product:acme/widget", "name": "3.1",
             "released_at": "2024-11-05", "created_at": "2025-01-01T00:00:00Z"}
        ],
        "helpers": [
            {"id": "helper:0badf00d", "version_id": "version:acme/widget@3.1",
             "metadata": {"category": "purl", "purl": "pkg:generic/widget@3.1"},
             "created_at": "2025-01-01T00:00:00Z"}
        ]
    }"#;

    let store: CatalogStore = serde_json::from_str(json).unwrap();
    assert!(store.relationships.is_empty());
    assert_eq!(store.products[0].product_type, ProductType::Firmware);

    let catalog = Catalog::from_store(store);
    assert_eq!(catalog.label("version:acme/widget@3.1"), "Widget 3.1");
    assert_eq!(catalog.helpers_for("version:acme/widget@3.1").len(), 1);
}
