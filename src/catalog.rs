// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Catalog store - vendors, products, versions and their relationships
//!
//! The store is a single `catalog.json` in the data directory. Version
//! relationships are mirrored into a petgraph for traversal and export.

use crate::helpers::HelperError;
use crate::tree::{self, TreeNode};
use crate::types::{
    CatalogStore, IdentificationHelper, Product, ProductVersion, Relationship, Vendor,
};
use anyhow::{Context, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the store inside the data directory
pub const CATALOG_FILE: &str = "catalog.json";

/// Catalog integrity errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A referenced record does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind (vendor, product, version, ...)
        kind: &'static str,
        /// The missing id or name
        id: String,
    },

    /// A record with the same id already exists
    #[error("{kind} already exists: {id}")]
    Duplicate {
        /// Record kind
        kind: &'static str,
        /// The clashing id
        id: String,
    },

    /// A name matches several records
    #[error("ambiguous {kind} name '{name}', candidates: {}", candidates.join(", "))]
    Ambiguous {
        /// Record kind
        kind: &'static str,
        /// The name given
        name: String,
        /// Matching ids
        candidates: Vec<String>,
    },

    /// One id names several vendors, products or versions
    #[error("id '{id}' is used by more than one vendor, product or version ({kind})")]
    SharedId {
        /// Kind of the later record carrying the id
        kind: &'static str,
        /// The shared id
        id: String,
    },

    /// A relationship from a version to itself
    #[error("a version cannot be related to itself: {0}")]
    SelfRelationship(String),

    /// Helper metadata failed validation
    #[error(transparent)]
    Helper(#[from] HelperError),
}

/// Full record of one tree node, for the detail panel
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub enum NodeDetail<'a> {
    /// A vendor row
    Vendor(&'a Vendor),
    /// A product row
    Product(&'a Product),
    /// A version row
    Version(&'a ProductVersion),
}

/// Selected products bundled with their versions and helpers
#[derive(Debug, Clone, Serialize)]
pub struct ProductExport<'a> {
    /// Exported products
    pub products: Vec<&'a Product>,
    /// Versions of the exported products
    pub versions: Vec<&'a ProductVersion>,
    /// Helpers attached to those versions
    pub helpers: Vec<&'a IdentificationHelper>,
}

/// The catalog with a petgraph mirror of version relationships
pub struct Catalog {
    /// Version relationship graph (node weight = version id, edge weight = relationship id)
    graph: DiGraph<String, String>,
    /// Map from version ID to node index
    node_indices: HashMap<String, NodeIndex>,
    /// The persisted records
    pub store: CatalogStore,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(CatalogStore::default())
    }

    /// Wrap an existing snapshot, e.g. one fetched from the API
    #[must_use]
    pub fn from_store(store: CatalogStore) -> Self {
        let mut catalog = Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            store,
        };
        catalog.rebuild_graph();
        catalog
    }

    /// Wrap a snapshot from outside the local store.
    ///
    /// Vendor, product and version ids become tree node ids, so they must be
    /// unique across all three tables.
    pub fn try_from_store(store: CatalogStore) -> Result<Self, CatalogError> {
        {
            let mut seen: HashSet<&str> = HashSet::new();
            let ids = store
                .vendors
                .iter()
                .map(|v| ("vendor", &v.id))
                .chain(store.products.iter().map(|p| ("product", &p.id)))
                .chain(store.versions.iter().map(|v| ("version", &v.id)));
            for (kind, id) in ids {
                if !seen.insert(id.as_str()) {
                    return Err(CatalogError::SharedId { kind, id: id.clone() });
                }
            }
        }
        Ok(Self::from_store(store))
    }

    /// Load the catalog from a data directory; a missing file is an empty catalog
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CATALOG_FILE);

        let store: CatalogStore = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            tracing::debug!("No catalog at {}, starting empty", path.display());
            CatalogStore::default()
        };

        Ok(Self::from_store(store))
    }

    /// Save the catalog to a data directory
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let path = dir.join(CATALOG_FILE);
        let json = serde_json::to_string_pretty(&self.store).context("Failed to serialize catalog")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!(
            vendors = self.store.vendors.len(),
            products = self.store.products.len(),
            versions = self.store.versions.len(),
            "catalog saved"
        );
        Ok(())
    }

    /// Rebuild the petgraph from the store
    fn rebuild_graph(&mut self) {
        self.graph.clear();
        self.node_indices.clear();

        for version in &self.store.versions {
            let idx = self.graph.add_node(version.id.clone());
            self.node_indices.insert(version.id.clone(), idx);
        }

        for rel in &self.store.relationships {
            if let (Some(&from), Some(&to)) = (
                self.node_indices.get(&rel.source_id),
                self.node_indices.get(&rel.target_id),
            ) {
                self.graph.add_edge(from, to, rel.id.clone());
            }
        }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Add a vendor
    pub fn add_vendor(&mut self, vendor: Vendor) -> Result<(), CatalogError> {
        if self.vendor(&vendor.id).is_some() {
            return Err(CatalogError::Duplicate { kind: "vendor", id: vendor.id });
        }
        self.store.vendors.push(vendor);
        Ok(())
    }

    /// Add a product under an existing vendor
    pub fn add_product(&mut self, product: Product) -> Result<(), CatalogError> {
        if self.vendor(&product.vendor_id).is_none() {
            return Err(CatalogError::NotFound { kind: "vendor", id: product.vendor_id });
        }
        if self.product(&product.id).is_some() {
            return Err(CatalogError::Duplicate { kind: "product", id: product.id });
        }
        self.store.products.push(product);
        Ok(())
    }

    /// Add a version under an existing product
    pub fn add_version(&mut self, version: ProductVersion) -> Result<(), CatalogError> {
        if self.product(&version.product_id).is_none() {
            return Err(CatalogError::NotFound { kind: "product", id: version.product_id });
        }
        if self.version(&version.id).is_some() {
            return Err(CatalogError::Duplicate { kind: "version", id: version.id });
        }
        let idx = self.graph.add_node(version.id.clone());
        self.node_indices.insert(version.id.clone(), idx);
        self.store.versions.push(version);
        Ok(())
    }

    /// Add a relationship between two existing versions. Idempotent by id.
    pub fn add_relationship(&mut self, rel: Relationship) -> Result<(), CatalogError> {
        if rel.source_id == rel.target_id {
            return Err(CatalogError::SelfRelationship(rel.source_id));
        }
        let from = *self
            .node_indices
            .get(&rel.source_id)
            .ok_or_else(|| CatalogError::NotFound { kind: "version", id: rel.source_id.clone() })?;
        let to = *self
            .node_indices
            .get(&rel.target_id)
            .ok_or_else(|| CatalogError::NotFound { kind: "version", id: rel.target_id.clone() })?;

        if self.store.relationships.iter().any(|r| r.id == rel.id) {
            return Ok(());
        }

        self.graph.add_edge(from, to, rel.id.clone());
        self.store.relationships.push(rel);
        Ok(())
    }

    /// Attach a complete helper to an existing version. Idempotent by id.
    pub fn add_helper(&mut self, helper: IdentificationHelper) -> Result<(), CatalogError> {
        if self.version(&helper.version_id).is_none() {
            return Err(CatalogError::NotFound { kind: "version", id: helper.version_id });
        }
        helper.metadata.validate()?;
        if self.store.helpers.iter().any(|h| h.id == helper.id) {
            return Ok(());
        }
        self.store.helpers.push(helper);
        Ok(())
    }

    // =========================================================================
    // Delete (cascading)
    // =========================================================================

    /// Remove a vendor with all of its products and versions
    pub fn remove_vendor(&mut self, id: &str) -> Result<Vendor, CatalogError> {
        let pos = self
            .store
            .vendors
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| CatalogError::NotFound { kind: "vendor", id: id.to_string() })?;
        let product_ids: HashSet<String> = self
            .store
            .products
            .iter()
            .filter(|p| p.vendor_id == id)
            .map(|p| p.id.clone())
            .collect();
        self.drop_products(&product_ids);
        Ok(self.store.vendors.remove(pos))
    }

    /// Remove a product with all of its versions
    pub fn remove_product(&mut self, id: &str) -> Result<Product, CatalogError> {
        let product = self
            .product(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { kind: "product", id: id.to_string() })?;
        self.drop_products(&HashSet::from([product.id.clone()]));
        Ok(product)
    }

    /// Remove a version, its relationships and its helpers
    pub fn remove_version(&mut self, id: &str) -> Result<ProductVersion, CatalogError> {
        let version = self
            .version(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { kind: "version", id: id.to_string() })?;
        self.drop_versions(&HashSet::from([version.id.clone()]));
        Ok(version)
    }

    /// Remove a relationship by id
    pub fn remove_relationship(&mut self, id: &str) -> Result<Relationship, CatalogError> {
        let pos = self
            .store
            .relationships
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CatalogError::NotFound { kind: "relationship", id: id.to_string() })?;
        let rel = self.store.relationships.remove(pos);
        self.rebuild_graph();
        Ok(rel)
    }

    /// Remove a helper by id
    pub fn remove_helper(&mut self, id: &str) -> Result<IdentificationHelper, CatalogError> {
        let pos = self
            .store
            .helpers
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| CatalogError::NotFound { kind: "helper", id: id.to_string() })?;
        Ok(self.store.helpers.remove(pos))
    }

    fn drop_products(&mut self, product_ids: &HashSet<String>) {
        let version_ids: HashSet<String> = self
            .store
            .versions
            .iter()
            .filter(|v| product_ids.contains(&v.product_id))
            .map(|v| v.id.clone())
            .collect();
        self.store.products.retain(|p| !product_ids.contains(&p.id));
        self.drop_versions(&version_ids);
    }

    fn drop_versions(&mut self, version_ids: &HashSet<String>) {
        self.store.versions.retain(|v| !version_ids.contains(&v.id));
        self.store.relationships.retain(|r| {
            !version_ids.contains(&r.source_id) && !version_ids.contains(&r.target_id)
        });
        self.store.helpers.retain(|h| !version_ids.contains(&h.version_id));
        self.rebuild_graph();
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Get a vendor by ID
    #[must_use]
    pub fn vendor(&self, id: &str) -> Option<&Vendor> {
        self.store.vendors.iter().find(|v| v.id == id)
    }

    /// Get a product by ID
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.store.products.iter().find(|p| p.id == id)
    }

    /// Get a version by ID
    #[must_use]
    pub fn version(&self, id: &str) -> Option<&ProductVersion> {
        self.store.versions.iter().find(|v| v.id == id)
    }

    /// Resolve a vendor id or name
    pub fn resolve_vendor(&self, name_or_id: &str) -> Result<&Vendor, CatalogError> {
        if let Some(v) = self.vendor(name_or_id) {
            return Ok(v);
        }
        unique_match(
            "vendor",
            name_or_id,
            self.store.vendors.iter().filter(|v| v.name.eq_ignore_ascii_case(name_or_id)),
            |v| &v.id,
        )
    }

    /// Resolve a product id or name, optionally restricted to one vendor
    pub fn resolve_product(&self, name_or_id: &str, vendor_id: Option<&str>) -> Result<&Product, CatalogError> {
        if let Some(p) = self.product(name_or_id) {
            return Ok(p);
        }
        unique_match(
            "product",
            name_or_id,
            self.store.products.iter().filter(|p| {
                p.name.eq_ignore_ascii_case(name_or_id) && vendor_id.map_or(true, |v| p.vendor_id == v)
            }),
            |p| &p.id,
        )
    }

    /// Resolve a version id, or a version name within a product
    pub fn resolve_version(&self, name_or_id: &str, product_id: Option<&str>) -> Result<&ProductVersion, CatalogError> {
        if let Some(v) = self.version(name_or_id) {
            return Ok(v);
        }
        unique_match(
            "version",
            name_or_id,
            self.store
                .versions
                .iter()
                .filter(|v| v.name == name_or_id && product_id.map_or(true, |p| v.product_id == p)),
            |v| &v.id,
        )
    }

    /// Products of a vendor
    #[must_use]
    pub fn products_of(&self, vendor_id: &str) -> Vec<&Product> {
        self.store.products.iter().filter(|p| p.vendor_id == vendor_id).collect()
    }

    /// Versions of a product
    #[must_use]
    pub fn versions_of(&self, product_id: &str) -> Vec<&ProductVersion> {
        self.store.versions.iter().filter(|v| v.product_id == product_id).collect()
    }

    /// Helpers attached to a version
    #[must_use]
    pub fn helpers_for(&self, version_id: &str) -> Vec<&IdentificationHelper> {
        self.store.helpers.iter().filter(|h| h.version_id == version_id).collect()
    }

    /// Relationships touching a version, outgoing first
    #[must_use]
    pub fn relationships_of(&self, version_id: &str) -> Vec<&Relationship> {
        let Some(&idx) = self.node_indices.get(version_id) else {
            return Vec::new();
        };
        let mut rel_ids: Vec<&str> = Vec::new();
        for direction in [Direction::Outgoing, Direction::Incoming] {
            let mut edges: Vec<&str> = self
                .graph
                .edges_directed(idx, direction)
                .map(|e| e.weight().as_str())
                .collect();
            // petgraph walks edges newest first
            edges.reverse();
            rel_ids.extend(edges);
        }
        rel_ids
            .into_iter()
            .filter_map(|id| self.store.relationships.iter().find(|r| r.id == id))
            .collect()
    }

    /// Vendor → product → version tree for selection
    #[must_use]
    pub fn product_tree(&self) -> Vec<TreeNode> {
        tree::build_tree(&self.store)
    }

    /// The record behind a tree node id
    #[must_use]
    pub fn node_detail(&self, id: &str) -> Option<NodeDetail<'_>> {
        self.vendor(id)
            .map(NodeDetail::Vendor)
            .or_else(|| self.product(id).map(NodeDetail::Product))
            .or_else(|| self.version(id).map(NodeDetail::Version))
    }

    /// Bundle the given products with their versions and helpers.
    ///
    /// Ids that are not products (e.g. vendor or version ids from a tree
    /// selection) are skipped.
    #[must_use]
    pub fn export_products<S: AsRef<str>>(&self, ids: &[S]) -> ProductExport<'_> {
        let wanted: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        let products: Vec<&Product> = self
            .store
            .products
            .iter()
            .filter(|p| wanted.contains(p.id.as_str()))
            .collect();
        let product_ids: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
        let versions: Vec<&ProductVersion> = self
            .store
            .versions
            .iter()
            .filter(|v| product_ids.contains(v.product_id.as_str()))
            .collect();
        let version_ids: HashSet<&str> = versions.iter().map(|v| v.id.as_str()).collect();
        let helpers = self
            .store
            .helpers
            .iter()
            .filter(|h| version_ids.contains(h.version_id.as_str()))
            .collect();
        ProductExport { products, versions, helpers }
    }

    /// Check if the catalog has no vendors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.vendors.is_empty()
    }

    /// Display label for any record id
    #[must_use]
    pub fn label(&self, id: &str) -> String {
        if let Some(v) = self.version(id) {
            let product = self.product(&v.product_id).map_or(v.product_id.as_str(), |p| p.name.as_str());
            return format!("{product} {}", v.name);
        }
        match self.node_detail(id) {
            Some(NodeDetail::Vendor(v)) => v.name.clone(),
            Some(NodeDetail::Product(p)) => p.name.clone(),
            _ => id.to_string(),
        }
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Export version relationships to DOT, one cluster per vendor
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph catalog {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=rounded];\n");

        for vendor in &self.store.vendors {
            dot.push_str(&format!("\n  subgraph \"cluster_{}\" {{\n", vendor.id.replace(':', "_")));
            dot.push_str(&format!("    label=\"{}\";\n", escape(&vendor.name)));
            dot.push_str("    style=dashed;\n");
            for product in self.products_of(&vendor.id) {
                for version in self.versions_of(&product.id) {
                    dot.push_str(&format!(
                        "    \"{}\" [label=\"{}\\n{}\"];\n",
                        version.id,
                        escape(&product.name),
                        escape(&version.name)
                    ));
                }
            }
            dot.push_str("  }\n");
        }

        if !self.store.relationships.is_empty() {
            dot.push('\n');
        }
        for edge in self.graph.edge_indices() {
            let Some((from, to)) = self.graph.edge_endpoints(edge) else {
                continue;
            };
            let Some(rel) = self.store.relationships.iter().find(|r| r.id == self.graph[edge]) else {
                continue;
            };
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                self.graph[from], self.graph[to], rel.category
            ));
        }

        dot.push_str("}\n");
        dot
    }

    /// Export the whole store to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.store).context("Failed to serialize catalog to JSON")
    }
}

fn unique_match<'a, T>(
    kind: &'static str,
    name: &str,
    matches: impl Iterator<Item = &'a T>,
    id_of: impl Fn(&T) -> &String,
) -> Result<&'a T, CatalogError> {
    let matches: Vec<&T> = matches.collect();
    match matches.as_slice() {
        [] => Err(CatalogError::NotFound { kind, id: name.to_string() }),
        [one] => Ok(*one),
        many => Err(CatalogError::Ambiguous {
            kind,
            name: name.to_string(),
            candidates: many.iter().map(|m| id_of(*m).clone()).collect(),
        }),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
