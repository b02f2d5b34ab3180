// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Proddb library - administration of a vendor/product/version catalog
//!
//! This crate provides the catalog data model, the tree selection algorithm
//! used by the Tree View, identification helper metadata, the local catalog
//! store and the client for the remote catalog API.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod helpers;
pub mod tree;
pub mod tui;

/// Core catalog record types
pub mod types {
    use crate::helpers::HelperMetadata;
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Serialize};
    use sha2::{Digest, Sha256};
    use std::fmt;

    /// Convert a display name to the slug used inside ids
    #[must_use]
    pub fn slug(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for c in name.trim().to_lowercase().chars() {
            if c.is_alphanumeric() {
                out.push(c);
            } else if !out.ends_with('-') {
                out.push('-');
            }
        }
        out.trim_matches('-').to_string()
    }

    fn short_hash(parts: &[&str]) -> String {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        let hash = hex::encode(hasher.finalize());
        hash[..8].to_string()
    }

    // =========================================================================
    // Vendors and Products
    // =========================================================================

    /// A vendor owning one or more products
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Vendor {
        /// Unique identifier: vendor:<slug>
        pub id: String,
        /// Display name
        pub name: String,
        /// Free-form description
        #[serde(default)]
        pub description: Option<String>,
        /// When the record was created
        pub created_at: DateTime<Utc>,
    }

    impl Vendor {
        /// Generate the deterministic ID for a vendor name
        #[must_use]
        pub fn generate_id(name: &str) -> String {
            format!("vendor:{}", slug(name))
        }

        /// Create a vendor record stamped with the current time
        #[must_use]
        pub fn new(name: &str, description: Option<String>) -> Self {
            Self {
                id: Self::generate_id(name),
                name: name.trim().to_string(),
                description,
                created_at: Utc::now(),
            }
        }
    }

    /// Kind of product
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ProductType {
        /// Installable software
        #[default]
        Software,
        /// Physical device
        Hardware,
        /// Firmware shipped on a device
        Firmware,
    }

    impl ProductType {
        /// Parse a product type name
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.to_lowercase().as_str() {
                "software" | "sw" => Some(Self::Software),
                "hardware" | "hw" => Some(Self::Hardware),
                "firmware" | "fw" => Some(Self::Firmware),
                _ => None,
            }
        }

        /// Lowercase name used in JSON and on the command line
        #[must_use]
        pub fn as_str(&self) -> &'static str {
            match self {
                Self::Software => "software",
                Self::Hardware => "hardware",
                Self::Firmware => "firmware",
            }
        }
    }

    impl fmt::Display for ProductType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// A product sold or published by a vendor
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Product {
        /// Unique identifier: product:<vendor-slug>/<slug>
        pub id: String,
        /// Owning vendor ID
        pub vendor_id: String,
        /// Display name
        pub name: String,
        /// Free-form description
        #[serde(default)]
        pub description: Option<String>,
        /// Kind of product
        #[serde(default, rename = "type")]
        pub product_type: ProductType,
        /// When the record was created
        pub created_at: DateTime<Utc>,
    }

    impl Product {
        /// Generate the deterministic ID for a product under a vendor
        #[must_use]
        pub fn generate_id(vendor_id: &str, name: &str) -> String {
            let vendor = vendor_id.strip_prefix("vendor:").unwrap_or(vendor_id);
            format!("product:{}/{}", vendor, slug(name))
        }

        /// Create a product record stamped with the current time
        #[must_use]
        pub fn new(vendor_id: &str, name: &str, product_type: ProductType, description: Option<String>) -> Self {
            Self {
                id: Self::generate_id(vendor_id, name),
                vendor_id: vendor_id.to_string(),
                name: name.trim().to_string(),
                description,
                product_type,
                created_at: Utc::now(),
            }
        }
    }

    /// A released (or planned) version of a product
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ProductVersion {
        /// Unique identifier: version:<vendor-slug>/<product-slug>@<name>
        pub id: String,
        /// Owning product ID
        pub product_id: String,
        /// Version string, e.g. "2.4.1"
        pub name: String,
        /// Free-form description
        #[serde(default)]
        pub description: Option<String>,
        /// Release date if known
        #[serde(default)]
        pub released_at: Option<NaiveDate>,
        /// When the record was created
        pub created_at: DateTime<Utc>,
    }

    impl ProductVersion {
        /// Generate the deterministic ID for a version of a product
        #[must_use]
        pub fn generate_id(product_id: &str, name: &str) -> String {
            let product = product_id.strip_prefix("product:").unwrap_or(product_id);
            let version: String = name
                .trim()
                .chars()
                .map(|c| if c.is_whitespace() { '-' } else { c })
                .collect();
            format!("version:{product}@{version}")
        }

        /// Create a version record stamped with the current time
        #[must_use]
        pub fn new(product_id: &str, name: &str, released_at: Option<NaiveDate>, description: Option<String>) -> Self {
            Self {
                id: Self::generate_id(product_id, name),
                product_id: product_id.to_string(),
                name: name.trim().to_string(),
                description,
                released_at,
                created_at: Utc::now(),
            }
        }
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// How one product version relates to another
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RelationshipCategory {
        /// Source ships as a default component of target
        DefaultComponentOf,
        /// Source is an external component of target
        ExternalComponentOf,
        /// Source is installed on target
        InstalledOn,
        /// Source is installed together with target
        InstalledWith,
        /// Source is an optional component of target
        OptionalComponentOf,
    }

    impl RelationshipCategory {
        /// All categories in display order
        pub const ALL: [Self; 5] = [
            Self::DefaultComponentOf,
            Self::ExternalComponentOf,
            Self::InstalledOn,
            Self::InstalledWith,
            Self::OptionalComponentOf,
        ];

        /// Parse a category name (underscores or dashes)
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            let normalized = s.trim().to_lowercase().replace('-', "_");
            Self::ALL.into_iter().find(|c| c.as_str() == normalized)
        }

        /// snake_case name used in JSON and on the command line
        #[must_use]
        pub fn as_str(&self) -> &'static str {
            match self {
                Self::DefaultComponentOf => "default_component_of",
                Self::ExternalComponentOf => "external_component_of",
                Self::InstalledOn => "installed_on",
                Self::InstalledWith => "installed_with",
                Self::OptionalComponentOf => "optional_component_of",
            }
        }
    }

    impl fmt::Display for RelationshipCategory {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Directed relationship between two product versions
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Relationship {
        /// Content-hash ID: rel:<hash of (source, target, category)>
        pub id: String,
        /// Source version ID
        pub source_id: String,
        /// Target version ID
        pub target_id: String,
        /// Relationship category
        pub category: RelationshipCategory,
        /// When the record was created
        pub created_at: DateTime<Utc>,
    }

    impl Relationship {
        /// Generate a deterministic ID for a relationship
        #[must_use]
        pub fn generate_id(source_id: &str, target_id: &str, category: RelationshipCategory) -> String {
            format!("rel:{}", short_hash(&[source_id, target_id, category.as_str()]))
        }

        /// Create a relationship record stamped with the current time
        #[must_use]
        pub fn new(source_id: &str, target_id: &str, category: RelationshipCategory) -> Self {
            Self {
                id: Self::generate_id(source_id, target_id, category),
                source_id: source_id.to_string(),
                target_id: target_id.to_string(),
                category,
                created_at: Utc::now(),
            }
        }
    }

    // =========================================================================
    // Identification Helpers
    // =========================================================================

    /// Identifying metadata attached to a product version
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct IdentificationHelper {
        /// Content-hash ID: helper:<hash of (version, metadata)>
        pub id: String,
        /// Version this helper identifies
        pub version_id: String,
        /// Category-tagged payload
        pub metadata: HelperMetadata,
        /// When the record was created
        pub created_at: DateTime<Utc>,
    }

    impl IdentificationHelper {
        /// Generate a deterministic ID for a helper
        #[must_use]
        pub fn generate_id(version_id: &str, metadata: &HelperMetadata) -> String {
            let payload = serde_json::to_string(metadata).unwrap_or_default();
            format!("helper:{}", short_hash(&[version_id, metadata.category().as_str(), &payload]))
        }

        /// Create a helper record stamped with the current time
        #[must_use]
        pub fn new(version_id: &str, metadata: HelperMetadata) -> Self {
            Self {
                id: Self::generate_id(version_id, &metadata),
                version_id: version_id.to_string(),
                metadata,
                created_at: Utc::now(),
            }
        }
    }

    // =========================================================================
    // Catalog Store
    // =========================================================================

    /// The complete catalog snapshot, as persisted and as served by the API
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct CatalogStore {
        /// All vendors
        #[serde(default)]
        pub vendors: Vec<Vendor>,
        /// All products
        #[serde(default)]
        pub products: Vec<Product>,
        /// All product versions
        #[serde(default)]
        pub versions: Vec<ProductVersion>,
        /// All version relationships
        #[serde(default)]
        pub relationships: Vec<Relationship>,
        /// All identification helpers
        #[serde(default)]
        pub helpers: Vec<IdentificationHelper>,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
