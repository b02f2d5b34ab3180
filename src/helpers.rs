// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Identification helpers - structured identifying metadata for versions
//!
//! Each category carries its own payload shape and its own completeness rule.
//! A payload is only stored once [`HelperMetadata::validate`] accepts it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identification helper category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelperCategory {
    /// Common Platform Enumeration string
    Cpe,
    /// File hashes
    Hashes,
    /// Model numbers
    Models,
    /// Package URL
    Purl,
    /// SBOM locations
    Sbom,
    /// Serial numbers
    SerialNumbers,
    /// Stock keeping units
    Skus,
    /// Namespaced generic URIs
    Uri,
}

impl HelperCategory {
    /// All categories in display order
    pub const ALL: [Self; 8] = [
        Self::Cpe,
        Self::Hashes,
        Self::Models,
        Self::Purl,
        Self::Sbom,
        Self::SerialNumbers,
        Self::Skus,
        Self::Uri,
    ];

    /// Parse a category name, accepting the long CSAF-style aliases
    pub fn parse(s: &str) -> Result<Self, HelperError> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let category = match normalized.as_str() {
            "cpe" => Self::Cpe,
            "hashes" | "hash" => Self::Hashes,
            "models" | "model_numbers" => Self::Models,
            "purl" => Self::Purl,
            "sbom" | "sbom_urls" => Self::Sbom,
            "serial_numbers" | "serials" => Self::SerialNumbers,
            "skus" | "sku" => Self::Skus,
            "uri" | "uris" | "x_generic_uris" => Self::Uri,
            _ => return Err(HelperError::UnknownCategory(s.to_string())),
        };
        Ok(category)
    }

    /// snake_case name used in JSON and on the command line
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpe => "cpe",
            Self::Hashes => "hashes",
            Self::Models => "models",
            Self::Purl => "purl",
            Self::Sbom => "sbom",
            Self::SerialNumbers => "serial_numbers",
            Self::Skus => "skus",
            Self::Uri => "uri",
        }
    }

    /// One-line description of the expected `--data` value
    #[must_use]
    pub fn data_hint(&self) -> &'static str {
        match self {
            Self::Cpe => "cpe:2.3:<part>:<vendor>:<product>:...",
            Self::Hashes => r#"[{"filename": "...", "items": [{"algorithm": "sha256", "value": "..."}]}]"#,
            Self::Models => "comma-separated list or JSON array",
            Self::Purl => "pkg:<type>/<namespace>/<name>@<version>",
            Self::Sbom => "comma-separated http(s) URLs or JSON array",
            Self::SerialNumbers => "comma-separated list or JSON array",
            Self::Skus => "comma-separated list or JSON array",
            Self::Uri => r#"[{"namespace": "...", "uri": "..."}]"#,
        }
    }
}

impl fmt::Display for HelperCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building or validating helper metadata
#[derive(Debug, Error)]
pub enum HelperError {
    /// Category name not recognised
    #[error("unknown identification helper category: {0}")]
    UnknownCategory(String),

    /// List payload without entries
    #[error("{0} requires at least one entry")]
    Empty(HelperCategory),

    /// Blank string (or blank field) in a list payload
    #[error("{category} entry {index} is blank")]
    BlankEntry {
        /// Offending category
        category: HelperCategory,
        /// Zero-based position of the entry
        index: usize,
    },

    /// String payload with the wrong scheme prefix
    #[error("{category} value '{value}' must look like {expected}")]
    Malformed {
        /// Offending category
        category: HelperCategory,
        /// The rejected value
        value: String,
        /// Expected shape
        expected: &'static str,
    },

    /// `--data` could not be parsed
    #[error("invalid helper data: {0}")]
    Json(#[from] serde_json::Error),
}

/// One hash of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashItem {
    /// Hash algorithm, e.g. "sha256"
    pub algorithm: String,
    /// Hex digest
    pub value: String,
}

/// Hashes of one named file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHash {
    /// File name the hashes were computed over
    pub filename: String,
    /// Hash values
    #[serde(default)]
    pub items: Vec<HashItem>,
}

/// A URI qualified by the namespace that defines it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericUri {
    /// Namespace URI
    pub namespace: String,
    /// The identifying URI
    pub uri: String,
}

/// Identification helper payload, tagged by category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum HelperMetadata {
    /// CPE string
    Cpe {
        /// e.g. "cpe:2.3:a:acme:anvil:1.0:*:*:*:*:*:*:*"
        cpe: String,
    },
    /// File hashes
    Hashes {
        /// Hashed files
        file_hashes: Vec<FileHash>,
    },
    /// Model numbers
    Models {
        /// Model numbers
        models: Vec<String>,
    },
    /// Package URL
    Purl {
        /// e.g. "pkg:cargo/serde@1.0.0"
        purl: String,
    },
    /// SBOM URLs
    Sbom {
        /// Locations of SBOM documents
        sbom_urls: Vec<String>,
    },
    /// Serial numbers
    SerialNumbers {
        /// Serial numbers
        serial_numbers: Vec<String>,
    },
    /// Stock keeping units
    Skus {
        /// SKUs
        skus: Vec<String>,
    },
    /// Generic URIs
    Uri {
        /// Namespace/URI pairs
        uris: Vec<GenericUri>,
    },
}

impl HelperMetadata {
    /// The category tag of this payload
    #[must_use]
    pub fn category(&self) -> HelperCategory {
        match self {
            Self::Cpe { .. } => HelperCategory::Cpe,
            Self::Hashes { .. } => HelperCategory::Hashes,
            Self::Models { .. } => HelperCategory::Models,
            Self::Purl { .. } => HelperCategory::Purl,
            Self::Sbom { .. } => HelperCategory::Sbom,
            Self::SerialNumbers { .. } => HelperCategory::SerialNumbers,
            Self::Skus { .. } => HelperCategory::Skus,
            Self::Uri { .. } => HelperCategory::Uri,
        }
    }

    /// The blank form for a category
    #[must_use]
    pub fn empty(category: HelperCategory) -> Self {
        match category {
            HelperCategory::Cpe => Self::Cpe { cpe: String::new() },
            HelperCategory::Hashes => Self::Hashes { file_hashes: Vec::new() },
            HelperCategory::Models => Self::Models { models: Vec::new() },
            HelperCategory::Purl => Self::Purl { purl: String::new() },
            HelperCategory::Sbom => Self::Sbom { sbom_urls: Vec::new() },
            HelperCategory::SerialNumbers => Self::SerialNumbers { serial_numbers: Vec::new() },
            HelperCategory::Skus => Self::Skus { skus: Vec::new() },
            HelperCategory::Uri => Self::Uri { uris: Vec::new() },
        }
    }

    /// Build a payload from command-line input.
    ///
    /// CPE and purl take the raw string. List categories take a JSON array or
    /// a comma-separated list. Hashes and URIs take a JSON array of entries.
    pub fn from_cli(category: HelperCategory, data: &str) -> Result<Self, HelperError> {
        let data = data.trim();
        let metadata = match category {
            HelperCategory::Cpe => Self::Cpe { cpe: data.to_string() },
            HelperCategory::Purl => Self::Purl { purl: data.to_string() },
            HelperCategory::Models => Self::Models { models: string_list(data)? },
            HelperCategory::Sbom => Self::Sbom { sbom_urls: string_list(data)? },
            HelperCategory::SerialNumbers => Self::SerialNumbers { serial_numbers: string_list(data)? },
            HelperCategory::Skus => Self::Skus { skus: string_list(data)? },
            HelperCategory::Hashes => Self::Hashes { file_hashes: serde_json::from_str(data)? },
            HelperCategory::Uri => Self::Uri { uris: serde_json::from_str(data)? },
        };
        Ok(metadata)
    }

    /// Check that the payload is complete enough to submit
    pub fn validate(&self) -> Result<(), HelperError> {
        let category = self.category();
        match self {
            Self::Cpe { cpe } => {
                let rest = cpe
                    .strip_prefix("cpe:2.3:")
                    .or_else(|| cpe.strip_prefix("cpe:/"));
                match rest {
                    Some(rest) if !rest.trim().is_empty() => Ok(()),
                    _ => Err(HelperError::Malformed {
                        category,
                        value: cpe.clone(),
                        expected: "cpe:2.3:... or cpe:/...",
                    }),
                }
            }
            Self::Purl { purl } => {
                let well_formed = purl
                    .strip_prefix("pkg:")
                    .and_then(|rest| rest.split_once('/'))
                    .is_some_and(|(kind, name)| !kind.is_empty() && !name.trim().is_empty());
                if well_formed {
                    Ok(())
                } else {
                    Err(HelperError::Malformed {
                        category,
                        value: purl.clone(),
                        expected: "pkg:<type>/<name>",
                    })
                }
            }
            Self::Models { models: entries }
            | Self::SerialNumbers { serial_numbers: entries }
            | Self::Skus { skus: entries } => non_blank(category, entries),
            Self::Sbom { sbom_urls } => {
                non_blank(category, sbom_urls)?;
                match sbom_urls
                    .iter()
                    .find(|u| !(u.starts_with("https://") || u.starts_with("http://")))
                {
                    Some(bad) => Err(HelperError::Malformed {
                        category,
                        value: bad.clone(),
                        expected: "an http(s) URL",
                    }),
                    None => Ok(()),
                }
            }
            Self::Hashes { file_hashes } => {
                if file_hashes.is_empty() {
                    return Err(HelperError::Empty(category));
                }
                for (index, file) in file_hashes.iter().enumerate() {
                    let items_ok = !file.items.is_empty()
                        && file
                            .items
                            .iter()
                            .all(|h| !h.algorithm.trim().is_empty() && !h.value.trim().is_empty());
                    if file.filename.trim().is_empty() || !items_ok {
                        return Err(HelperError::BlankEntry { category, index });
                    }
                }
                Ok(())
            }
            Self::Uri { uris } => {
                if uris.is_empty() {
                    return Err(HelperError::Empty(category));
                }
                match uris
                    .iter()
                    .position(|u| u.namespace.trim().is_empty() || u.uri.trim().is_empty())
                {
                    Some(index) => Err(HelperError::BlankEntry { category, index }),
                    None => Ok(()),
                }
            }
        }
    }

    /// Whether [`validate`](Self::validate) accepts the payload
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Short human-readable summary for listings
    #[must_use]
    pub fn summary(&self) -> String {
        fn count(n: usize, what: &str) -> String {
            if n == 1 {
                format!("1 {what}")
            } else {
                format!("{n} {what}s")
            }
        }

        match self {
            Self::Cpe { cpe } => cpe.clone(),
            Self::Purl { purl } => purl.clone(),
            Self::Hashes { file_hashes } => count(file_hashes.len(), "hashed file"),
            Self::Models { models } => models.join(", "),
            Self::Sbom { sbom_urls } => sbom_urls.join(", "),
            Self::SerialNumbers { serial_numbers } => serial_numbers.join(", "),
            Self::Skus { skus } => skus.join(", "),
            Self::Uri { uris } => count(uris.len(), "uri"),
        }
    }
}

fn string_list(data: &str) -> Result<Vec<String>, HelperError> {
    if data.starts_with('[') {
        return Ok(serde_json::from_str(data)?);
    }
    Ok(data
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

fn non_blank(category: HelperCategory, entries: &[String]) -> Result<(), HelperError> {
    if entries.is_empty() {
        return Err(HelperError::Empty(category));
    }
    match entries.iter().position(|e| e.trim().is_empty()) {
        Some(index) => Err(HelperError::BlankEntry { category, index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(category: HelperCategory) -> HelperMetadata {
        match category {
            HelperCategory::Cpe => HelperMetadata::Cpe {
                cpe: "cpe:2.3:a:acme:anvil:1.0:*:*:*:*:*:*:*".into(),
            },
            HelperCategory::Hashes => HelperMetadata::Hashes {
                file_hashes: vec![FileHash {
                    filename: "anvil.tar.gz".into(),
                    items: vec![HashItem {
                        algorithm: "sha256".into(),
                        value: "e3b0c442".into(),
                    }],
                }],
            },
            HelperCategory::Models => HelperMetadata::Models { models: vec!["AN-100".into()] },
            HelperCategory::Purl => HelperMetadata::Purl {
                purl: "pkg:cargo/anvil@1.0.0".into(),
            },
            HelperCategory::Sbom => HelperMetadata::Sbom {
                sbom_urls: vec!["https://acme.example/sbom.json".into()],
            },
            HelperCategory::SerialNumbers => HelperMetadata::SerialNumbers {
                serial_numbers: vec!["SN-0001".into()],
            },
            HelperCategory::Skus => HelperMetadata::Skus { skus: vec!["SKU-9".into()] },
            HelperCategory::Uri => HelperMetadata::Uri {
                uris: vec![GenericUri {
                    namespace: "https://acme.example/ns".into(),
                    uri: "https://acme.example/anvil".into(),
                }],
            },
        }
    }

    #[test]
    fn test_empty_forms_are_incomplete() {
        for category in HelperCategory::ALL {
            let form = HelperMetadata::empty(category);
            assert_eq!(form.category(), category);
            assert!(!form.is_complete(), "{category} empty form should not validate");
        }
    }

    #[test]
    fn test_filled_forms_are_complete() {
        for category in HelperCategory::ALL {
            let form = filled(category);
            assert!(form.validate().is_ok(), "{category}: {:?}", form.validate());
        }
    }

    #[test]
    fn test_category_parse_aliases() {
        assert_eq!(HelperCategory::parse("model_numbers").unwrap(), HelperCategory::Models);
        assert_eq!(HelperCategory::parse("x-generic-uris").unwrap(), HelperCategory::Uri);
        assert_eq!(HelperCategory::parse("SBOM_URLS").unwrap(), HelperCategory::Sbom);
        assert!(matches!(
            HelperCategory::parse("barcode"),
            Err(HelperError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_cpe_and_purl_prefixes() {
        let bad_cpe = HelperMetadata::Cpe { cpe: "acme:anvil".into() };
        assert!(matches!(bad_cpe.validate(), Err(HelperError::Malformed { .. })));
        assert!(HelperMetadata::Cpe { cpe: "cpe:/a:acme:anvil".into() }.is_complete());

        assert!(!HelperMetadata::Purl { purl: "pkg:cargo".into() }.is_complete());
        assert!(!HelperMetadata::Purl { purl: "pkg:/anvil".into() }.is_complete());
    }

    #[test]
    fn test_blank_entry_reports_index() {
        let skus = HelperMetadata::Skus {
            skus: vec!["A".into(), "  ".into()],
        };
        assert!(matches!(
            skus.validate(),
            Err(HelperError::BlankEntry { index: 1, .. })
        ));

        let hashes = HelperMetadata::Hashes {
            file_hashes: vec![FileHash {
                filename: "x.bin".into(),
                items: vec![],
            }],
        };
        assert!(matches!(
            hashes.validate(),
            Err(HelperError::BlankEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_sbom_requires_http_urls() {
        let sbom = HelperMetadata::Sbom {
            sbom_urls: vec!["ftp://acme.example/sbom".into()],
        };
        assert!(matches!(sbom.validate(), Err(HelperError::Malformed { .. })));
    }

    #[test]
    fn test_from_cli() {
        let models = HelperMetadata::from_cli(HelperCategory::Models, "AN-1, AN-2").unwrap();
        assert_eq!(
            models,
            HelperMetadata::Models {
                models: vec!["AN-1".into(), "AN-2".into()]
            }
        );

        let skus = HelperMetadata::from_cli(HelperCategory::Skus, r#"["S1","S2"]"#).unwrap();
        assert_eq!(skus.summary(), "S1, S2");

        let uris = HelperMetadata::from_cli(
            HelperCategory::Uri,
            r#"[{"namespace":"https://ns.example","uri":"https://ns.example/x"}]"#,
        )
        .unwrap();
        assert!(uris.is_complete());

        assert!(matches!(
            HelperMetadata::from_cli(HelperCategory::Hashes, "not json"),
            Err(HelperError::Json(_))
        ));
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(filled(HelperCategory::SerialNumbers)).unwrap();
        assert_eq!(json["category"], "serial_numbers");
        assert_eq!(json["serial_numbers"][0], "SN-0001");

        let back: HelperMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back.category(), HelperCategory::SerialNumbers);
    }
}
