// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Client for the remote catalog API

use crate::types::CatalogStore;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Errors talking to the catalog API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or decoding failure
    #[error("request to {url} failed")]
    Http {
        /// Requested URL
        url: String,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },
}

/// Blocking client for the `/api/v1` catalog endpoints
pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("proddb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Http {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self::with_client(base_url, http))
    }

    /// Create a client around a preconfigured reqwest client
    #[must_use]
    pub fn with_client(base_url: &str, http: reqwest::blocking::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Absolute URL of an API resource
    #[must_use]
    pub fn url(&self, resource: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, resource.trim_start_matches('/'))
    }

    fn get_list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, ApiError> {
        let url = self.url(resource);
        tracing::debug!(%url, "GET");

        let response = self.http.get(&url).send().map_err(|source| ApiError::Http {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.json().map_err(|source| ApiError::Http { url, source })
    }

    /// Fetch the whole catalog
    pub fn fetch_store(&self) -> Result<CatalogStore, ApiError> {
        let store = CatalogStore {
            vendors: self.get_list("vendors")?,
            products: self.get_list("products")?,
            versions: self.get_list("product-versions")?,
            relationships: self.get_list("relationships")?,
            helpers: self.get_list("identification-helpers")?,
        };
        tracing::info!(
            vendors = store.vendors.len(),
            products = store.products.len(),
            versions = store.versions.len(),
            "fetched catalog from {}",
            self.base_url
        );
        Ok(store)
    }
}
