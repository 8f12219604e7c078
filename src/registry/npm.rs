//! npm Registry adapter
//!
//! Fetches the `latest` dist-tag of a package from the npm registry.
//! API endpoint: https://registry.npmjs.org/{package}/latest

use crate::domain::Registry;
use crate::error::FetchFailure;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;

/// npm registry base URL
const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm Registry adapter
pub struct NpmAdapter {
    client: HttpClient,
    base_url: String,
}

/// npm `latest` manifest response
#[derive(Debug, Deserialize)]
struct NpmLatestResponse {
    /// Published version of the latest dist-tag
    version: Option<String>,
}

impl NpmAdapter {
    /// Create a new npm adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NPM_REGISTRY_URL)
    }

    /// Create an adapter against a different registry host
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/latest", self.base_url, package)
    }
}

#[async_trait]
impl RegistryAdapter for NpmAdapter {
    fn registry(&self) -> Registry {
        Registry::Npm
    }

    async fn fetch_latest(&self, package: &str) -> Result<String, FetchFailure> {
        let url = self.build_url(package);
        let response: NpmLatestResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        response
            .version
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| FetchFailure::no_version(package, self.registry_name()))
    }
}
