//! PyPI JSON API adapter
//!
//! Fetches the current release of a project from PyPI.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::domain::Registry;
use crate::error::FetchFailure;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;

/// PyPI API base URL
const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

/// PyPI project metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    /// Project information for the current release
    info: PyPIInfo,
}

#[derive(Debug, Deserialize)]
struct PyPIInfo {
    version: Option<String>,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_API_URL)
    }

    /// Create an adapter against a different index host
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url, package)
    }
}

#[async_trait]
impl RegistryAdapter for PyPIAdapter {
    fn registry(&self) -> Registry {
        Registry::Pypi
    }

    async fn fetch_latest(&self, package: &str) -> Result<String, FetchFailure> {
        let url = self.build_url(package);
        let response: PyPIResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        response
            .info
            .version
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| FetchFailure::no_version(package, self.registry_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pypi_adapter_registry() {
        let adapter = PyPIAdapter::new(HttpClient::new().unwrap());
        assert_eq!(adapter.registry(), Registry::Pypi);
        assert_eq!(adapter.registry_name(), "PyPI");
    }

    #[test]
    fn test_build_url() {
        let adapter = PyPIAdapter::new(HttpClient::new().unwrap());
        assert_eq!(
            adapter.build_url("djangorestframework"),
            "https://pypi.org/pypi/djangorestframework/json"
        );
    }

    #[tokio::test]
    async fn test_fetch_latest() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/Django/json")
            .with_status(200)
            .with_body(r#"{"info": {"name": "Django", "version": "5.2.1"}, "releases": {}}"#)
            .create_async()
            .await;

        let adapter = PyPIAdapter::with_base_url(HttpClient::new().unwrap(), server.url());
        assert_eq!(adapter.fetch_latest("Django").await.unwrap(), "5.2.1");
    }

    #[tokio::test]
    async fn test_fetch_latest_shape_mismatch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/Django/json")
            .with_status(200)
            .with_body(r#"{"version": "5.2.1"}"#)
            .create_async()
            .await;

        let adapter = PyPIAdapter::with_base_url(HttpClient::new().unwrap(), server.url());
        let err = adapter.fetch_latest("Django").await.unwrap_err();
        assert!(matches!(err, FetchFailure::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_latest_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/nope/json")
            .with_status(404)
            .create_async()
            .await;

        let adapter = PyPIAdapter::with_base_url(HttpClient::new().unwrap(), server.url());
        let err = adapter.fetch_latest("nope").await.unwrap_err();
        assert_eq!(err, FetchFailure::not_found("nope", "PyPI"));
    }
}
