//! Registry adapters for fetching the latest published version
//!
//! This module provides:
//! - HTTP client shared foundation with a bounded timeout and rate-limit retry
//! - npm Registry adapter
//! - PyPI JSON API adapter
//! - python.org release index adapter for the Python runtime

mod client;
mod npm;
mod pypi;
mod python_org;

pub use client::{HttpClient, DEFAULT_TIMEOUT, MAX_TIMEOUT};
pub use npm::NpmAdapter;
pub use pypi::PyPIAdapter;
pub use python_org::{latest_stable_release, PythonReleaseAdapter};

use crate::domain::Registry;
use crate::error::FetchFailure;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the registry this adapter queries
    fn registry(&self) -> Registry;

    /// Get the registry name used in reports and errors
    fn registry_name(&self) -> &'static str {
        self.registry().display_name()
    }

    /// Fetch the latest published version of a package
    async fn fetch_latest(&self, package: &str) -> Result<String, FetchFailure>;
}

/// Create a registry adapter for the given registry
pub fn create_adapter(registry: Registry, client: HttpClient) -> Arc<dyn RegistryAdapter> {
    match registry {
        Registry::Npm => Arc::new(NpmAdapter::new(client)),
        Registry::Pypi => Arc::new(PyPIAdapter::new(client)),
        Registry::PythonRuntime => Arc::new(PythonReleaseAdapter::new(client)),
    }
}
