//! Tracked unit: one versioned dependency under watch

use super::Registry;
use serde::{Deserialize, Serialize};

/// Package name that is always resolved against the python.org release index
pub const PYTHON_RUNTIME_NAME: &str = "Python";

/// A single dependency whose version is tracked by a skill record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedUnit {
    /// Name of the package, unique within its record
    pub name: String,
    /// Last known version string
    pub tracked_version: String,
    /// Registry used to look up the latest version
    pub registry: Registry,
    /// Name to query the registry with, when it differs from `name`
    pub registry_alias: Option<String>,
    /// Documentation URL (passed through unmodified)
    pub docs_url: String,
    /// Free-text role description (passed through unmodified)
    pub role: String,
}

impl TrackedUnit {
    /// Creates a new TrackedUnit
    ///
    /// A unit named `Python` is always checked against the python.org release
    /// index, whatever registry its record declares.
    pub fn new(
        name: impl Into<String>,
        tracked_version: impl Into<String>,
        registry: Registry,
    ) -> Self {
        let name = name.into();
        let registry = if name == PYTHON_RUNTIME_NAME {
            Registry::PythonRuntime
        } else {
            registry
        };
        Self {
            name,
            tracked_version: tracked_version.into(),
            registry,
            registry_alias: None,
            docs_url: String::new(),
            role: String::new(),
        }
    }

    /// Sets the registry alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.registry_alias = Some(alias.into());
        self
    }

    /// Sets the documentation URL
    pub fn with_docs_url(mut self, docs_url: impl Into<String>) -> Self {
        self.docs_url = docs_url.into();
        self
    }

    /// Sets the role description
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Returns the name to send to the registry
    pub fn query_name(&self) -> &str {
        self.registry_alias.as_deref().unwrap_or(&self.name)
    }
}
