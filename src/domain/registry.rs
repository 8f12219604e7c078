//! Registry kinds for tracked packages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version-of-record services a tracked unit can be checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Registry {
    /// npm registry (JavaScript packages)
    Npm,
    /// Python Package Index
    Pypi,
    /// python.org release index, used for the `Python` runtime itself
    PythonRuntime,
}

impl Registry {
    /// Returns the display name for this registry
    pub fn display_name(&self) -> &'static str {
        match self {
            Registry::Npm => "npm",
            Registry::Pypi => "PyPI",
            Registry::PythonRuntime => "python.org",
        }
    }

    /// Whether a versions.json may declare this registry at its top level
    pub fn is_record_registry(&self) -> bool {
        matches!(self, Registry::Npm | Registry::Pypi)
    }

    /// Returns all registries
    pub fn all() -> &'static [Registry] {
        &[Registry::Npm, Registry::Pypi, Registry::PythonRuntime]
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
