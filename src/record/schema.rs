//! versions.json schema
//!
//! ```json
//! {
//!   "registry": "npm",
//!   "last_updated": "2025-01-31",
//!   "packages": {
//!     "react": { "version": "18.2.0", "npm": "react", "docs_url": "...", "role": "..." }
//!   }
//! }
//! ```
//!
//! `registry` and `packages` are required. Unknown fields at either level are
//! kept and written back. Every key keeps its position in the file: the
//! typed fields are merged into the document as it was read, and only keys
//! the file did not have are appended.

use crate::domain::{AcceptedUpdate, Registry, TrackedUnit};
use crate::error::RecordError;
use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Date format used for `last_updated`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tracked-version record of one skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Registry for every package in this record (except `Python`)
    pub registry: Registry,
    /// Date of the last rewrite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Tracked packages in file order
    pub packages: Packages,
    /// Other top-level fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Document as read, in file order
    #[serde(skip)]
    source: Map<String, Value>,
}

/// One package entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageEntry {
    /// Tracked version
    pub version: String,
    /// npm package name, when it differs from the key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm: Option<String>,
    /// PyPI project name, when it differs from the key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pypi: Option<String>,
    /// Documentation URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
    /// Role of the package within the skill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Other fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageEntry {
    /// Creates an entry with only a version
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            npm: None,
            pypi: None,
            docs_url: None,
            role: None,
            extra: Map::new(),
        }
    }

    /// Returns the alias stored for the given registry
    pub fn alias_for(&self, registry: Registry) -> Option<&str> {
        match registry {
            Registry::Npm => self.npm.as_deref(),
            Registry::Pypi => self.pypi.as_deref(),
            Registry::PythonRuntime => None,
        }
    }
}

/// Ordered map of package name to entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Packages(Vec<(String, PackageEntry)>);

impl Packages {
    /// Creates an empty package map
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, entry: PackageEntry) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = entry,
            None => self.0.push((name, entry)),
        }
    }

    /// Looks up an entry by name
    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    /// Looks up an entry by name for mutation
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PackageEntry> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    /// Iterates entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageEntry)> {
        self.0.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Packages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Packages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PackagesVisitor;

        impl<'de> Visitor<'de> for PackagesVisitor {
            type Value = Packages;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of package names to package entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Packages, A::Error> {
                let mut packages = Packages::new();
                while let Some((name, entry)) = access.next_entry::<String, PackageEntry>()? {
                    packages.insert(name, entry);
                }
                Ok(packages)
            }
        }

        deserializer.deserialize_map(PackagesVisitor)
    }
}

impl VersionRecord {
    /// Creates an empty record for a registry
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            last_updated: None,
            packages: Packages::new(),
            extra: Map::new(),
            source: Map::new(),
        }
    }

    /// Parses and validates versions.json content
    pub fn from_json(path: &Path, content: &str) -> Result<Self, RecordError> {
        let source: Map<String, Value> = serde_json::from_str(content)
            .map_err(|e| RecordError::parse_error(path, e.to_string()))?;
        let mut record: VersionRecord = serde_json::from_value(Value::Object(source.clone()))
            .map_err(|e| RecordError::parse_error(path, e.to_string()))?;
        record.source = source;

        if !record.registry.is_record_registry() {
            return Err(RecordError::parse_error(
                path,
                format!(
                    "registry must be \"npm\" or \"pypi\", found {}",
                    record.registry
                ),
            ));
        }

        Ok(record)
    }

    /// Serializes as 2-space-indented JSON with a trailing newline
    ///
    /// Keys keep the order they had in the file that was read.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut document = self.source.clone();
        if let Value::Object(fields) = serde_json::to_value(self)? {
            merge_in_place(&mut document, fields);
        }
        let mut out = serde_json::to_string_pretty(&document)?;
        out.push('\n');
        Ok(out)
    }

    /// Builds the tracked units of this record, in file order
    pub fn units(&self) -> Vec<TrackedUnit> {
        self.packages
            .iter()
            .map(|(name, entry)| {
                let mut unit = TrackedUnit::new(name, &entry.version, self.registry);
                if let Some(alias) = entry.alias_for(unit.registry) {
                    unit = unit.with_alias(alias);
                }
                if let Some(docs_url) = &entry.docs_url {
                    unit = unit.with_docs_url(docs_url);
                }
                if let Some(role) = &entry.role {
                    unit = unit.with_role(role);
                }
                unit
            })
            .collect()
    }

    /// Sets every accepted package to its new version and stamps the date
    ///
    /// Returns the number of package entries changed.
    pub fn apply_updates(&mut self, updates: &[AcceptedUpdate], today: NaiveDate) -> usize {
        let mut changed = 0;
        for update in updates {
            if let Some(entry) = self.packages.get_mut(&update.name) {
                entry.version = update.new_version.clone();
                changed += 1;
            }
        }
        self.last_updated = Some(today.format(DATE_FORMAT).to_string());
        changed
    }
}

/// Make `target` equal to `fields` while keeping the position of existing keys
///
/// Keys missing from `fields` are dropped, new keys are appended, and nested
/// objects are merged the same way.
fn merge_in_place(target: &mut Map<String, Value>, fields: Map<String, Value>) {
    target.retain(|key, _| fields.contains_key(key));
    for (key, value) in fields {
        if let Value::Object(nested) = value {
            if let Some(Value::Object(existing)) = target.get_mut(&key) {
                merge_in_place(existing, nested);
                continue;
            }
            target.insert(key, Value::Object(nested));
        } else {
            target.insert(key, value);
        }
    }
}
