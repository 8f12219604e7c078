//! Discovery of skill records under a skills root
//!
//! A record is any direct subdirectory of the root that contains a
//! `versions.json`. Its skill document is the `SKILL.md` beside it.

use crate::error::RecordError;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of a tracked-version record
pub const VERSIONS_FILENAME: &str = "versions.json";

/// File name of the skill document patched alongside the record
pub const DOCUMENT_FILENAME: &str = "SKILL.md";

/// Location of one discovered record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocation {
    /// Skill name (directory name)
    pub name: String,
    /// Skill directory
    pub dir: PathBuf,
    /// Path to versions.json
    pub versions_file: PathBuf,
    /// Path to SKILL.md (may not exist)
    pub document: PathBuf,
}

impl RecordLocation {
    /// Creates the location for a skill directory
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            versions_file: dir.join(VERSIONS_FILENAME),
            document: dir.join(DOCUMENT_FILENAME),
            dir,
        }
    }
}

/// Detect all records under the skills root, sorted by skill name
///
/// A missing or unreadable root yields no records.
pub fn discover_records(root: &Path) -> Vec<RecordLocation> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(root = %root.display(), error = %e, "skills root not readable");
            return Vec::new();
        }
    };

    let mut records: Vec<RecordLocation> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path.join(VERSIONS_FILENAME).is_file())
        .map(RecordLocation::from_dir)
        .collect();

    records.sort_by(|a, b| a.name.cmp(&b.name));

    for record in &records {
        tracing::debug!(skill = %record.name, path = %record.versions_file.display(), "found versioned skill");
    }

    records
}

/// Locate a single record by skill name
pub fn find_record(root: &Path, name: &str) -> Result<RecordLocation, RecordError> {
    discover_records(root)
        .into_iter()
        .find(|r| r.name == name)
        .ok_or_else(|| RecordError::not_found(name))
}
