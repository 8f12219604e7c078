//! Loading and persisting versions.json

use super::{RecordLocation, VersionRecord};
use crate::error::RecordError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write a file atomically: full content to a sibling temp file, then rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read and validate a record's versions.json
pub fn load_record(location: &RecordLocation) -> Result<VersionRecord, RecordError> {
    let path = &location.versions_file;
    let content = fs::read_to_string(path).map_err(|e| RecordError::read_error(path, e))?;
    VersionRecord::from_json(path, &content)
}

/// Rewrite versions.json as a whole
pub fn save_record(path: &Path, record: &VersionRecord) -> Result<(), RecordError> {
    let json = record
        .to_json()
        .map_err(|e| RecordError::parse_error(path, e.to_string()))?;
    atomic_write(path, json.as_bytes()).map_err(|e| RecordError::write_error(path, e))?;
    tracing::info!(path = %path.display(), "rewrote version record");
    Ok(())
}
