//! Skill version records (versions.json)
//!
//! This module provides:
//! - The versions.json schema with pass-through of unknown fields
//! - Discovery of records under a skills root
//! - Loading and atomic whole-file persistence

mod discovery;
mod schema;
mod store;

pub use discovery::{
    discover_records, find_record, RecordLocation, DOCUMENT_FILENAME, VERSIONS_FILENAME,
};
pub use schema::{PackageEntry, Packages, VersionRecord};
pub use store::{atomic_write, load_record, save_record};
