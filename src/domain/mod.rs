//! Core domain models for skillscout
//!
//! This module contains the fundamental types used throughout the application:
//! - Registry kinds that can be queried for a latest version
//! - Tracked units loaded from a skill's versions.json
//! - Update candidates produced by comparing tracked and latest versions
//! - Version ordering rules
//! - Per-record and per-session summaries

mod candidate;
mod registry;
mod summary;
mod unit;
mod version;

pub use candidate::{AcceptedUpdate, CandidateStatus, UpdateCandidate};
pub use registry::Registry;
pub use summary::{PatchSummary, RecordCheck};
pub use unit::{TrackedUnit, PYTHON_RUNTIME_NAME};
pub use version::{compare_versions, is_newer, parse_version, VersionPart};
