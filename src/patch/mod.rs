//! File patching for accepted updates
//!
//! This module provides:
//! - Independent patch rules for the contexts a version is recognized in
//!   (table rows, `name@version` references, `name/version` path segments)
//! - FilePatcher for rewriting skill documents and version records
//! - The optional "Version Update Notes" section appended to documents

mod notes;
mod patcher;
mod rules;

pub use notes::{render_notes, replace_notes, NOTES_MARKER};
pub use patcher::{DocumentPatch, FilePatcher};
pub use rules::{
    default_rules, PatchRule, PathSegmentRule, PinnedReferenceRule, RuleOutcome, TableRowRule,
};
