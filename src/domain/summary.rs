//! Per-record check results and patch summaries

use super::{AcceptedUpdate, Registry, UpdateCandidate};
use std::path::PathBuf;

/// Check results for one skill record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCheck {
    /// Skill name (the record's directory name)
    pub record: String,
    /// Registry declared by the record
    pub registry: Registry,
    /// One candidate per tracked unit, in record order
    pub candidates: Vec<UpdateCandidate>,
}

impl RecordCheck {
    /// Creates a new RecordCheck
    pub fn new(record: impl Into<String>, registry: Registry) -> Self {
        Self {
            record: record.into(),
            registry,
            candidates: Vec::new(),
        }
    }

    /// Returns candidates with an available update
    pub fn updates(&self) -> impl Iterator<Item = &UpdateCandidate> {
        self.candidates.iter().filter(|c| c.is_update())
    }

    /// Returns candidates whose fetch failed
    pub fn errors(&self) -> impl Iterator<Item = &UpdateCandidate> {
        self.candidates.iter().filter(|c| c.is_error())
    }

    /// Returns the number of available updates
    pub fn update_count(&self) -> usize {
        self.updates().count()
    }

    /// Returns the number of failed fetches
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Returns true if any update is available
    pub fn has_updates(&self) -> bool {
        self.update_count() > 0
    }
}

/// What was written for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSummary {
    /// Skill name
    pub record: String,
    /// Updates applied to the record
    pub applied: Vec<AcceptedUpdate>,
    /// Files rewritten, in write order
    pub files_modified: Vec<PathBuf>,
    /// Number of version references rewritten in the skill document
    pub document_replacements: usize,
}

impl PatchSummary {
    /// Creates a new PatchSummary
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            applied: Vec::new(),
            files_modified: Vec::new(),
            document_replacements: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrackedUnit;
    use crate::error::FetchFailure;

    fn candidate(name: &str, tracked: &str, latest: Option<&str>) -> UpdateCandidate {
        let unit = TrackedUnit::new(name, tracked, Registry::Npm);
        match latest {
            Some(v) => UpdateCandidate::classify(unit, Ok(v.to_string())),
            None => UpdateCandidate::fetch_error(unit, FetchFailure::timeout(name, "npm")),
        }
    }

    #[test]
    fn test_record_check_counts() {
        let mut check = RecordCheck::new("react-19", Registry::Npm);
        check.candidates.push(candidate("react", "18.2.0", Some("18.3.0")));
        check.candidates.push(candidate("vite", "5.0.0", Some("5.0.0")));
        check.candidates.push(candidate("zod", "3.22.0", None));

        assert_eq!(check.update_count(), 1);
        assert_eq!(check.error_count(), 1);
        assert!(check.has_updates());
        assert_eq!(check.updates().next().unwrap().unit.name, "react");
    }

    #[test]
    fn test_record_check_empty() {
        let check = RecordCheck::new("empty", Registry::Pypi);
        assert!(!check.has_updates());
        assert_eq!(check.error_count(), 0);
    }

    #[test]
    fn test_patch_summary_new() {
        let summary = PatchSummary::new("django");
        assert_eq!(summary.record, "django");
        assert!(summary.applied.is_empty());
        assert!(summary.files_modified.is_empty());
    }
}
