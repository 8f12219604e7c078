//! Applying accepted updates to a record's files

use super::notes::{render_notes, replace_notes};
use super::rules::{default_rules, PatchRule, RuleOutcome};
use crate::domain::{AcceptedUpdate, PatchSummary};
use crate::error::{AppError, PatchError};
use crate::record::{atomic_write, save_record, RecordLocation, VersionRecord};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of patching one skill document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPatch {
    /// Path to the document
    pub path: PathBuf,
    /// Number of version references rewritten
    pub replacements: usize,
    /// Whether the file content changed and was written
    pub modified: bool,
}

/// Patcher that applies accepted updates to versions.json and SKILL.md
pub struct FilePatcher {
    rules: Vec<Box<dyn PatchRule>>,
    /// Date stamped into `last_updated` and the notes section
    today: NaiveDate,
    /// Whether to maintain the "Version Update Notes" section
    notes: bool,
}

impl FilePatcher {
    /// Create a patcher with the default rules
    pub fn new(today: NaiveDate) -> Self {
        Self::with_rules(default_rules(), today)
    }

    /// Create a patcher with a custom rule set
    pub fn with_rules(rules: Vec<Box<dyn PatchRule>>, today: NaiveDate) -> Self {
        Self {
            rules,
            today,
            notes: false,
        }
    }

    /// Enable or disable the notes section
    pub fn with_notes(mut self, notes: bool) -> Self {
        self.notes = notes;
        self
    }

    /// Date used for stamps
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Apply every rule for every update, in order
    pub fn patch_text(&self, content: &str, updates: &[AcceptedUpdate]) -> RuleOutcome {
        let mut current = content.to_string();
        let mut replacements = 0;

        for update in updates {
            for rule in &self.rules {
                let outcome = rule.apply(&current, update);
                if outcome.replacements > 0 {
                    tracing::debug!(
                        rule = rule.name(),
                        package = %update.name,
                        count = outcome.replacements,
                        "patched references"
                    );
                }
                replacements += outcome.replacements;
                current = outcome.content;
            }
        }

        RuleOutcome {
            content: current,
            replacements,
        }
    }

    /// Patch a skill document in place; the file is only written when its content changes
    pub fn patch_document(
        &self,
        path: &Path,
        updates: &[AcceptedUpdate],
    ) -> Result<DocumentPatch, PatchError> {
        let original = fs::read_to_string(path).map_err(|e| PatchError::read_error(path, e))?;

        let outcome = self.patch_text(&original, updates);
        let content = if self.notes && !updates.is_empty() {
            replace_notes(&outcome.content, &render_notes(updates, self.today))
        } else {
            outcome.content
        };

        let modified = content != original;
        if modified {
            atomic_write(path, content.as_bytes()).map_err(|e| PatchError::write_error(path, e))?;
            tracing::info!(
                path = %path.display(),
                replacements = outcome.replacements,
                "patched skill document"
            );
        }

        Ok(DocumentPatch {
            path: path.to_path_buf(),
            replacements: outcome.replacements,
            modified,
        })
    }

    /// Apply accepted updates to one record: versions.json first, then SKILL.md if present
    ///
    /// `record` is only mutated once versions.json has been written. A failure
    /// patching the document leaves the record write in place and is returned
    /// alongside the summary.
    pub fn apply(
        &self,
        location: &RecordLocation,
        record: &mut VersionRecord,
        updates: &[AcceptedUpdate],
    ) -> (PatchSummary, Vec<AppError>) {
        let mut summary = PatchSummary::new(&location.name);
        let mut errors = Vec::new();

        if updates.is_empty() {
            return (summary, errors);
        }

        let mut updated = record.clone();
        updated.apply_updates(updates, self.today);
        if let Err(e) = save_record(&location.versions_file, &updated) {
            errors.push(e.into());
            return (summary, errors);
        }
        *record = updated;
        summary.applied = updates.to_vec();
        summary.files_modified.push(location.versions_file.clone());

        if !location.document.is_file() {
            tracing::debug!(skill = %location.name, "no skill document to patch");
            return (summary, errors);
        }

        match self.patch_document(&location.document, updates) {
            Ok(patch) => {
                summary.document_replacements = patch.replacements;
                if patch.modified {
                    summary.files_modified.push(patch.path);
                }
            }
            Err(e) => errors.push(e.into()),
        }

        (summary, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Registry;
    use crate::record::{load_record, PackageEntry};
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn react() -> AcceptedUpdate {
        AcceptedUpdate::new("react", "18.2.0", "18.3.0").with_docs_url("https://react.dev")
    }

    const DOC: &str = "# React skill\n\
        \n\
        | Package | Version |\n\
        |---------|---------|\n\
        | react | 18.2.0 |\n\
        | preact | 18.2.0 |\n\
        \n\
        <script src=\"https://unpkg.com/react@18.2.0/umd/react.js\"></script>\n\
        <script src=\"https://unpkg.com/@types/react@18.2.0\"></script>\n\
        Path: cdn/react/18.2.0/index.js\n";

    fn setup_skill(dir: &TempDir, document: Option<&str>) -> (RecordLocation, VersionRecord) {
        let skill_dir = dir.path().join("react-skill");
        fs::create_dir_all(&skill_dir).unwrap();
        let location = RecordLocation::from_dir(&skill_dir);

        let mut record = VersionRecord::new(Registry::Npm);
        record.packages.insert("react", PackageEntry::new("18.2.0"));
        save_record(&location.versions_file, &record).unwrap();

        if let Some(doc) = document {
            fs::write(&location.document, doc).unwrap();
        }
        (location, record)
    }

    #[test]
    fn test_patch_text_all_contexts() {
        let patcher = FilePatcher::new(today());
        let out = patcher.patch_text(DOC, &[react()]);

        assert_eq!(out.replacements, 3);
        assert!(out.content.contains("| react | 18.3.0 |"));
        assert!(out.content.contains("| preact | 18.2.0 |"));
        assert!(out.content.contains("unpkg.com/react@18.3.0/umd"));
        assert!(out.content.contains("@types/react@18.2.0"));
        assert!(out.content.contains("cdn/react/18.3.0/index.js"));
    }

    #[test]
    fn test_patch_text_idempotent() {
        let patcher = FilePatcher::new(today());
        let once = patcher.patch_text(DOC, &[react()]);
        let twice = patcher.patch_text(&once.content, &[react()]);

        assert_eq!(once.content, twice.content);
        assert_eq!(twice.replacements, 0);
    }

    #[test]
    fn test_patch_text_isolates_packages_sharing_a_version() {
        let doc = "| react | 1.0.0 |\n| preact | 1.0.0 |\n| @types/react | 1.0.0 |\n\
                   react@1.0.0 preact@1.0.0 @types/react@1.0.0\n";
        let patcher = FilePatcher::new(today());
        let out = patcher.patch_text(doc, &[AcceptedUpdate::new("react", "1.0.0", "2.0.0")]);

        assert_eq!(
            out.content,
            "| react | 2.0.0 |\n| preact | 1.0.0 |\n| @types/react | 1.0.0 |\n\
             react@2.0.0 preact@1.0.0 @types/react@1.0.0\n"
        );
    }

    #[test]
    fn test_patch_text_multiple_updates() {
        let doc = "| react | 18.2.0 |\n| vite | 5.0.0 |\nvite@5.0.0\n";
        let patcher = FilePatcher::new(today());
        let out = patcher.patch_text(
            doc,
            &[react(), AcceptedUpdate::new("vite", "5.0.0", "5.1.0")],
        );
        assert_eq!(out.content, "| react | 18.3.0 |\n| vite | 5.1.0 |\nvite@5.1.0\n");
        assert_eq!(out.replacements, 3);
    }

    #[test]
    fn test_patch_document_unchanged_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SKILL.md");
        fs::write(&path, "# Nothing here\n").unwrap();

        let patch = FilePatcher::new(today()).patch_document(&path, &[react()]).unwrap();
        assert!(!patch.modified);
        assert_eq!(patch.replacements, 0);
    }

    #[test]
    fn test_patch_document_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = FilePatcher::new(today()).patch_document(&dir.path().join("SKILL.md"), &[react()]);
        assert!(matches!(result, Err(PatchError::ReadError { .. })));
    }

    #[test]
    fn test_patch_document_with_notes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SKILL.md");
        fs::write(&path, "# Skill\n\nNo pinned versions.\n").unwrap();

        let patcher = FilePatcher::new(today()).with_notes(true);
        let patch = patcher.patch_document(&path, &[react()]).unwrap();
        assert!(patch.modified);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("*Last checked: 2026-03-14*"));
        assert!(content.contains("### react 18.2.0 -> 18.3.0"));
        assert!(content.contains("See: https://react.dev"));

        let again = patcher.patch_document(&path, &[react()]).unwrap();
        assert!(!again.modified);
    }

    #[test]
    fn test_apply_writes_record_and_document() {
        let dir = TempDir::new().unwrap();
        let (location, mut record) = setup_skill(&dir, Some(DOC));

        let patcher = FilePatcher::new(today());
        let (summary, errors) = patcher.apply(&location, &mut record, &[react()]);

        assert!(errors.is_empty());
        assert_eq!(summary.record, "react-skill");
        assert_eq!(summary.applied, vec![react()]);
        assert_eq!(summary.document_replacements, 3);
        assert_eq!(
            summary.files_modified,
            vec![location.versions_file.clone(), location.document.clone()]
        );

        assert_eq!(record.packages.get("react").unwrap().version, "18.3.0");
        assert_eq!(record.last_updated.as_deref(), Some("2026-03-14"));

        let reloaded = load_record(&location).unwrap();
        assert_eq!(reloaded.packages.get("react").unwrap().version, "18.3.0");
    }

    #[test]
    fn test_apply_without_document() {
        let dir = TempDir::new().unwrap();
        let (location, mut record) = setup_skill(&dir, None);

        let (summary, errors) = FilePatcher::new(today()).apply(&location, &mut record, &[react()]);
        assert!(errors.is_empty());
        assert_eq!(summary.files_modified, vec![location.versions_file.clone()]);
        assert!(!location.document.exists());
    }

    #[test]
    fn test_apply_empty_updates_is_noop() {
        let dir = TempDir::new().unwrap();
        let (location, mut record) = setup_skill(&dir, Some(DOC));
        let before = fs::read_to_string(&location.versions_file).unwrap();

        let (summary, errors) = FilePatcher::new(today()).apply(&location, &mut record, &[]);
        assert!(errors.is_empty());
        assert!(summary.files_modified.is_empty());
        assert_eq!(fs::read_to_string(&location.versions_file).unwrap(), before);
    }

    #[test]
    fn test_apply_record_write_failure_leaves_record_untouched() {
        let dir = TempDir::new().unwrap();
        let mut record = VersionRecord::new(Registry::Npm);
        record.packages.insert("react", PackageEntry::new("18.2.0"));
        let location = RecordLocation::from_dir(dir.path().join("missing-skill"));

        let (summary, errors) = FilePatcher::new(today()).apply(&location, &mut record, &[react()]);
        assert_eq!(errors.len(), 1);
        assert!(summary.files_modified.is_empty());
        assert_eq!(record.packages.get("react").unwrap().version, "18.2.0");
    }
}
