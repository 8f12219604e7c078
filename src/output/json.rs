//! JSON output formatter for machine processing
//!
//! The whole report is written once, at the end of the session, so stdout
//! carries exactly one JSON document.

use crate::domain::{RecordCheck, Registry, UpdateCandidate};
use crate::output::{OutputFormatter, Verbosity};
use crate::session::{Selection, SessionOutcome};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full session
#[derive(Serialize)]
struct JsonOutput {
    /// Selection mode
    mode: String,
    /// Record filter
    #[serde(skip_serializing_if = "Option::is_none")]
    skill: Option<String>,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-record check results
    records: Vec<JsonRecord>,
    /// Interactive decision
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<JsonSelection>,
    /// Per-record patch results
    patched: Vec<JsonPatched>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Candidates with an update available
    available: usize,
    /// Candidates whose registry query failed
    fetch_errors: usize,
    /// Updates accepted
    selected: usize,
    /// Updates written
    applied: usize,
}

/// JSON representation of a record's check
#[derive(Serialize)]
struct JsonRecord {
    /// Skill name
    name: String,
    /// Registry of the record
    registry: Registry,
    /// Checked packages (only updates and errors unless verbose)
    packages: Vec<JsonPackage>,
}

/// JSON representation of one candidate
#[derive(Serialize)]
struct JsonPackage {
    name: String,
    tracked: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<String>,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// JSON representation of the interactive decision
#[derive(Serialize)]
struct JsonSelection {
    /// all, none, indices or invalid
    choice: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    indices: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// JSON representation of one record's patch
#[derive(Serialize)]
struct JsonPatched {
    record: String,
    updates: Vec<JsonUpdate>,
    files_modified: Vec<String>,
    document_replacements: usize,
}

/// JSON representation of an update
#[derive(Serialize)]
struct JsonUpdate {
    /// Package name
    name: String,
    /// Old version
    from: String,
    /// New version
    to: String,
}

impl JsonFormatter {
    fn package_to_json(candidate: &UpdateCandidate) -> JsonPackage {
        JsonPackage {
            name: candidate.unit.name.clone(),
            tracked: candidate.unit.tracked_version.clone(),
            latest: candidate.latest_version.clone(),
            status: candidate.status.label().to_lowercase(),
            error: candidate.failure().map(|f| f.to_string()),
        }
    }

    fn record_to_json(&self, check: &RecordCheck) -> JsonRecord {
        let packages = check
            .candidates
            .iter()
            .filter(|c| self.verbosity == Verbosity::Verbose || c.is_update() || c.is_error())
            .map(Self::package_to_json)
            .collect();

        JsonRecord {
            name: check.record.clone(),
            registry: check.registry,
            packages,
        }
    }

    fn selection_to_json(selection: &Selection) -> JsonSelection {
        let (choice, indices, error) = match selection {
            Selection::All => ("all", Vec::new(), None),
            Selection::Nothing => ("none", Vec::new(), None),
            Selection::Indices(indices) => ("indices", indices.clone(), None),
            Selection::Invalid(e) => ("invalid", Vec::new(), Some(e.to_string())),
        };
        JsonSelection {
            choice: choice.to_string(),
            indices,
            error,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_checks(&self, _checks: &[RecordCheck], _writer: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn format_outcome(
        &self,
        outcome: &SessionOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonOutput {
            mode: outcome.mode.to_string(),
            skill: outcome.skill_filter.clone(),
            summary: JsonSummary {
                available: outcome.available_updates(),
                fetch_errors: outcome.fetch_errors(),
                selected: outcome.selected.len(),
                applied: outcome.total_applied(),
            },
            records: outcome
                .checks
                .iter()
                .map(|c| self.record_to_json(c))
                .collect(),
            selection: outcome.selection.as_ref().map(Self::selection_to_json),
            patched: outcome
                .patched
                .iter()
                .map(|p| JsonPatched {
                    record: p.record.clone(),
                    updates: p
                        .applied
                        .iter()
                        .map(|u| JsonUpdate {
                            name: u.name.clone(),
                            from: u.old_version.clone(),
                            to: u.new_version.clone(),
                        })
                        .collect(),
                    files_modified: p
                        .files_modified
                        .iter()
                        .map(|f| f.display().to_string())
                        .collect(),
                    document_replacements: p.document_replacements,
                })
                .collect(),
            errors: outcome.errors.iter().map(|e| e.to_string()).collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
