//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-record check tables with update markers
//! - Session summary: what was selected, patched and written
//! - Error listing with partial-continuation context

use crate::domain::{CandidateStatus, RecordCheck, UpdateCandidate};
use crate::output::{OutputConfig, OutputFormatter, Verbosity};
use crate::session::{SelectionMode, SessionOutcome};
use colored::{ColoredString, Colorize};
use std::io::Write;

const NAME_WIDTH: usize = 35;
const VERSION_WIDTH: usize = 12;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(config: OutputConfig) -> Self {
        Self {
            verbosity: config.verbosity,
            color: config.color,
        }
    }

    /// Apply `style` only when colors are enabled
    fn paint<F>(&self, text: &str, style: F) -> String
    where
        F: Fn(&str) -> ColoredString,
    {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_status(&self, status: &CandidateStatus) -> String {
        match status {
            CandidateStatus::Current => self.paint(status.label(), |s| s.green()),
            CandidateStatus::UpdateAvailable => self.paint(status.label(), |s| s.yellow().bold()),
            CandidateStatus::FetchError(_) => self.paint(status.label(), |s| s.red()),
        }
    }

    /// Format a single candidate row
    fn format_candidate(&self, candidate: &UpdateCandidate, writer: &mut dyn Write) -> std::io::Result<()> {
        let marker = if candidate.is_update() {
            self.paint(">>", |s| s.yellow().bold())
        } else {
            "  ".to_string()
        };
        let latest = format!("{:<width$}", candidate.latest_display(), width = VERSION_WIDTH);
        let latest = if candidate.is_update() {
            self.paint(&latest, |s| s.bright_white().bold())
        } else {
            latest
        };

        writeln!(
            writer,
            "  {} {:<name_width$} {:<version_width$} {} {}",
            marker,
            candidate.unit.name,
            candidate.unit.tracked_version,
            latest,
            self.format_status(&candidate.status),
            name_width = NAME_WIDTH,
            version_width = VERSION_WIDTH,
        )?;

        if self.verbosity == Verbosity::Verbose {
            if let Some(failure) = candidate.failure() {
                writeln!(writer, "     {}", self.paint(&failure.to_string(), |s| s.dimmed()))?;
            }
        }
        Ok(())
    }

    /// Format one record's header and table
    fn format_check(&self, check: &RecordCheck, writer: &mut dyn Write) -> std::io::Result<()> {
        let header = format!(
            "--- {} ({}) ---",
            check.record,
            check.registry.display_name().to_uppercase()
        );
        writeln!(writer)?;
        writeln!(writer, "  {}", self.paint(&header, |s| s.bold()))?;
        writeln!(
            writer,
            "     {:<name_width$} {:<version_width$} {:<version_width$} Status",
            "Package",
            "Tracked",
            "Latest",
            name_width = NAME_WIDTH,
            version_width = VERSION_WIDTH,
        )?;
        writeln!(
            writer,
            "     {} {} {} {}",
            "-".repeat(NAME_WIDTH),
            "-".repeat(VERSION_WIDTH),
            "-".repeat(VERSION_WIDTH),
            "-".repeat(10)
        )?;

        for candidate in &check.candidates {
            self.format_candidate(candidate, writer)?;
        }
        Ok(())
    }

    fn format_errors(&self, outcome: &SessionOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        if outcome.errors.is_empty() {
            return Ok(());
        }

        writeln!(writer)?;
        writeln!(writer, "  {}:", self.paint("Errors", |s| s.red().bold()))?;
        for error in &outcome.errors {
            if self.color {
                writeln!(writer, "    {} {}", "✗".red(), error)?;
            } else {
                writeln!(writer, "    - {}", error)?;
            }
        }
        Ok(())
    }

    /// One-line report for quiet mode
    fn format_quiet(&self, outcome: &SessionOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        let available = outcome.available_updates();
        if outcome.records.is_empty() {
            writeln!(writer, "No versioned skills found")
        } else if available == 0 {
            writeln!(writer, "{}", self.paint("All up to date", |s| s.dimmed()))
        } else if outcome.mode == SelectionMode::CheckOnly {
            writeln!(writer, "{} update(s) available", available)
        } else if outcome.total_applied() > 0 {
            let count = outcome.total_applied().to_string();
            writeln!(writer, "{} updated", self.paint(&count, |s| s.green()))
        } else {
            writeln!(writer, "{}", self.paint("No updates applied", |s| s.dimmed()))
        }
    }

    fn format_applied(&self, outcome: &SessionOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "  {}", self.paint("Update Complete!", |s| s.green().bold()))?;
        writeln!(writer)?;
        writeln!(
            writer,
            "  Updated {} package(s) across {} skill(s):",
            outcome.total_applied(),
            outcome.patched.len()
        )?;
        for summary in &outcome.patched {
            for update in &summary.applied {
                writeln!(
                    writer,
                    "    {}/{}: {} -> {}",
                    summary.record,
                    update.name,
                    self.paint(&update.old_version, |s| s.dimmed()),
                    self.paint(&update.new_version, |s| s.bright_white().bold())
                )?;
            }
        }

        writeln!(writer)?;
        writeln!(writer, "  Files modified:")?;
        for path in outcome.files_modified() {
            writeln!(writer, "    {}", path.display())?;
        }

        writeln!(writer)?;
        writeln!(
            writer,
            "  Re-run the skill installer to push the updated skills to their install location."
        )
    }
}

impl OutputFormatter for TextFormatter {
    fn format_checks(&self, checks: &[RecordCheck], writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet || checks.is_empty() {
            return Ok(());
        }

        let names: Vec<&str> = checks.iter().map(|c| c.record.as_str()).collect();
        writeln!(writer)?;
        writeln!(
            writer,
            "  Found {} versioned skill(s): {}",
            checks.len(),
            names.join(", ")
        )?;

        for check in checks {
            self.format_check(check, writer)?;
        }
        Ok(())
    }

    fn format_outcome(
        &self,
        outcome: &SessionOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_quiet(outcome, writer);
        }

        if outcome.records.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "  No versioned skills found.")?;
            return self.format_errors(outcome, writer);
        }

        self.format_errors(outcome, writer)?;

        let available = outcome.available_updates();
        if available == 0 {
            writeln!(writer)?;
            writeln!(writer, "  All packages across all skills are up to date.")?;
            return Ok(());
        }

        writeln!(writer)?;
        writeln!(writer, "  {} update(s) available.", available)?;
        let failed = outcome.fetch_errors();
        if failed > 0 {
            writeln!(
                writer,
                "  {} package(s) could not be checked.",
                self.paint(&failed.to_string(), |s| s.red())
            )?;
        }

        match outcome.mode {
            SelectionMode::CheckOnly => {
                writeln!(writer, "  (--check mode: no changes made)")?;
                return Ok(());
            }
            SelectionMode::Auto => writeln!(writer, "  (--auto mode: updating all)")?,
            SelectionMode::Interactive => {}
        }

        if let Some(error) = outcome.invalid_selection() {
            writeln!(writer)?;
            writeln!(
                writer,
                "  {} ({}). Skipping.",
                self.paint("Invalid selection", |s| s.red()),
                error
            )?;
        }

        if outcome.selected.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "  No updates selected.")?;
            return Ok(());
        }

        if outcome.patched.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "  No files were updated.")?;
            return Ok(());
        }

        self.format_applied(outcome, writer)
    }
}
