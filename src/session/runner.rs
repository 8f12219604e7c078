//! UpdateSession: the discover → check → select → patch workflow

use super::input::InputSource;
use super::mode::SelectionMode;
use super::selection::{prompt_selection, SelectedUpdate, Selection};
use crate::cli::CliArgs;
use crate::domain::{AcceptedUpdate, PatchSummary, RecordCheck};
use crate::error::{AppError, ConfigError, SelectionError};
use crate::output::OutputFormatter;
use crate::patch::FilePatcher;
use crate::progress::Progress;
use crate::record::{discover_records, find_record, load_record, RecordLocation, VersionRecord};
use crate::scout::VersionScout;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Root scanned for `*/versions.json`
    pub skills_dir: PathBuf,
    /// Restrict the session to one record
    pub skill: Option<String>,
    /// How updates are accepted
    pub mode: SelectionMode,
    /// Maintain the "Version Update Notes" section in patched documents
    pub notes: bool,
    /// Show a progress bar while checking
    pub show_progress: bool,
}

impl SessionConfig {
    /// Create a configuration for a skills root with default settings
    pub fn new(skills_dir: impl Into<PathBuf>) -> Self {
        Self {
            skills_dir: skills_dir.into(),
            skill: None,
            mode: SelectionMode::default(),
            notes: false,
            show_progress: false,
        }
    }

    /// Create configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            skills_dir: args.skills_dir.clone(),
            skill: args.skill.clone(),
            mode: SelectionMode::from_flags(args.check, args.auto),
            notes: args.notes,
            show_progress: !args.quiet && !args.json,
        }
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_notes(mut self, notes: bool) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// Everything a session did, for reporting
#[derive(Debug)]
pub struct SessionOutcome {
    /// Mode the session ran in
    pub mode: SelectionMode,
    /// Record filter, if any
    pub skill_filter: Option<String>,
    /// Names of records that were loaded and checked
    pub records: Vec<String>,
    /// Registry checks per record, in discovery order
    pub checks: Vec<RecordCheck>,
    /// The interactive decision (interactive mode only)
    pub selection: Option<Selection>,
    /// Updates accepted for patching
    pub selected: Vec<SelectedUpdate>,
    /// What was written per record
    pub patched: Vec<PatchSummary>,
    /// Per-record errors; none of them stopped the other records
    pub errors: Vec<AppError>,
}

impl SessionOutcome {
    pub(crate) fn new(mode: SelectionMode, skill_filter: Option<String>) -> Self {
        Self {
            mode,
            skill_filter,
            records: Vec::new(),
            checks: Vec::new(),
            selection: None,
            selected: Vec::new(),
            patched: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Number of candidates with an update available
    pub fn available_updates(&self) -> usize {
        self.checks.iter().map(RecordCheck::update_count).sum()
    }

    /// Number of candidates whose registry query failed
    pub fn fetch_errors(&self) -> usize {
        self.checks.iter().map(RecordCheck::error_count).sum()
    }

    /// True when there was nothing to update
    pub fn is_up_to_date(&self) -> bool {
        self.available_updates() == 0
    }

    /// The selection error, if the interactive answer was malformed
    pub fn invalid_selection(&self) -> Option<&SelectionError> {
        self.selection.as_ref().and_then(Selection::error)
    }

    /// Total number of updates written
    pub fn total_applied(&self) -> usize {
        self.patched.iter().map(|p| p.applied.len()).sum()
    }

    /// Every file rewritten, in write order
    pub fn files_modified(&self) -> impl Iterator<Item = &Path> {
        self.patched
            .iter()
            .flat_map(|p| p.files_modified.iter().map(PathBuf::as_path))
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A record loaded for this session
struct LoadedRecord {
    location: RecordLocation,
    record: VersionRecord,
}

/// Coordinates one run over the skills root
pub struct UpdateSession {
    config: SessionConfig,
    scout: VersionScout,
    today: NaiveDate,
}

impl UpdateSession {
    /// Create a session dated today (local time)
    pub fn new(config: SessionConfig, scout: VersionScout) -> Self {
        Self {
            config,
            scout,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Override the date stamped into patched files
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the session, reporting through `formatter` into `writer`
    ///
    /// Only a missing skills root or a failing writer is returned as an error;
    /// per-record failures are collected in the outcome.
    pub async fn run(
        &self,
        input: &mut dyn InputSource,
        formatter: &dyn OutputFormatter,
        writer: &mut dyn Write,
    ) -> Result<SessionOutcome, AppError> {
        let root = &self.config.skills_dir;
        if !root.is_dir() {
            return Err(ConfigError::InvalidSkillsDir {
                path: root.clone(),
                message: "not a directory".to_string(),
            }
            .into());
        }

        let mut outcome = SessionOutcome::new(self.config.mode, self.config.skill.clone());

        // Step 1: Discover and load records
        let mut loaded = self.load_records(root, &mut outcome);

        // Step 2: Query registries
        self.check_records(&loaded, &mut outcome).await;
        formatter.format_checks(&outcome.checks, writer)?;

        // Step 3: Select and patch
        if self.config.mode.applies_patches() && !outcome.is_up_to_date() {
            outcome.selected = self.select(&outcome.checks, input, &mut outcome.selection);
            if !outcome.selected.is_empty() {
                let mut progress = Progress::new(self.config.show_progress);
                progress.spinner("Writing updates...");
                self.apply(&mut loaded, &mut outcome);
                progress.finish_and_clear();
            }
        }

        formatter.format_outcome(&outcome, writer)?;
        Ok(outcome)
    }

    fn load_records(&self, root: &Path, outcome: &mut SessionOutcome) -> Vec<LoadedRecord> {
        let locations = match &self.config.skill {
            Some(name) => match find_record(root, name) {
                Ok(location) => vec![location],
                Err(e) => {
                    tracing::warn!(skill = %name, "requested skill has no version record");
                    outcome.errors.push(e.into());
                    Vec::new()
                }
            },
            None => discover_records(root),
        };

        let mut loaded = Vec::new();
        for location in locations {
            match load_record(&location) {
                Ok(record) => {
                    outcome.records.push(location.name.clone());
                    loaded.push(LoadedRecord { location, record });
                }
                Err(e) => {
                    tracing::warn!(skill = %location.name, error = %e, "skipping unreadable record");
                    outcome.errors.push(e.into());
                }
            }
        }
        loaded
    }

    async fn check_records(&self, loaded: &[LoadedRecord], outcome: &mut SessionOutcome) {
        let total: usize = loaded.iter().map(|l| l.record.packages.len()).sum();
        let mut progress = Progress::new(self.config.show_progress && total > 0);
        progress.start(total as u64, "Checking versions");

        for entry in loaded {
            let units = entry.record.units();
            let mut check = RecordCheck::new(&entry.location.name, entry.record.registry);
            check.candidates = self.scout.check_all(&units, &progress).await;
            outcome.checks.push(check);
        }

        progress.finish_and_clear();
    }

    fn select(
        &self,
        checks: &[RecordCheck],
        input: &mut dyn InputSource,
        selection: &mut Option<Selection>,
    ) -> Vec<SelectedUpdate> {
        let offered: Vec<SelectedUpdate> = checks
            .iter()
            .flat_map(|check| {
                check
                    .updates()
                    .filter_map(|candidate| candidate.to_accepted())
                    .map(move |update| SelectedUpdate::new(&check.record, update))
            })
            .collect();

        match self.config.mode {
            SelectionMode::CheckOnly => Vec::new(),
            SelectionMode::Auto => offered,
            SelectionMode::Interactive => {
                let choice = prompt_selection(input, &offered);
                if let Some(e) = choice.error() {
                    tracing::warn!(error = %e, "invalid selection, nothing accepted");
                }
                let picked = choice.pick(&offered);
                *selection = Some(choice);
                picked
            }
        }
    }

    fn apply(&self, loaded: &mut [LoadedRecord], outcome: &mut SessionOutcome) {
        let patcher = FilePatcher::new(self.today).with_notes(self.config.notes);

        for entry in loaded.iter_mut() {
            let updates: Vec<AcceptedUpdate> = outcome
                .selected
                .iter()
                .filter(|s| s.record == entry.location.name)
                .map(|s| s.update.clone())
                .collect();
            if updates.is_empty() {
                continue;
            }

            let (summary, errors) = patcher.apply(&entry.location, &mut entry.record, &updates);
            if !summary.applied.is_empty() {
                outcome.patched.push(summary);
            }
            outcome.errors.extend(errors);
        }
    }
}
