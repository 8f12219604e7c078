//! Update candidates: a tracked unit compared against a freshly fetched version

use super::{is_newer, TrackedUnit};
use crate::error::FetchFailure;
use std::fmt;

/// Outcome of comparing a tracked version with the registry's latest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateStatus {
    /// Tracked version is the latest (or newer)
    Current,
    /// Registry has a newer version
    UpdateAvailable,
    /// Registry query failed; no ordering claim is made
    FetchError(FetchFailure),
}

impl CandidateStatus {
    /// Report label for this status
    pub fn label(&self) -> &'static str {
        match self {
            CandidateStatus::Current => "OK",
            CandidateStatus::UpdateAvailable => "UPDATE",
            CandidateStatus::FetchError(_) => "ERROR",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of checking one tracked unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCandidate {
    /// The unit that was checked
    pub unit: TrackedUnit,
    /// Latest published version; `None` exactly when the fetch failed
    pub latest_version: Option<String>,
    /// Classification
    pub status: CandidateStatus,
}

impl UpdateCandidate {
    /// Classifies a fetch result for a unit
    pub fn classify(unit: TrackedUnit, fetched: Result<String, FetchFailure>) -> Self {
        match fetched {
            Ok(latest) => {
                let status = if is_newer(&latest, &unit.tracked_version) {
                    CandidateStatus::UpdateAvailable
                } else {
                    CandidateStatus::Current
                };
                Self {
                    unit,
                    latest_version: Some(latest),
                    status,
                }
            }
            Err(failure) => Self::fetch_error(unit, failure),
        }
    }

    /// Creates a FetchError candidate
    pub fn fetch_error(unit: TrackedUnit, failure: FetchFailure) -> Self {
        Self {
            unit,
            latest_version: None,
            status: CandidateStatus::FetchError(failure),
        }
    }

    /// Returns true if this candidate may be patched
    pub fn is_update(&self) -> bool {
        matches!(self.status, CandidateStatus::UpdateAvailable)
    }

    /// Returns true if the registry query failed
    pub fn is_error(&self) -> bool {
        matches!(self.status, CandidateStatus::FetchError(_))
    }

    /// Returns the fetch failure, if any
    pub fn failure(&self) -> Option<&FetchFailure> {
        match &self.status {
            CandidateStatus::FetchError(failure) => Some(failure),
            _ => None,
        }
    }

    /// Latest version for display, `?` when unknown
    pub fn latest_display(&self) -> &str {
        self.latest_version.as_deref().unwrap_or("?")
    }

    /// Converts an available update into a patch triple
    ///
    /// Returns `None` for current and failed candidates.
    pub fn to_accepted(&self) -> Option<AcceptedUpdate> {
        if !self.is_update() {
            return None;
        }
        let latest = self.latest_version.as_ref()?;
        Some(AcceptedUpdate {
            name: self.unit.name.clone(),
            old_version: self.unit.tracked_version.clone(),
            new_version: latest.clone(),
            docs_url: self.unit.docs_url.clone(),
        })
    }
}

/// An update the user accepted: `(name, old, new)` plus its docs link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedUpdate {
    /// Package name, the anchor for every patch context
    pub name: String,
    /// Version currently tracked
    pub old_version: String,
    /// Version to patch in
    pub new_version: String,
    /// Documentation URL, used by the release-notes section
    pub docs_url: String,
}

impl AcceptedUpdate {
    /// Creates a new AcceptedUpdate
    pub fn new(
        name: impl Into<String>,
        old_version: impl Into<String>,
        new_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            old_version: old_version.into(),
            new_version: new_version.into(),
            docs_url: String::new(),
        }
    }

    /// Attach the documentation URL
    pub fn with_docs_url(mut self, docs_url: impl Into<String>) -> Self {
        self.docs_url = docs_url.into();
        self
    }
}

impl fmt::Display for AcceptedUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.name, self.old_version, self.new_version
        )
    }
}
