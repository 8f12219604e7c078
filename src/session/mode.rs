//! Selection modes

use std::fmt;

/// How accepted updates are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Report only, never patch
    CheckOnly,
    /// Accept every available update
    Auto,
    /// Ask the user
    #[default]
    Interactive,
}

impl SelectionMode {
    /// Resolve the mode from CLI flags; `--check` wins over `--auto`
    pub fn from_flags(check: bool, auto: bool) -> Self {
        if check {
            SelectionMode::CheckOnly
        } else if auto {
            SelectionMode::Auto
        } else {
            SelectionMode::Interactive
        }
    }

    /// Whether this mode may write files
    pub fn applies_patches(&self) -> bool {
        !matches!(self, SelectionMode::CheckOnly)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::CheckOnly => "check",
            SelectionMode::Auto => "auto",
            SelectionMode::Interactive => "interactive",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
