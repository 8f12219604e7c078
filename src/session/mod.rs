//! Update session
//!
//! This module provides:
//! - Workflow coordination: discover → load → check → select → patch
//! - Selection modes (check-only, auto, interactive)
//! - Injectable input sources for the interactive prompt
//! - Selection parsing with fail-safe handling of malformed input
//! - Per-record error collection with partial continuation

mod input;
mod mode;
mod runner;
mod selection;

pub use input::{InputSource, ScriptedInput, StdinInput};
pub use mode::SelectionMode;
pub use runner::{SessionConfig, SessionOutcome, UpdateSession};
pub use selection::{parse_indices, prompt_selection, render_menu, SelectedUpdate, Selection};
