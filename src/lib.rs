//! skillscout - skill version scout and patcher library
//!
//! This library provides the core functionality for keeping the version
//! references of skill definitions current:
//! - Registry queries (npm, PyPI, python.org release index)
//! - Version ordering and update classification
//! - Rule-based patching of versions.json and SKILL.md
//! - Check-only, automatic and interactive update sessions

pub mod cli;
pub mod domain;
pub mod error;
pub mod output;
pub mod patch;
pub mod progress;
pub mod record;
pub mod registry;
pub mod scout;
pub mod session;
