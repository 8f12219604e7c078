//! CLI argument parsing module for skillscout

use crate::registry::MAX_TIMEOUT;
use crate::scout::DEFAULT_CONCURRENCY;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a per-request timeout in whole seconds, clamped to 1..=15
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", s))?;
    Ok(Duration::from_secs(secs.clamp(1, MAX_TIMEOUT.as_secs())))
}

/// Parse a worker count (at least 1)
fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("invalid concurrency: {}", s)),
    }
}

/// Keeps the version references of skill definitions current
#[derive(Parser, Debug, Clone)]
#[command(
    name = "skillscout",
    version,
    about = "Check skill versions.json records against npm, PyPI and python.org and patch them"
)]
pub struct CliArgs {
    // Selection
    /// Report only; never write files (takes precedence over --auto)
    #[arg(long)]
    pub check: bool,

    /// Accept every available update without prompting
    #[arg(long)]
    pub auto: bool,

    /// Restrict the run to one skill (directory name)
    #[arg(long, value_name = "NAME")]
    pub skill: Option<String>,

    /// Root scanned for <skill>/versions.json
    #[arg(long, value_name = "PATH", env = "SKILLSCOUT_SKILLS_DIR", default_value = "skills")]
    pub skills_dir: PathBuf,

    /// Append a "Version Update Notes" section to each patched SKILL.md
    #[arg(long)]
    pub notes: bool,

    // Network
    /// Per-request timeout in seconds (1-15)
    #[arg(long, value_name = "SECS", value_parser = parse_timeout, default_value = "10")]
    pub timeout: Duration,

    /// Maximum concurrent registry requests
    #[arg(long, value_name = "N", value_parser = parse_concurrency, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
