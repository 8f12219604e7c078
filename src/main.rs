//! skillscout - keeps the version references of skill definitions current
//!
//! For every `<skills-dir>/<skill>/versions.json` this tool:
//! - Queries npm, PyPI or python.org for the latest version of each package
//! - Reports which tracked versions are behind
//! - Patches versions.json and SKILL.md for the updates the user accepts

use clap::Parser;
use skillscout::cli::CliArgs;
use skillscout::output::{create_formatter, OutputConfig};
use skillscout::registry::HttpClient;
use skillscout::scout::VersionScout;
use skillscout::session::{SessionConfig, StdinInput, UpdateSession};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("skillscout v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Skills: {}", args.skills_dir.display());
    }

    let client = HttpClient::with_timeout(args.timeout)?;
    let scout = VersionScout::new(client).with_concurrency(args.concurrency);
    let session = UpdateSession::new(SessionConfig::from_cli(&args), scout);

    let formatter = create_formatter(OutputConfig::from_cli(
        args.json,
        args.verbose,
        args.quiet,
        args.no_color,
    ));
    let mut input = StdinInput::new(args.json);

    let mut stdout = io::stdout().lock();
    let outcome = session.run(&mut input, formatter.as_ref(), &mut stdout).await?;
    stdout.flush()?;

    // Skipped records are reported above; they do not fail the run
    if outcome.has_errors() {
        tracing::debug!(errors = outcome.errors.len(), "session finished with skipped records");
    }
    Ok(ExitCode::SUCCESS)
}
