//! CLI module for utilcheck
//!
//! ## Usage
//!
//! - `utilcheck` - run every utility in the package
//! - `utilcheck <name>` - run one utility, matched case-insensitively
//!
//! ## Modules
//!
//! - `interfaces` - Discovery/executor seams and their default implementations
//! - `harness` - The discover → select → run → report loop
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.
//!
//! ## Exit codes
//!
//! - `0` - every selected utility passed, or the package has no utilities
//! - `1` - at least one utility failed
//! - `2` - the package could not be resolved, configuration is malformed, or the
//!   requested utility does not exist

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod harness;
pub mod interfaces;

use std::fmt;
use std::process;

use clap::Parser;

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::report::ConsoleReporter;
use harness::{RunOutcome, run_harness};
use interfaces::{PackageDiscovery, ProcessExecutor};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The run never started: bad package, bad configuration, or unknown utility.
    pub const FATAL: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        let report = miette::Report::new(err);
        CliError::new(format!("{report:?}"), ExitCode::FATAL)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run each standalone utility in a package as its own process
#[derive(Parser, Debug)]
#[command(name = "utilcheck")]
#[command(version = VERSION)]
#[command(about = "Run each standalone utility in a package as its own process", long_about = None)]
#[command(after_help = "Environment:\n  UTILCHECK_PACKAGE    utilities package directory (default: ./utilities)\n  UTILCHECK_LAUNCHERS  extra launchers, e.g. \"py=python3 -u,lua=lua\"\n  NO_COLOR             disable coloured output")]
pub struct Cli {
    /// Name of a single utility to run (case-insensitive); runs all when omitted
    #[arg(value_name = "UTILITY")]
    pub utility: Option<String>,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    let result = HarnessConfig::from_env()
        .map_err(CliError::from)
        .and_then(|config| execute(cli, &config));

    match result {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute one harness run and map its outcome to an exit code.
pub fn execute(cli: Cli, config: &HarnessConfig) -> CliResult<ExitCode> {
    let discovery = PackageDiscovery::new(&config.package_dir, config.launchers.clone());
    let mut reporter = ConsoleReporter::stdout(config.color);

    let outcome = run_harness(&discovery, &ProcessExecutor, &mut reporter, cli.utility.as_deref())?;

    match outcome {
        // "no utilities found" is a warning, not a failure
        RunOutcome::NothingToRun => Ok(ExitCode::SUCCESS),
        RunOutcome::Completed(summary) if summary.all_passed() => Ok(ExitCode::SUCCESS),
        // Summary already printed
        RunOutcome::Completed(_) => Err(CliError::new("", ExitCode::FAILURE)),
    }
}

// ============================================================================
// Tests
// ============================================================================
