//! Harness error types
//!
//! Fatal errors (`HarnessError`) end the run before anything executes and are
//! rendered with miette. Per-utility failures (`UtilityExecutionError`) are
//! recovered inside the run loop and only counted.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::registry::UtilityName;

/// Errors that abort the whole run.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("cannot resolve utilities package at '{}': {reason}", path.display())]
    #[diagnostic(
        code(utilcheck::resolution),
        help("point UTILCHECK_PACKAGE at the directory holding the utilities")
    )]
    Resolution { path: PathBuf, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("utility '{requested}' not found")]
    #[diagnostic(code(utilcheck::not_found))]
    NotFound {
        requested: String,
        available: Vec<UtilityName>,
        suggestion: Option<UtilityName>,
        #[help]
        help: String,
    },
}

impl HarnessError {
    pub fn resolution(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        HarnessError::Resolution {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(requested: impl Into<String>, available: Vec<UtilityName>, suggestion: Option<UtilityName>) -> Self {
        let help = not_found_help(suggestion.as_ref(), &available);
        HarnessError::NotFound {
            requested: requested.into(),
            available,
            suggestion,
            help,
        }
    }
}

fn not_found_help(suggestion: Option<&UtilityName>, available: &[UtilityName]) -> String {
    let listing = available.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(", ");
    match suggestion {
        Some(name) => format!("did you mean '{}'? available utilities: {}", name, listing),
        None if available.is_empty() => "no utilities are available".to_string(),
        None => format!("available utilities: {}", listing),
    }
}

/// Malformed environment configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid launcher entry '{entry}': expected `ext=program [args...]`")]
    #[diagnostic(code(utilcheck::config), help("example: UTILCHECK_LAUNCHERS=\"py=python3 -u,sh=bash\""))]
    InvalidLauncher { entry: String },
}

/// Why a single utility failed. Always names the utility it belongs to.
#[derive(Debug, Error)]
pub enum UtilityExecutionError {
    #[error("{name}: backing file '{}' is missing", path.display())]
    MissingEntry { name: UtilityName, path: PathBuf },

    #[error("{name}: failed to launch '{program}': {source}")]
    Launch {
        name: UtilityName,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{name}: exited with status {code}")]
    ExitStatus { name: UtilityName, code: i32 },

    #[error("{name}: terminated by signal {signal}")]
    Signal { name: UtilityName, signal: i32 },

    #[error("{name}: terminated without an exit status")]
    NoStatus { name: UtilityName },
}

impl UtilityExecutionError {
    pub fn utility(&self) -> &UtilityName {
        match self {
            UtilityExecutionError::MissingEntry { name, .. }
            | UtilityExecutionError::Launch { name, .. }
            | UtilityExecutionError::ExitStatus { name, .. }
            | UtilityExecutionError::Signal { name, .. }
            | UtilityExecutionError::NoStatus { name } => name,
        }
    }
}
