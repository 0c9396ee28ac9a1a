//! Harness I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the two operations that touch
//! the outside world:
//! - Utility discovery (package directory scan, or a registry built in code)
//! - Utility execution (child process spawn + exit status)
//!
//! The run loop in `harness.rs` only talks to these traits, so it can be driven
//! by fakes in tests.

use std::path::{Path, PathBuf};

use crate::config::LauncherTable;
use crate::discovery::discover_package;
use crate::error::HarnessError;
use crate::registry::{Utility, UtilityRegistry};
use crate::runner::{ExecutionResult, run_utility};

// ============================================================================
// Discovery Interface
// ============================================================================

/// Produce the ordered registry of utilities for one run.
pub trait UtilityDiscovery {
    /// Where the utilities come from (used in report lines).
    fn location(&self) -> &Path;

    /// Enumerate the utilities. An empty registry is not an error.
    fn discover(&self) -> Result<UtilityRegistry, HarnessError>;
}

// ============================================================================
// Executor Interface
// ============================================================================

/// Run one utility to completion and classify the outcome.
pub trait UtilityExecutor {
    fn execute(&self, utility: &Utility) -> ExecutionResult;
}

// ============================================================================
// Default Implementations
// ============================================================================

/// Filesystem discovery over a package directory.
pub struct PackageDiscovery {
    pub root: PathBuf,
    pub launchers: LauncherTable,
}

impl PackageDiscovery {
    pub fn new(root: impl Into<PathBuf>, launchers: LauncherTable) -> Self {
        Self {
            root: root.into(),
            launchers,
        }
    }
}

impl UtilityDiscovery for PackageDiscovery {
    fn location(&self) -> &Path {
        &self.root
    }

    fn discover(&self) -> Result<UtilityRegistry, HarnessError> {
        discover_package(&self.root, &self.launchers)
    }
}

/// A registry assembled in code.
pub struct StaticDiscovery {
    pub label: PathBuf,
    pub registry: UtilityRegistry,
}

impl StaticDiscovery {
    pub fn new(label: impl Into<PathBuf>, registry: UtilityRegistry) -> Self {
        Self {
            label: label.into(),
            registry,
        }
    }
}

impl UtilityDiscovery for StaticDiscovery {
    fn location(&self) -> &Path {
        &self.label
    }

    fn discover(&self) -> Result<UtilityRegistry, HarnessError> {
        Ok(self.registry.clone())
    }
}

/// Child process per utility, inherited stdio.
pub struct ProcessExecutor;

impl UtilityExecutor for ProcessExecutor {
    fn execute(&self, utility: &Utility) -> ExecutionResult {
        run_utility(utility)
    }
}
