#![forbid(unsafe_code)]
// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
//! utilcheck: a harness for standalone utility modules
//!
//! Discovers the leaf utilities of a package directory, runs each one as its own
//! child process, classifies it by exit status, and prints a pass/fail summary.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The crate root enforces
//!   `#![deny(clippy::unwrap_used)]` and `#![deny(clippy::expect_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod registry;
pub mod report;
pub mod runner;
pub mod selector;

pub use config::HarnessConfig;
pub use error::{HarnessError, UtilityExecutionError};
pub use registry::{EntryPoint, Utility, UtilityName, UtilityRegistry};
pub use report::{ConsoleReporter, Reporter, RunSummary};
pub use runner::ExecutionResult;
