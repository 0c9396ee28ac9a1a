//! Harness run loop
//!
//! `Idle → Discovering → {Empty | Selecting → Running(×N) → Reporting → Done}`
//!
//! Resolution and not-found errors end the run before anything executes. A
//! failing utility is recorded and the loop moves on; nothing is retried.

use crate::error::HarnessError;
use crate::report::{Reporter, RunSummary};
use crate::selector::select;

use super::interfaces::{UtilityDiscovery, UtilityExecutor};

/// How a run that got past discovery and selection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Discovery returned no utilities; nothing was executed.
    NothingToRun,
    /// Every selected utility ran.
    Completed(RunSummary),
}

/// Discover, select, and run utilities one at a time, reporting as we go.
pub fn run_harness(
    discovery: &dyn UtilityDiscovery,
    executor: &dyn UtilityExecutor,
    reporter: &mut dyn Reporter,
    requested: Option<&str>,
) -> Result<RunOutcome, HarnessError> {
    reporter.on_run_start(discovery.location());

    let registry = discovery.discover()?;
    if registry.is_empty() {
        reporter.on_empty(discovery.location());
        return Ok(RunOutcome::NothingToRun);
    }

    let selected = select(&registry, requested)?;
    if requested.is_none() {
        let names: Vec<_> = selected.iter().map(|u| u.name.clone()).collect();
        reporter.on_listing(&names);
    }
    tracing::debug!(selected = selected.len(), discovered = registry.len(), "working set ready");

    let mut summary = RunSummary::default();
    for utility in selected {
        reporter.on_utility_start(&utility.name);
        let result = executor.execute(utility);
        reporter.on_utility_complete(&utility.name, &result);
        summary.record(&result);
    }

    reporter.on_run_complete(&summary);
    Ok(RunOutcome::Completed(summary))
}
