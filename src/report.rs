//! Run reporting
//!
//! ## Reporter Trait
//!
//! The harness reports through the `Reporter` trait so the run loop never writes
//! to the terminal itself. `ConsoleReporter` is the default and renders
//! colour-annotated lines to any writer.

use std::io::Write;
use std::path::Path;

use crate::config::ColorMode;
use crate::registry::UtilityName;
use crate::runner::ExecutionResult;

/// Width of the delimiter printed around each child process.
pub const DELIMITER_WIDTH: usize = 50;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

/// Aggregate tally for one harness invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    total: usize,
    failed: usize,
}

impl RunSummary {
    /// Tally a sequence of outcomes.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ExecutionResult>) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.record(result);
        }
        summary
    }

    pub fn record(&mut self, result: &ExecutionResult) {
        self.total += 1;
        if !result.is_success() {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn passed(&self) -> usize {
        self.total - self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Trait for reporting harness progress and results.
pub trait Reporter {
    /// Called once before discovery
    fn on_run_start(&mut self, _package: &Path) {}

    /// Called with the full working set when no single utility was requested
    fn on_listing(&mut self, names: &[UtilityName]);

    /// Called when discovery found nothing to run
    fn on_empty(&mut self, package: &Path);

    /// Called right before a utility's child process is spawned
    fn on_utility_start(&mut self, name: &UtilityName);

    /// Called once the child process has terminated
    fn on_utility_complete(&mut self, name: &UtilityName, result: &ExecutionResult);

    /// Called once after the last utility
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Default console reporter.
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: ColorMode,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout(color: ColorMode) -> Self {
        Self::new(std::io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: ColorMode) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.color.enabled() {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn delimiter(&mut self) {
        let rule = "-".repeat(DELIMITER_WIDTH);
        self.line(&rule);
    }

    // Child processes write straight to the inherited descriptors.
    fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_run_start(&mut self, package: &Path) {
        let title = self.paint("utilcheck - standalone utility harness", GREEN);
        let running = self.paint(&format!("Testing utilities in {}...", package.display()), YELLOW);
        self.line(&title);
        self.line(&running);
        self.line("");
        self.flush();
    }

    fn on_listing(&mut self, names: &[UtilityName]) {
        let header = self.paint(&format!("Found {} utilities:", names.len()), YELLOW);
        self.line(&header);
        for name in names {
            self.line(&format!(" - {}", name));
        }
        self.flush();
    }

    fn on_empty(&mut self, package: &Path) {
        let warning = self.paint(&format!("No utilities found in {}.", package.display()), RED);
        self.line(&warning);
        self.flush();
    }

    fn on_utility_start(&mut self, name: &UtilityName) {
        let testing = self.paint(&format!("Testing {}...", name), YELLOW);
        self.line(&testing);
        self.delimiter();
        self.line("");
        self.flush();
    }

    fn on_utility_complete(&mut self, name: &UtilityName, result: &ExecutionResult) {
        self.line("");
        self.delimiter();
        let millis = result.duration().as_millis();
        let status = match result {
            ExecutionResult::Success(_) => self.paint("PASSED", GREEN),
            ExecutionResult::Failure(_, _) => self.paint("FAILED", RED),
        };
        self.line(&format!("{} {} ({}ms)", name, status, millis));
        if let Some(error) = result.error() {
            let detail = self.paint(&format!("Error testing utility: {}", error), RED);
            self.line(&detail);
        }
        self.flush();
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        self.delimiter();
        let ratio = format!("{}/{} passed", summary.passed(), summary.total());
        let message = if summary.all_passed() {
            self.paint(&format!("All utilities passed successfully ({}).", ratio), GREEN)
        } else {
            self.paint(&format!("Utilities {}.", ratio), RED)
        };
        self.line(&message);
        self.flush();
    }
}
