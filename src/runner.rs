//! Child-process execution of a single utility.

use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::error::UtilityExecutionError;
use crate::registry::{Utility, UtilityName};

/// Outcome of one utility run.
#[derive(Debug)]
pub enum ExecutionResult {
    Success(Duration),
    Failure(Duration, UtilityExecutionError),
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success(_))
    }

    pub fn duration(&self) -> Duration {
        match self {
            ExecutionResult::Success(d) | ExecutionResult::Failure(d, _) => *d,
        }
    }

    pub fn error(&self) -> Option<&UtilityExecutionError> {
        match self {
            ExecutionResult::Success(_) => None,
            ExecutionResult::Failure(_, e) => Some(e),
        }
    }
}

/// Spawn the utility with inherited stdio and block until it exits.
///
/// No timeout is applied.
pub fn run_utility(utility: &Utility) -> ExecutionResult {
    let start = Instant::now();
    let name = &utility.name;
    let entry = &utility.entry;

    if !entry.source().is_file() {
        return ExecutionResult::Failure(
            start.elapsed(),
            UtilityExecutionError::MissingEntry {
                name: name.clone(),
                path: entry.source().to_path_buf(),
            },
        );
    }

    tracing::debug!(utility = %name, command = %entry, "spawning utility");
    let status = entry
        .command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();

    let result = match status {
        Ok(status) => classify_status(name, status),
        Err(e) => Err(UtilityExecutionError::Launch {
            name: name.clone(),
            program: entry.program.display().to_string(),
            source: e,
        }),
    };

    let elapsed = start.elapsed();
    tracing::debug!(utility = %name, elapsed_ms = elapsed.as_millis() as u64, ok = result.is_ok(), "utility finished");
    match result {
        Ok(()) => ExecutionResult::Success(elapsed),
        Err(e) => ExecutionResult::Failure(elapsed, e),
    }
}

fn classify_status(name: &UtilityName, status: ExitStatus) -> Result<(), UtilityExecutionError> {
    if status.success() {
        return Ok(());
    }
    if let Some(code) = status.code() {
        return Err(UtilityExecutionError::ExitStatus {
            name: name.clone(),
            code,
        });
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return Err(UtilityExecutionError::Signal {
                name: name.clone(),
                signal,
            });
        }
    }
    Err(UtilityExecutionError::NoStatus { name: name.clone() })
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use super::*;
    use crate::registry::EntryPoint;

    fn shell_utility(dir: &std::path::Path, name: &str, body: &str) -> Utility {
        let path = dir.join(format!("{name}.sh"));
        fs::write(&path, body).unwrap();
        Utility {
            name: UtilityName::from(name),
            entry: EntryPoint::interpreted("sh", Vec::new(), path),
        }
    }

    #[test]
    fn test_zero_exit_is_success() {
        let tmp = tempfile::tempdir().unwrap();
        let utility = shell_utility(tmp.path(), "alpha", "exit 0\n");
        assert!(run_utility(&utility).is_success());
    }

    #[test]
    fn test_nonzero_exit_is_attributed_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let utility = shell_utility(tmp.path(), "beta", "exit 3\n");
        let result = run_utility(&utility);
        match result.error() {
            Some(UtilityExecutionError::ExitStatus { name, code }) => {
                assert_eq!(name.as_str(), "beta");
                assert_eq!(*code, 3);
            }
            other => panic!("expected exit status failure, got {other:?}"),
        }
    }

    #[test]
    fn test_signal_is_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let utility = shell_utility(tmp.path(), "killed", "kill -9 $$\n");
        let result = run_utility(&utility);
        assert!(matches!(result.error(), Some(UtilityExecutionError::Signal { signal: 9, .. })));
    }

    #[test]
    fn test_missing_backing_file_is_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let utility = shell_utility(tmp.path(), "gone", "exit 0\n");
        fs::remove_file(&utility.entry.source).unwrap();

        let result = run_utility(&utility);
        assert!(matches!(result.error(), Some(UtilityExecutionError::MissingEntry { .. })));
    }

    #[test]
    fn test_missing_interpreter_is_launch_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("alpha.zz");
        fs::write(&path, "").unwrap();
        let utility = Utility {
            name: UtilityName::from("alpha"),
            entry: EntryPoint::interpreted("utilcheck-no-such-interpreter", Vec::new(), path),
        };

        let result = run_utility(&utility);
        assert!(matches!(result.error(), Some(UtilityExecutionError::Launch { .. })));
        assert!(result.error().unwrap().to_string().starts_with("alpha: failed to launch"));
    }
}
