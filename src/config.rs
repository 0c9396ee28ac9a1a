//! Harness configuration
//!
//! Built once at startup from the environment and passed down explicitly.
//! Every read goes through a lookup closure so tests never touch the process
//! environment.

use std::collections::BTreeMap;
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, HarnessError};

/// Environment variable naming the utilities package directory.
pub const PACKAGE_ENV: &str = "UTILCHECK_PACKAGE";
/// Environment variable overriding or extending the launcher table.
pub const LAUNCHERS_ENV: &str = "UTILCHECK_LAUNCHERS";
/// Directory name searched for when no package is configured.
pub const DEFAULT_PACKAGE_DIR: &str = "utilities";

/// Interpreter used for files with a given extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub program: String,
    pub args: Vec<String>,
}

impl Launcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parse `program [args...]`.
    fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.split_whitespace();
        let program = parts.next()?;
        Some(Self {
            program: program.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }
}

/// Extension (without the dot, lowercase) to launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherTable {
    launchers: BTreeMap<String, Launcher>,
}

impl Default for LauncherTable {
    fn default() -> Self {
        let launchers = [
            ("py", "python3"),
            ("sh", "sh"),
            ("bash", "bash"),
            ("rb", "ruby"),
            ("pl", "perl"),
            ("js", "node"),
        ]
        .into_iter()
        .map(|(ext, program)| (ext.to_string(), Launcher::new(program)))
        .collect();
        Self { launchers }
    }
}

impl LauncherTable {
    /// A table with no launchers; only directly executable files are utilities.
    pub fn empty() -> Self {
        Self {
            launchers: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, ext: &str, launcher: Launcher) {
        self.launchers.insert(ext.trim_start_matches('.').to_lowercase(), launcher);
    }

    pub fn for_path(&self, path: &Path) -> Option<&Launcher> {
        let ext = path.extension()?.to_str()?;
        self.launchers.get(&ext.to_lowercase())
    }

    /// Apply a `ext=program [args...],ext=...` override string on top of this table.
    pub fn apply_overrides(&mut self, spec: &str) -> Result<(), ConfigError> {
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = || ConfigError::InvalidLauncher {
                entry: entry.to_string(),
            };
            let (ext, command) = entry.split_once('=').ok_or_else(invalid)?;
            let ext = ext.trim();
            if ext.is_empty() {
                return Err(invalid());
            }
            let launcher = Launcher::parse(command).ok_or_else(invalid)?;
            self.insert(ext, launcher);
        }
        Ok(())
    }
}

/// Whether console output is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        self == ColorMode::Always
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub package_dir: PathBuf,
    pub launchers: LauncherTable,
    pub color: ColorMode,
}

impl HarnessConfig {
    /// Configuration for an explicit package directory with default launchers and no colour.
    pub fn for_package(package_dir: impl Into<PathBuf>) -> Self {
        Self {
            package_dir: package_dir.into(),
            launchers: LauncherTable::default(),
            color: ColorMode::Never,
        }
    }

    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, HarnessError> {
        let color = if std::io::stdout().is_terminal() {
            ColorMode::Always
        } else {
            ColorMode::Never
        };
        let search_roots = default_search_roots();
        Self::from_lookup(|key| env::var(key).ok(), &search_roots, color)
    }

    /// Resolve configuration from an arbitrary variable lookup.
    ///
    /// `search_roots` are probed in order for a `utilities/` directory when
    /// `UTILCHECK_PACKAGE` is unset.
    pub fn from_lookup<F>(lookup: F, search_roots: &[PathBuf], color: ColorMode) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let color = if lookup("NO_COLOR").is_some() { ColorMode::Never } else { color };

        let package_dir = match lookup(PACKAGE_ENV).filter(|p| !p.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => find_package_dir(search_roots).ok_or_else(|| {
                HarnessError::resolution(
                    DEFAULT_PACKAGE_DIR,
                    format!("no '{}' directory found and {} is not set", DEFAULT_PACKAGE_DIR, PACKAGE_ENV),
                )
            })?,
        };

        let mut launchers = LauncherTable::default();
        if let Some(spec) = lookup(LAUNCHERS_ENV) {
            launchers.apply_overrides(&spec)?;
        }

        Ok(Self {
            package_dir,
            launchers,
            color,
        })
    }
}

/// Current directory, the executable's directory, and two levels above it
/// (so `target/debug/utilcheck` finds the project's `utilities/`).
fn default_search_roots() -> Vec<PathBuf> {
    let mut roots = vec![PathBuf::from(".")];
    if let Ok(exe_path) = env::current_exe() {
        let mut dir = exe_path.parent().map(Path::to_path_buf);
        for _ in 0..3 {
            let Some(current) = dir else { break };
            dir = current.parent().map(Path::to_path_buf);
            roots.push(current);
        }
    }
    roots
}

fn find_package_dir(search_roots: &[PathBuf]) -> Option<PathBuf> {
    search_roots
        .iter()
        .map(|root| root.join(DEFAULT_PACKAGE_DIR))
        .find(|candidate| candidate.is_dir())
}
