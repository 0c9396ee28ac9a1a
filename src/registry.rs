//! Utility registry
//!
//! An explicit, ordered mapping from utility name to the command that launches it.
//! Directory discovery fills one of these at startup; embedders can also register
//! utilities in code and hand the registry straight to the harness.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of one discoverable utility (the file stem for directory discovery).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtilityName(String);

impl UtilityName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used by the selector and the uniqueness check.
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

impl fmt::Display for UtilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UtilityName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// How a utility is launched.
///
/// The backing `source` file is always the last argument, unless `program` is the
/// source itself (directly executable files).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub source: PathBuf,
}

impl EntryPoint {
    /// Run `source` through an interpreter, e.g. `python3 alpha.py`.
    pub fn interpreted(program: impl Into<PathBuf>, args: Vec<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            source: source.into(),
        }
    }

    /// Execute `source` directly.
    pub fn direct(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        Self {
            program: source.clone(),
            args: Vec::new(),
            source,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.program == self.source
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Build the (not yet spawned) command for this entry point.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if !self.is_direct() {
            cmd.arg(&self.source);
        }
        cmd
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if !self.is_direct() {
            write!(f, " {}", self.source.display())?;
        }
        Ok(())
    }
}

/// A registered utility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utility {
    pub name: UtilityName,
    pub entry: EntryPoint,
}

/// Ordered utility registry. Names are unique ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtilityRegistry {
    utilities: Vec<Utility>,
}

impl UtilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a utility.
    ///
    /// Returns `false` (and leaves the registry unchanged) when a utility with the
    /// same name, ignoring case, is already registered.
    pub fn register(&mut self, name: impl Into<UtilityName>, entry: EntryPoint) -> bool {
        let name = name.into();
        if self.get_ignore_case(name.as_str()).is_some() {
            return false;
        }
        self.utilities.push(Utility { name, entry });
        true
    }

    /// Builder-style registration, for static registries assembled in code.
    pub fn with(mut self, name: impl Into<UtilityName>, entry: EntryPoint) -> Self {
        self.register(name, entry);
        self
    }

    pub fn get_ignore_case(&self, name: &str) -> Option<&Utility> {
        self.utilities.iter().find(|u| u.name.matches_ignore_case(name))
    }

    pub fn names(&self) -> Vec<UtilityName> {
        self.utilities.iter().map(|u| u.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Utility> {
        self.utilities.iter()
    }

    pub fn len(&self) -> usize {
        self.utilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utilities.is_empty()
    }
}

impl From<UtilityName> for String {
    fn from(name: UtilityName) -> Self {
        name.0
    }
}

impl From<String> for UtilityName {
    fn from(name: String) -> Self {
        Self(name)
    }
}
