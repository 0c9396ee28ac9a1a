//! Package discovery
//!
//! Scans one directory level of a utilities package. Direct files become
//! utilities; subdirectories are nested packages and are never descended into.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::LauncherTable;
use crate::error::HarnessError;
use crate::registry::{EntryPoint, UtilityRegistry};

/// Why a directory entry is not a utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Hidden,
    PackageMetadata,
    NestedPackage,
    NotRunnable,
}

/// Scan `root` and build a registry of its leaf utilities in file-name order.
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub fn discover_package(root: &Path, launchers: &LauncherTable) -> Result<UtilityRegistry, HarnessError> {
    if !root.is_dir() {
        let reason = if root.exists() {
            "not a directory"
        } else {
            "no such directory"
        };
        return Err(HarnessError::resolution(root, reason));
    }

    let entries = fs::read_dir(root).map_err(|e| HarnessError::resolution(root, e.to_string()))?;
    let paths = sorted_entry_paths(root, entries.map(|entry| entry.map(|e| e.path())))?;

    let mut registry = UtilityRegistry::new();
    for path in paths {
        let entry = match classify(&path, launchers) {
            Ok(entry) => entry,
            Err(reason) => {
                tracing::debug!(path = %path.display(), ?reason, "skipping package entry");
                continue;
            }
        };

        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::debug!(path = %path.display(), "skipping entry with non UTF-8 name");
            continue;
        };

        if !registry.register(name, entry) {
            tracing::warn!(
                path = %path.display(),
                "utility name '{}' collides with an earlier entry (names are case-insensitive); skipping",
                name
            );
        }
    }

    tracing::debug!(count = registry.len(), "discovery complete");
    Ok(registry)
}

/// Collect entry paths in name order. An unreadable entry fails the whole scan
/// rather than letting a utility silently drop out of the run.
fn sorted_entry_paths<I>(root: &Path, entries: I) -> Result<Vec<PathBuf>, HarnessError>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut paths = entries
        .into_iter()
        .collect::<io::Result<Vec<_>>>()
        .map_err(|e| HarnessError::resolution(root, format!("unreadable package entry: {}", e)))?;
    paths.sort();
    Ok(paths)
}

fn classify(path: &Path, launchers: &LauncherTable) -> Result<EntryPoint, Skip> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if file_name.starts_with('.') {
        return Err(Skip::Hidden);
    }
    if file_name.starts_with("__") {
        return Err(Skip::PackageMetadata);
    }
    // `is_dir`/`is_file` follow symlinks.
    if path.is_dir() {
        return Err(Skip::NestedPackage);
    }
    if !path.is_file() {
        return Err(Skip::NotRunnable);
    }

    if let Some(launcher) = launchers.for_path(path) {
        return Ok(EntryPoint::interpreted(&launcher.program, launcher.args.clone(), path));
    }
    if is_executable(path) {
        return Ok(EntryPoint::direct(path));
    }
    Err(Skip::NotRunnable)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path).is_ok_and(|meta| meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(registry: &UtilityRegistry) -> Vec<String> {
        registry.names().into_iter().map(String::from).collect()
    }

    #[test]
    fn test_discovers_leaf_modules_in_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("beta.py"), "").unwrap();
        fs::write(tmp.path().join("alpha.sh"), "").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("inner.py"), "").unwrap();

        let registry = discover_package(tmp.path(), &LauncherTable::default()).unwrap();
        assert_eq!(names(&registry), vec!["alpha", "beta"]);

        let beta = registry.get_ignore_case("beta").unwrap();
        assert_eq!(beta.entry.program, PathBuf::from("python3"));
        assert_eq!(beta.entry.source, tmp.path().join("beta.py"));
    }

    #[test]
    fn test_skips_hidden_metadata_and_unknown_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("__init__.py"), "").unwrap();
        fs::write(tmp.path().join(".hidden.py"), "").unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();
        fs::write(tmp.path().join("tool.py"), "").unwrap();

        let registry = discover_package(tmp.path(), &LauncherTable::default()).unwrap();
        assert_eq!(names(&registry), vec!["tool"]);
    }

    #[test]
    fn test_empty_package_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("only_a_subpackage")).unwrap();

        let registry = discover_package(tmp.path(), &LauncherTable::default()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_package_is_resolution_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = discover_package(&tmp.path().join("absent"), &LauncherTable::default()).unwrap_err();
        assert!(matches!(err, HarnessError::Resolution { .. }));

        let file = tmp.path().join("file.py");
        fs::write(&file, "").unwrap();
        let err = discover_package(&file, &LauncherTable::default()).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_case_insensitive_duplicates_keep_first() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("Alpha.py"), "").unwrap();
        fs::write(tmp.path().join("alpha.sh"), "").unwrap();

        let registry = discover_package(tmp.path(), &LauncherTable::default()).unwrap();
        assert_eq!(names(&registry), vec!["Alpha"]);
    }

    #[test]
    fn test_unreadable_entry_fails_the_scan() {
        let entries = vec![
            Ok(PathBuf::from("pkg/beta.sh")),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            Ok(PathBuf::from("pkg/alpha.sh")),
        ];
        let err = sorted_entry_paths(Path::new("pkg"), entries).unwrap_err();
        assert!(matches!(err, HarnessError::Resolution { .. }));
        assert!(err.to_string().contains("unreadable package entry: denied"));

        let entries = vec![Ok(PathBuf::from("pkg/beta.sh")), Ok(PathBuf::from("pkg/alpha.sh"))];
        let paths = sorted_entry_paths(Path::new("pkg"), entries).unwrap();
        assert_eq!(paths, vec![PathBuf::from("pkg/alpha.sh"), PathBuf::from("pkg/beta.sh")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_followed() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("real.sh");
        fs::write(&target, "exit 0\n").unwrap();
        fs::create_dir(outside.path().join("subpkg")).unwrap();
        fs::write(outside.path().join("subpkg").join("inner.sh"), "").unwrap();

        symlink(&target, tmp.path().join("link.sh")).unwrap();
        symlink(outside.path().join("subpkg"), tmp.path().join("linked_pkg")).unwrap();

        let registry = discover_package(tmp.path(), &LauncherTable::default()).unwrap();
        assert_eq!(names(&registry), vec!["link"]);
        let link = registry.get_ignore_case("link").unwrap();
        assert_eq!(link.entry.source, tmp.path().join("link.sh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_without_launcher_runs_directly() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let tool = tmp.path().join("tool");
        fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(tmp.path().join("data"), "").unwrap();

        let registry = discover_package(tmp.path(), &LauncherTable::empty()).unwrap();
        assert_eq!(names(&registry), vec!["tool"]);
        assert!(registry.get_ignore_case("tool").unwrap().entry.is_direct());
    }
}
