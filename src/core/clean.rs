//! Build artifact removal.
//!
//! Patterns are globs relative to the project root. A trailing `/` limits a
//! pattern to directories. Hidden entries are only matched by patterns that
//! name them explicitly, so `**/__pycache__/` never walks into `.git` or a
//! virtual environment.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovedKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedPath {
    pub path: String,
    pub kind: RemovedKind,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub removed: Vec<RemovedPath>,
}

impl CleanReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Remove everything under `root` matched by `patterns`.
///
/// Patterns that match nothing are skipped. Paths already removed by an
/// earlier, broader match are skipped too, which makes repeated runs no-ops.
pub fn clean(root: &Path, patterns: &[String]) -> Result<CleanReport> {
    let mut report = CleanReport::default();

    for pattern in patterns {
        let dirs_only = pattern.ends_with('/');
        for path in expand(root, pattern)? {
            let meta = match fs::symlink_metadata(&path) {
                Ok(meta) => meta,
                Err(_) => continue,
            };

            let kind = if meta.is_dir() {
                fs::remove_dir_all(&path).map_err(|e| io_error(e, "remove directory", &path))?;
                RemovedKind::Directory
            } else if dirs_only {
                continue;
            } else {
                fs::remove_file(&path).map_err(|e| io_error(e, "remove file", &path))?;
                RemovedKind::File
            };

            let display = path.strip_prefix(root).unwrap_or(&path).display().to_string();
            match kind {
                RemovedKind::Directory => log_status!("clean", "Removed directory: {}", display),
                RemovedKind::File => log_status!("clean", "Removed file: {}", display),
            }
            report.removed.push(RemovedPath {
                path: display,
                kind,
            });
        }
    }

    Ok(report)
}

fn expand(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let trimmed = pattern.trim_end_matches('/');
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        trimmed
    );
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };

    let paths = glob::glob_with(&full, options)
        .map_err(|e| {
            Error::config_invalid_value(
                "cleanPatterns",
                Some(pattern.to_string()),
                format!("Invalid glob pattern: {}", e),
            )
        })?
        .filter_map(|entry| entry.ok())
        .collect();

    Ok(paths)
}

fn io_error(err: std::io::Error, action: &str, path: &Path) -> Error {
    Error::internal_io(err.to_string(), Some(format!("{} {}", action, path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShipwrightConfig;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn default_patterns() -> Vec<String> {
        ShipwrightConfig::default().clean_patterns
    }

    #[test]
    fn removes_build_outputs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("dist/pkg-1.0-py3-none-any.whl"));
        touch(&root.join("build/lib/pkg/__init__.py"));
        touch(&root.join("src/pkg.egg-info/PKG-INFO"));
        touch(&root.join("src/pkg/__pycache__/mod.cpython-312.pyc"));
        touch(&root.join("stray.pyc"));
        touch(&root.join("src/pkg/keep.py"));

        let report = clean(root, &default_patterns()).unwrap();

        assert!(!root.join("dist").exists());
        assert!(!root.join("build").exists());
        assert!(!root.join("src/pkg.egg-info").exists());
        assert!(!root.join("src/pkg/__pycache__").exists());
        assert!(!root.join("stray.pyc").exists());
        assert!(root.join("src/pkg/keep.py").exists());
        assert!(report
            .removed
            .iter()
            .any(|r| r.path == "stray.pyc" && r.kind == RemovedKind::File));
    }

    #[test]
    fn second_run_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("dist/pkg.tar.gz"));

        clean(dir.path(), &default_patterns()).unwrap();
        let second = clean(dir.path(), &default_patterns()).unwrap();

        assert!(second.is_empty());
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn empty_project_is_fine() {
        let dir = TempDir::new().unwrap();
        let report = clean(dir.path(), &default_patterns()).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn trailing_slash_skips_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("build"));

        let report = clean(dir.path(), &["build/".to_string()]).unwrap();

        assert!(report.is_empty());
        assert!(dir.path().join("build").is_file());
    }

    #[test]
    fn hidden_directories_are_not_searched() {
        let dir = TempDir::new().unwrap();
        let hidden = dir.path().join(".test-env/lib/__pycache__/x.pyc");
        touch(&hidden);

        clean(dir.path(), &default_patterns()).unwrap();

        assert!(hidden.exists());
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let err = clean(dir.path(), &["[".to_string()]).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }
}
