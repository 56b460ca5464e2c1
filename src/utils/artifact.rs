//! Built artifact lookup: newest match wins.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

/// Find the most recently modified file in `dir` matching `pattern`.
///
/// Directories that happen to match are ignored. Returns `Ok(None)` when the
/// directory is missing or nothing matches.
pub fn find_newest(dir: &Path, pattern: &str) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let full_pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );

    let entries: Vec<PathBuf> = glob::glob(&full_pattern)
        .map_err(|e| {
            Error::validation_invalid_argument(
                "wheel_pattern",
                format!("Invalid glob pattern '{}': {}", pattern, e),
                Some(pattern.to_string()),
                None,
            )
        })?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();

    let newest = entries
        .into_iter()
        .max_by_key(|p| p.metadata().and_then(|m| m.modified()).ok());

    if let Some(path) = &newest {
        log_status!("artifact", "Resolved '{}' -> '{}'", pattern, path.display());
    }

    Ok(newest)
}

/// Like [`find_newest`], but a missing artifact is an `artifact.not_found` error.
pub fn require_newest(dir: &Path, pattern: &str) -> Result<PathBuf> {
    find_newest(dir, pattern)?
        .ok_or_else(|| Error::artifact_not_found(pattern, dir.display().to_string()))
}

/// Distribution name and version parsed from a wheel filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WheelInfo {
    pub distribution: String,
    pub version: String,
    pub python_tag: String,
    pub platform_tag: String,
}

impl WheelInfo {
    /// Parse `{dist}-{version}(-{build})?-{python}-{abi}-{platform}.whl`.
    pub fn parse(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let re = Regex::new(
            r"^(?P<dist>[A-Za-z0-9_.]+)-(?P<version>[A-Za-z0-9_.!+]+)(?:-\d[A-Za-z0-9_.]*)?-(?P<py>[^-]+)-[^-]+-(?P<plat>[^-]+)\.whl$",
        )
        .ok()?;
        let caps = re.captures(file_name)?;

        Some(Self {
            distribution: caps["dist"].to_string(),
            version: caps["version"].to_string(),
            python_tag: caps["py"].to_string(),
            platform_tag: caps["plat"].to_string(),
        })
    }
}
