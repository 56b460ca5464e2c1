//! Project configuration (`shipwright.json`).
//!
//! Every field has a built-in default matching the reference project, so a
//! missing file is not an error. The import name of the package is derived
//! from `pyproject.toml` when not configured.

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths;

const FALLBACK_PACKAGE: &str = "youtube_trimmer";

/// Root configuration structure for shipwright.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipwrightConfig {
    /// Interpreter used for build, twine and venv.
    #[serde(default = "default_python")]
    pub python: String,

    /// Import name of the package, e.g. `youtube_trimmer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Module run with `-m ... --help` as the CLI smoke check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_module: Option<String>,

    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    #[serde(default = "default_test_env_dir")]
    pub test_env_dir: String,

    #[serde(default = "default_wheel_pattern")]
    pub wheel_pattern: String,

    #[serde(default = "default_clean_patterns")]
    pub clean_patterns: Vec<String>,

    /// twine repository name for `publish-test`.
    #[serde(default = "default_test_repository")]
    pub test_repository: String,

    /// Answer required before uploading to the production index.
    #[serde(default = "default_confirm_token")]
    pub confirm_token: String,

    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Settings for the tool-registration smoke test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// JSON manifest exported by the MCP server.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default = "default_expected_tools")]
    pub expected_tools: Vec<String>,

    #[serde(default = "default_install_hint")]
    pub install_hint: String,
}

impl Default for ShipwrightConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            package: None,
            cli_module: None,
            dist_dir: default_dist_dir(),
            test_env_dir: default_test_env_dir(),
            wheel_pattern: default_wheel_pattern(),
            clean_patterns: default_clean_patterns(),
            test_repository: default_test_repository(),
            confirm_token: default_confirm_token(),
            registry: RegistryConfig::default(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            expected_tools: default_expected_tools(),
            install_hint: default_install_hint(),
        }
    }
}

impl ShipwrightConfig {
    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or(FALLBACK_PACKAGE)
    }

    /// CLI module, defaulting to `<package>.cli`.
    pub fn cli_module(&self) -> String {
        self.cli_module
            .clone()
            .unwrap_or_else(|| format!("{}.cli", self.package()))
    }

    fn validate(&self) -> Result<()> {
        if self.python.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "python",
                Some(self.python.clone()),
                "Interpreter must not be empty",
            ));
        }
        if self.confirm_token.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "confirmToken",
                Some(self.confirm_token.clone()),
                "Confirmation token must not be empty",
            ));
        }
        if glob::Pattern::new(&self.wheel_pattern).is_err() {
            return Err(Error::config_invalid_value(
                "wheelPattern",
                Some(self.wheel_pattern.clone()),
                "Not a valid glob pattern",
            ));
        }
        Ok(())
    }

    fn fill_derived(mut self, root: &Path) -> Self {
        self.python = shellexpand::tilde(&self.python).into_owned();
        if self.package.is_none() {
            self.package = package_from_pyproject(root);
        }
        self
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_python() -> String {
    if cfg!(windows) {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}

fn default_dist_dir() -> String {
    "dist".to_string()
}

fn default_test_env_dir() -> String {
    ".test-env".to_string()
}

fn default_wheel_pattern() -> String {
    "*.whl".to_string()
}

fn default_clean_patterns() -> Vec<String> {
    [
        "dist/",
        "build/",
        "*.egg-info/",
        "src/*.egg-info/",
        "__pycache__/",
        "**/__pycache__/",
        "*.pyc",
        "*.pyo",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_test_repository() -> String {
    "testpypi".to_string()
}

fn default_confirm_token() -> String {
    "yes".to_string()
}

fn default_manifest() -> String {
    "tools.json".to_string()
}

fn default_expected_tools() -> Vec<String> {
    [
        "trim_youtube_video",
        "get_youtube_video_info",
        "convert_timestamp_to_seconds",
        "download_full_youtube_video",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_install_hint() -> String {
    "Make sure to install MCP dependencies: pip install -e '.[mcp]'".to_string()
}

// =============================================================================
// Loading
// =============================================================================

#[derive(Deserialize)]
struct PyProject {
    project: Option<PyProjectTable>,
}

#[derive(Deserialize)]
struct PyProjectTable {
    name: Option<String>,
}

/// Import name derived from `[project].name` in pyproject.toml.
fn package_from_pyproject(root: &Path) -> Option<String> {
    let content = fs::read_to_string(paths::pyproject(root)).ok()?;
    let pyproject: PyProject = toml::from_str(&content).ok()?;
    let name = pyproject.project?.name?;
    Some(name.to_snake_case())
}

/// Load configuration for the project at `root`.
///
/// With an explicit path the file must exist and parse. Otherwise
/// `<root>/shipwright.json` is used when present, built-in defaults when not.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<ShipwrightConfig> {
    let config = match explicit {
        Some(path) => load_from_file(path)?,
        None => {
            let path = paths::config_file(root);
            if path.exists() {
                load_from_file(&path)?
            } else {
                ShipwrightConfig::default()
            }
        }
    };

    let config = config.fill_derived(root);
    config.validate()?;
    Ok(config)
}

fn load_from_file(path: &Path) -> Result<ShipwrightConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        Error::validation_invalid_json(e, Some(format!("parse {}", path.display())))
    })
}
