//! Explicit tool registry and the tool-registration smoke test.
//!
//! The MCP server exports the tools it registers as a JSON manifest:
//!
//! ```json
//! { "name": "youtube-trimmer", "tools": [{ "name": "trim_youtube_video", "description": "..." }] }
//! ```
//!
//! [`verify`] loads that registry and checks a fixed list of expected names
//! against it by direct lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, ErrorCode, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// First sentence of the description.
    pub fn summary(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => {
                desc.split('.').next().unwrap_or(desc).trim().to_string()
            }
            _ => "No description".to_string(),
        }
    }
}

/// Tool name to descriptor, populated at registration time.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    name: String,
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register(&mut self, tool: ToolDescriptor) -> Result<()> {
        if tool.name.trim().is_empty() {
            return Err(Error::validation_invalid_argument(
                "tools",
                "Tool name must not be empty",
                None,
                None,
            ));
        }
        if self.tools.contains_key(&tool.name) {
            return Err(Error::validation_invalid_argument(
                "tools",
                format!("Duplicate tool '{}'", tool.name),
                Some(tool.name),
                None,
            ));
        }
        self.tools.insert(tool.name.clone(), tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }
}

/// Where a registry comes from.
pub trait ToolSource {
    /// Human-readable origin, used in error details.
    fn describe(&self) -> String;

    /// Load the registry. Failing to reach the source at all is
    /// `registry.load_failed`; malformed content is reported as such.
    fn load(&self) -> Result<ToolRegistry>;
}

#[derive(Deserialize)]
struct Manifest {
    name: String,
    #[serde(default)]
    tools: Vec<ToolDescriptor>,
}

/// Registry exported by the server as a JSON manifest file.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ToolSource for ManifestSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<ToolRegistry> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::registry_load_failed(self.describe(), e.to_string()))?;

        let manifest: Manifest = serde_json::from_str(&content).map_err(|e| {
            Error::validation_invalid_json(e, Some(format!("parse {}", self.describe())))
        })?;

        let mut registry = ToolRegistry::new(manifest.name);
        for tool in manifest.tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredTool {
    pub name: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolPresence {
    pub name: String,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolCheckReport {
    pub server: String,
    pub discovered: Vec<DiscoveredTool>,
    pub expected: Vec<ToolPresence>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// Registered but not in the expected list. Non-empty means the
    /// expected list has drifted from the server.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unexpected: Vec<String>,
    pub all_present: bool,
}

/// Load the registry from `source` and report which `expected` names it has.
///
/// Missing names are reported, not treated as failure. A source that cannot
/// be loaded fails with `install_hint` attached.
pub fn verify(
    source: &dyn ToolSource,
    expected: &[String],
    install_hint: &str,
) -> Result<ToolCheckReport> {
    let registry = source.load().map_err(|err| match err.code {
        ErrorCode::RegistryLoadFailed => err.with_hint(install_hint),
        _ => err,
    })?;

    log_status!("verify", "Tool registry loaded: {}", registry.name());
    log_status!("verify", "Found {} tools", registry.len());

    let discovered: Vec<DiscoveredTool> = registry
        .tools()
        .map(|tool| {
            log_status!("verify", "  {}: {}...", tool.name, tool.summary());
            DiscoveredTool {
                name: tool.name.clone(),
                summary: tool.summary(),
            }
        })
        .collect();

    let presence: Vec<ToolPresence> = expected
        .iter()
        .map(|name| {
            let present = registry.contains(name);
            if present {
                log_status!("verify", "  found {}", name);
            } else {
                log_status!("verify", "  {} - NOT FOUND", name);
            }
            ToolPresence {
                name: name.clone(),
                present,
            }
        })
        .collect();

    let missing: Vec<String> = presence
        .iter()
        .filter(|p| !p.present)
        .map(|p| p.name.clone())
        .collect();

    let unexpected: Vec<String> = registry
        .tools()
        .filter(|tool| !expected.contains(&tool.name))
        .map(|tool| tool.name.clone())
        .collect();

    Ok(ToolCheckReport {
        server: registry.name().to_string(),
        discovered,
        all_present: missing.is_empty(),
        expected: presence,
        missing,
        unexpected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn expected() -> Vec<String> {
        vec![
            "trim_youtube_video".to_string(),
            "get_youtube_video_info".to_string(),
        ]
    }

    struct FixedSource(Result<ToolRegistry>);

    impl ToolSource for FixedSource {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        fn load(&self) -> Result<ToolRegistry> {
            self.0.clone()
        }
    }

    #[test]
    fn summary_is_first_sentence() {
        let tool = ToolDescriptor::new(
            "trim_youtube_video",
            Some("Trim a YouTube video. Downloads then cuts.".to_string()),
        );
        assert_eq!(tool.summary(), "Trim a YouTube video");
    }

    #[test]
    fn summary_without_description() {
        assert_eq!(ToolDescriptor::new("x", None).summary(), "No description");
        assert_eq!(
            ToolDescriptor::new("x", Some("  ".to_string())).summary(),
            "No description"
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new("server");
        registry.register(ToolDescriptor::new("a", None)).unwrap();

        let err = registry.register(ToolDescriptor::new("a", None)).unwrap_err();
        assert_eq!(err.details["id"], "a");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn verify_reports_missing_and_unexpected() {
        let mut registry = ToolRegistry::new("youtube-trimmer");
        registry
            .register(ToolDescriptor::new("trim_youtube_video", None))
            .unwrap();
        registry
            .register(ToolDescriptor::new("list_formats", None))
            .unwrap();

        let report = verify(&FixedSource(Ok(registry)), &expected(), "hint").unwrap();

        assert_eq!(report.server, "youtube-trimmer");
        assert!(!report.all_present);
        assert_eq!(report.missing, vec!["get_youtube_video_info".to_string()]);
        assert_eq!(report.unexpected, vec!["list_formats".to_string()]);
        assert!(report.expected[0].present);
        assert!(!report.expected[1].present);
    }

    #[test]
    fn load_failure_carries_install_hint() {
        let source = FixedSource(Err(Error::registry_load_failed("fixed", "boom")));
        let err = verify(&source, &expected(), "pip install -e '.[mcp]'").unwrap_err();

        assert_eq!(err.code.as_str(), "registry.load_failed");
        assert_eq!(err.hints[0].message, "pip install -e '.[mcp]'");
    }

    #[test]
    fn manifest_source_reads_tools() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tools.json");
        fs::write(
            &path,
            r#"{"name": "youtube-trimmer", "tools": [
                {"name": "trim_youtube_video", "description": "Trim a video."},
                {"name": "convert_timestamp_to_seconds"}
            ]}"#,
        )
        .unwrap();

        let registry = ManifestSource::new(&path).load().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("convert_timestamp_to_seconds"));
        assert_eq!(
            registry.get("trim_youtube_video").unwrap().summary(),
            "Trim a video"
        );
    }

    #[test]
    fn missing_manifest_is_a_load_failure() {
        let dir = TempDir::new().unwrap();
        let err = ManifestSource::new(dir.path().join("tools.json"))
            .load()
            .unwrap_err();
        assert_eq!(err.code.as_str(), "registry.load_failed");
    }

    #[test]
    fn malformed_manifest_is_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tools.json");
        fs::write(&path, r#"{"tools": []}"#).unwrap();

        let err = ManifestSource::new(&path).load().unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_json");
    }
}
