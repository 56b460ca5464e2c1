use serde::Serialize;
use std::path::PathBuf;

use crate::clean::CleanReport;
use crate::stage::Stage;
use crate::utils::artifact::WheelInfo;
use crate::utils::command::CommandResult;

/// One executed stage inside `all`.
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub started_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl StageRecord {
    pub(crate) fn new(
        stage: Stage,
        started_at: String,
        commands: Vec<CommandResult>,
        summary: Option<String>,
    ) -> Self {
        Self {
            stage,
            started_at,
            commands,
            summary,
        }
    }
}

/// Result of `all`: what ran, in order, and whether publishing may proceed.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub stages: Vec<StageRecord>,
    pub ready_to_publish: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,
}

/// Wheel selected for the install test.
#[derive(Debug, Clone, Serialize)]
pub struct WheelArtifact {
    pub path: PathBuf,
    #[serde(flatten)]
    pub info: Option<WheelInfo>,
}

/// Result of installing the newest wheel into a throwaway environment.
#[derive(Debug, Clone, Serialize)]
pub struct InstallCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheel: Option<WheelArtifact>,
    pub import_ok: bool,
    pub cli_ok: bool,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandResult>,
    pub message: String,
}

impl InstallCheck {
    pub(crate) fn missing_wheel(message: impl Into<String>) -> Self {
        Self {
            wheel: None,
            import_ok: false,
            cli_ok: false,
            passed: false,
            commands: Vec::new(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishOutcome {
    Published {
        repository: String,
        result: CommandResult,
    },
    Cancelled {
        message: String,
    },
}

impl PublishOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PublishOutcome::Cancelled { .. })
    }
}

/// What a single invocation produced, keyed by the action that ran.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum StageOutput {
    Clean { report: CleanReport },
    Build { result: CommandResult },
    Check { result: CommandResult },
    TestInstall { check: InstallCheck },
    PublishTest { outcome: PublishOutcome },
    Publish { outcome: PublishOutcome },
    All { outcome: PipelineOutcome },
}

impl StageOutput {
    /// Process exit code: 1 when an install gate failed, 0 otherwise.
    ///
    /// Failed tool invocations never reach here; they surface as errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            StageOutput::TestInstall { check } if !check.passed => 1,
            StageOutput::All { outcome } if !outcome.ready_to_publish => 1,
            _ => 0,
        }
    }
}
