use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidValue,

    ValidationInvalidArgument,
    ValidationInvalidJson,

    ArtifactNotFound,
    RegistryLoadFailed,

    ToolCommandFailed,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",

            ErrorCode::ArtifactNotFound => "artifact.not_found",
            ErrorCode::RegistryLoadFailed => "registry.load_failed",

            ErrorCode::ToolCommandFailed => "tool.command_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactNotFoundDetails {
    pub pattern: String,
    pub dir: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCommandFailedDetails {
    pub command: String,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn validation_invalid_json(err: impl std::fmt::Display, context: Option<String>) -> Self {
        let details = serde_json::json!({
            "error": err.to_string(),
            "context": context,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn artifact_not_found(pattern: impl Into<String>, dir: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let message = format!("No files matching {} found. Run build first.", pattern);
        let details = to_details(ArtifactNotFoundDetails {
            pattern,
            dir: dir.into(),
        });

        Self::new(ErrorCode::ArtifactNotFound, message, details)
            .with_hint("Run 'shipwright build' to produce distributions")
    }

    pub fn registry_load_failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::RegistryLoadFailed,
            "Failed to load tool registry",
            serde_json::json!({
                "source": source.into(),
                "error": error.into(),
            }),
        )
    }

    pub fn tool_command_failed(details: ToolCommandFailedDetails) -> Self {
        let message = format!(
            "Command '{}' exited with status {}",
            details.command, details.exit_code
        );
        Self::new(ErrorCode::ToolCommandFailed, message, to_details(details))
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            serde_json::json!({ "error": error.into(), "context": context }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_command_failed_message_names_command_and_status() {
        let err = Error::tool_command_failed(ToolCommandFailedDetails {
            command: "python3 -m build".to_string(),
            exit_code: 1,
            stderr: String::new(),
        });

        assert_eq!(err.code, ErrorCode::ToolCommandFailed);
        assert_eq!(err.message, "Command 'python3 -m build' exited with status 1");
        assert_eq!(err.details["exitCode"], 1);
        assert!(err.details.get("stderr").is_none());
    }

    #[test]
    fn artifact_not_found_carries_build_hint() {
        let err = Error::artifact_not_found("*.whl", "dist");

        assert_eq!(err.code.as_str(), "artifact.not_found");
        assert_eq!(err.hints.len(), 1);
        assert!(err.hints[0].message.contains("shipwright build"));
    }

    #[test]
    fn invalid_argument_omits_empty_optionals() {
        let err = Error::validation_invalid_argument("stage", "Unknown stage", None, None);

        assert_eq!(err.details["field"], "stage");
        assert!(err.details.get("id").is_none());
        assert!(err.details.get("tried").is_none());
    }
}
