use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One named unit of release work.
///
/// `All` runs the gated sequence clean → build → check → test-install.
/// Publish stages are never part of it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Clean,
    Build,
    Check,
    TestInstall,
    PublishTest,
    Publish,
    All,
}

impl Stage {
    pub const ALL_STAGES: [Stage; 7] = [
        Stage::Clean,
        Stage::Build,
        Stage::Check,
        Stage::TestInstall,
        Stage::PublishTest,
        Stage::Publish,
        Stage::All,
    ];

    /// Stages `all` runs, in order.
    pub const GATED_SEQUENCE: [Stage; 4] =
        [Stage::Clean, Stage::Build, Stage::Check, Stage::TestInstall];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::Build => "build",
            Stage::Check => "check",
            Stage::TestInstall => "test-install",
            Stage::PublishTest => "publish-test",
            Stage::Publish => "publish",
            Stage::All => "all",
        }
    }

    pub fn is_publish(&self) -> bool {
        matches!(self, Stage::PublishTest | Stage::Publish)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Stage::ALL_STAGES
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "action",
                    format!("Unknown action '{}'", s),
                    Some(s.to_string()),
                    Some(
                        Stage::ALL_STAGES
                            .iter()
                            .map(|stage| stage.as_str().to_string())
                            .collect(),
                    ),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_stage() {
        for stage in Stage::ALL_STAGES {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
    }

    #[test]
    fn rejects_unknown_stage_with_choices() {
        let err = "bogus".parse::<Stage>().unwrap_err();

        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(err.details["id"], "bogus");
        assert_eq!(err.details["tried"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn matching_is_exact() {
        assert!("Build".parse::<Stage>().is_err());
        assert!("test_install".parse::<Stage>().is_err());
    }

    #[test]
    fn gated_sequence_excludes_publish() {
        assert!(Stage::GATED_SEQUENCE.iter().all(|s| !s.is_publish()));
        assert_eq!(Stage::GATED_SEQUENCE.last(), Some(&Stage::TestInstall));
    }

    #[test]
    fn clap_names_match_cli_spelling() {
        use clap::ValueEnum;

        for stage in Stage::ALL_STAGES {
            let value = stage.to_possible_value().unwrap();
            assert_eq!(value.get_name(), stage.as_str());
        }
    }
}
