use std::path::PathBuf;

use crate::clean;
use crate::config::ShipwrightConfig;
use crate::confirm::{is_affirmative, Confirmation};
use crate::error::Result;
use crate::paths;
use crate::stage::Stage;
use crate::utils::artifact::{self, WheelInfo};
use crate::utils::command::{CommandResult, CommandRunner, ToolCommand};

use super::environment::EphemeralEnv;
use super::types::{
    InstallCheck, PipelineOutcome, PublishOutcome, StageOutput, StageRecord, WheelArtifact,
};

const PRODUCTION_REPOSITORY: &str = "pypi";

/// Release stages for one Python project.
///
/// External tools run through `runner`; the production upload asks
/// `confirmation` first. Stages run strictly one after another.
pub struct Pipeline<'a> {
    root: PathBuf,
    config: &'a ShipwrightConfig,
    runner: &'a dyn CommandRunner,
    confirmation: &'a mut dyn Confirmation,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        config: &'a ShipwrightConfig,
        runner: &'a dyn CommandRunner,
        confirmation: &'a mut dyn Confirmation,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            runner,
            confirmation,
        }
    }

    /// Run one action.
    pub fn run(&mut self, stage: Stage) -> Result<StageOutput> {
        match stage {
            Stage::Clean => Ok(StageOutput::Clean {
                report: self.clean()?,
            }),
            Stage::Build => Ok(StageOutput::Build {
                result: self.build()?,
            }),
            Stage::Check => Ok(StageOutput::Check {
                result: self.check()?,
            }),
            Stage::TestInstall => Ok(StageOutput::TestInstall {
                check: self.test_install()?,
            }),
            Stage::PublishTest => Ok(StageOutput::PublishTest {
                outcome: self.publish_test()?,
            }),
            Stage::Publish => Ok(StageOutput::Publish {
                outcome: self.publish()?,
            }),
            Stage::All => Ok(StageOutput::All {
                outcome: self.run_all()?,
            }),
        }
    }

    pub fn clean(&self) -> Result<clean::CleanReport> {
        log_status!("clean", "Cleaning build artifacts...");
        clean::clean(&self.root, &self.config.clean_patterns)
    }

    pub fn build(&self) -> Result<CommandResult> {
        log_status!("build", "Building package...");
        let command = self
            .python()
            .args(["-m", "build", "--outdir"])
            .arg(self.dist_dir().to_string_lossy());
        self.runner.run(&command)?.require_success()
    }

    pub fn check(&self) -> Result<CommandResult> {
        log_status!("check", "Checking package...");
        let command = self
            .python()
            .args(["-m", "twine", "check"])
            .arg(self.dist_glob());
        self.runner.run(&command)?.require_success()
    }

    /// Install the newest wheel into a fresh environment and smoke-test it.
    ///
    /// Returns `passed == false` without creating an environment when no
    /// wheel exists. The import and CLI checks are both attempted; their
    /// failures are recorded rather than raised. The environment is removed
    /// before this returns, whatever the outcome.
    pub fn test_install(&self) -> Result<InstallCheck> {
        log_status!("test-install", "Testing installation...");

        let wheel = match artifact::find_newest(&self.dist_dir(), &self.config.wheel_pattern)? {
            Some(wheel) => wheel,
            None => {
                let message = "No wheel file found. Run build first.";
                log_status!("test-install", "{}", message);
                return Ok(InstallCheck::missing_wheel(message));
            }
        };

        let env_dir = paths::resolve(&self.root, &self.config.test_env_dir);
        let (env, created) =
            EphemeralEnv::create(self.runner, &self.config.python, env_dir, &self.root)?;
        log_status!("test-install", "Created test environment: {}", env.dir().display());
        let mut commands = vec![created];

        let install = ToolCommand::new(env.pip().to_string_lossy())
            .arg("install")
            .arg(wheel.to_string_lossy())
            .current_dir(&self.root);
        commands.push(self.runner.run(&install)?.require_success()?);

        let import_check = ToolCommand::new(env.python().to_string_lossy())
            .arg("-c")
            .arg(format!(
                "import {}; print('Import successful')",
                self.config.package()
            ))
            .current_dir(&self.root);
        let import_ok = self.smoke_check(&import_check, &mut commands);

        let cli_check = ToolCommand::new(env.python().to_string_lossy())
            .args(["-m".to_string(), self.config.cli_module(), "--help".to_string()])
            .current_dir(&self.root);
        let cli_ok = self.smoke_check(&cli_check, &mut commands);

        drop(env);

        let passed = import_ok && cli_ok;
        let message = if passed {
            "Installation test passed!"
        } else {
            "Installation test failed!"
        };
        log_status!("test-install", "{}", message);

        Ok(InstallCheck {
            wheel: Some(WheelArtifact {
                info: WheelInfo::parse(&wheel),
                path: wheel,
            }),
            import_ok,
            cli_ok,
            passed,
            commands,
            message: message.to_string(),
        })
    }

    pub fn publish_test(&self) -> Result<PublishOutcome> {
        log_status!(
            "publish",
            "Publishing to {}...",
            self.config.test_repository
        );
        self.require_distributions()?;
        let command = self
            .python()
            .args(["-m", "twine", "upload", "--repository"])
            .arg(self.config.test_repository.as_str())
            .arg(self.dist_glob());
        let result = self.runner.run(&command)?.require_success()?;

        Ok(PublishOutcome::Published {
            repository: self.config.test_repository.clone(),
            result,
        })
    }

    /// Upload to the production index after explicit confirmation.
    ///
    /// Any answer other than the configured token cancels without running
    /// an upload. Cancelling is not an error. After a confirmation, an empty
    /// dist directory fails before anything is uploaded.
    pub fn publish(&mut self) -> Result<PublishOutcome> {
        log_status!("publish", "Publishing to PyPI...");

        let prompt = format!(
            "Are you sure you want to publish to PyPI? ({}/no): ",
            self.config.confirm_token
        );
        let answer = self.confirmation.ask(&prompt)?;
        if !is_affirmative(&answer, &self.config.confirm_token) {
            let message = "Publication cancelled.".to_string();
            log_status!("publish", "{}", message);
            return Ok(PublishOutcome::Cancelled { message });
        }

        self.require_distributions()?;
        let command = self
            .python()
            .args(["-m", "twine", "upload"])
            .arg(self.dist_glob());
        let result = self.runner.run(&command)?.require_success()?;
        log_status!("publish", "Successfully published to PyPI!");

        Ok(PublishOutcome::Published {
            repository: PRODUCTION_REPOSITORY.to_string(),
            result,
        })
    }

    /// clean → build → check → test-install. Publishing is never started here.
    pub fn run_all(&self) -> Result<PipelineOutcome> {
        log_status!("all", "Running full build and check pipeline...");
        let mut stages = Vec::with_capacity(Stage::GATED_SEQUENCE.len());

        let started_at = now();
        let report = self.clean()?;
        stages.push(StageRecord::new(
            Stage::Clean,
            started_at,
            Vec::new(),
            Some(format!("Removed {} path(s)", report.removed.len())),
        ));

        let started_at = now();
        let built = self.build()?;
        stages.push(StageRecord::new(Stage::Build, started_at, vec![built], None));

        let started_at = now();
        let checked = self.check()?;
        stages.push(StageRecord::new(Stage::Check, started_at, vec![checked], None));

        let started_at = now();
        let install = self.test_install()?;
        let ready_to_publish = install.passed;
        stages.push(StageRecord::new(
            Stage::TestInstall,
            started_at,
            install.commands,
            Some(install.message),
        ));

        let next_steps = if ready_to_publish {
            log_status!("all", "All checks passed! Ready for publishing.");
            vec![
                format!(
                    "Run 'shipwright publish-test' to test on {}",
                    self.config.test_repository
                ),
                "Run 'shipwright publish' to publish to PyPI".to_string(),
            ]
        } else {
            log_status!("all", "Tests failed. Please fix issues before publishing.");
            Vec::new()
        };

        Ok(PipelineOutcome {
            stages,
            ready_to_publish,
            next_steps,
        })
    }

    fn python(&self) -> ToolCommand {
        ToolCommand::new(self.config.python.as_str()).current_dir(&self.root)
    }

    /// Configured dist directory, expanded and resolved against the root.
    fn dist_dir(&self) -> PathBuf {
        paths::resolve(&self.root, &self.config.dist_dir)
    }

    fn require_distributions(&self) -> Result<PathBuf> {
        artifact::require_newest(&self.dist_dir(), "*")
    }

    /// Passed to twine as-is; twine expands the glob itself.
    fn dist_glob(&self) -> String {
        self.dist_dir().join("*").to_string_lossy().into_owned()
    }

    fn smoke_check(&self, command: &ToolCommand, commands: &mut Vec<CommandResult>) -> bool {
        match self.runner.run(command) {
            Ok(result) => {
                let ok = result.success;
                commands.push(result);
                ok
            }
            Err(err) => {
                log_status!("test-install", "{} failed: {}", command.display(), err);
                false
            }
        }
    }
}

fn now() -> String {
    chrono::Local::now().to_rfc3339()
}
