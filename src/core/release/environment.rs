use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths;
use crate::utils::command::{CommandResult, CommandRunner, ToolCommand};

/// Throwaway virtual environment used for the install test.
///
/// The directory is removed when the value is dropped, on every exit path
/// including early returns through `?`.
#[derive(Debug)]
pub(crate) struct EphemeralEnv {
    dir: PathBuf,
}

impl EphemeralEnv {
    /// Create the environment with `<python> -m venv <dir>`.
    ///
    /// A leftover directory from an interrupted run is removed first. If venv
    /// creation fails, whatever it left behind is removed as well.
    pub(crate) fn create(
        runner: &dyn CommandRunner,
        python: &str,
        dir: PathBuf,
        cwd: &Path,
    ) -> Result<(Self, CommandResult)> {
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("remove stale {}", dir.display())))
            })?;
        }

        let env = Self { dir };
        let command = ToolCommand::new(python)
            .args(["-m", "venv"])
            .arg(env.dir.to_string_lossy())
            .current_dir(cwd);
        let result = runner.run(&command)?.require_success()?;

        Ok((env, result))
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn python(&self) -> PathBuf {
        paths::venv_executable(&self.dir, "python")
    }

    pub(crate) fn pip(&self) -> PathBuf {
        paths::venv_executable(&self.dir, "pip")
    }
}

impl Drop for EphemeralEnv {
    fn drop(&mut self) {
        if !self.dir.exists() {
            return;
        }
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => log_status!("test-install", "Removed {}", self.dir.display()),
            Err(e) => log_status!(
                "test-install",
                "Failed to remove {}: {}",
                self.dir.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct VenvRunner {
        exit_code: i32,
    }

    impl CommandRunner for VenvRunner {
        fn run(&self, command: &ToolCommand) -> Result<CommandResult> {
            let target = PathBuf::from(command.args.last().unwrap());
            fs::create_dir_all(target.join("bin")).unwrap();
            Ok(CommandResult::new(command, self.exit_code, None))
        }
    }

    #[test]
    fn drop_removes_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join(".test-env");

        let (env, result) =
            EphemeralEnv::create(&VenvRunner { exit_code: 0 }, "python3", dir.clone(), root.path())
                .unwrap();
        assert!(result.success);
        assert!(env.dir().exists());
        assert_eq!(env.pip(), paths::venv_executable(&dir, "pip"));

        drop(env);
        assert!(!dir.exists());
    }

    #[test]
    fn failed_creation_leaves_nothing_behind() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join(".test-env");

        let err =
            EphemeralEnv::create(&VenvRunner { exit_code: 1 }, "python3", dir.clone(), root.path())
                .unwrap_err();

        assert_eq!(err.code.as_str(), "tool.command_failed");
        assert!(!dir.exists());
    }

    #[test]
    fn stale_directory_is_replaced() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join(".test-env");
        fs::create_dir_all(dir.join("leftover")).unwrap();

        let (env, _) =
            EphemeralEnv::create(&VenvRunner { exit_code: 0 }, "python3", dir.clone(), root.path())
                .unwrap();

        assert!(!dir.join("leftover").exists());
        drop(env);
    }
}
