//! External command execution behind a swappable runner.
//!
//! Every tool the pipeline shells out to (build, twine, venv, pip) goes
//! through [`CommandRunner`], so the pipeline can be driven against a
//! recording fake in tests.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::error::{Error, Result, ToolCommandFailedDetails};
use crate::utils::shell;

/// A program invocation: program, arguments and optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Shell-quoted rendering, used for status lines and error details.
    pub fn display(&self) -> String {
        shell::quote_command(&self.program, &self.args)
    }

    fn to_std(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Output kept on a result. Only set when the process could not be spawned.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CapturedOutput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new(stdout: String, stderr: String) -> Self {
        Self { stdout, stderr }
    }
}

/// Exit status and optional captured output of one invoked process.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub command: String,
    pub exit_code: i32,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CapturedOutput>,
}

impl CommandResult {
    pub fn new(command: &ToolCommand, exit_code: i32, output: Option<CapturedOutput>) -> Self {
        Self {
            command: command.display(),
            exit_code,
            success: exit_code == 0,
            output,
        }
    }

    fn spawn_failed(command: &ToolCommand, err: &io::Error) -> Self {
        Self::new(
            command,
            -1,
            Some(CapturedOutput::new(
                String::new(),
                format!("Command error: {}", err),
            )),
        )
    }

    /// Turn a non-zero exit into a `tool.command_failed` error.
    pub fn require_success(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }

        let stderr = self
            .output
            .as_ref()
            .map(|o| {
                if o.stderr.is_empty() {
                    o.stdout.clone()
                } else {
                    o.stderr.clone()
                }
            })
            .unwrap_or_default();

        Err(Error::tool_command_failed(ToolCommandFailedDetails {
            command: self.command,
            exit_code: self.exit_code,
            stderr,
        }))
    }
}

/// Runs external commands to completion, one at a time.
pub trait CommandRunner {
    fn run(&self, command: &ToolCommand) -> Result<CommandResult>;
}

/// Runs commands with their output streamed to the user's terminal.
///
/// Child stdout is redirected to our stderr so stdout stays reserved for
/// the JSON response.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<CommandResult> {
        log_status!("run", "Running: {}", command.display());

        let status = command
            .to_std()
            .stdin(Stdio::inherit())
            .stdout(Stdio::from(io::stderr()))
            .stderr(Stdio::inherit())
            .status();

        match status {
            Ok(status) => Ok(CommandResult::new(command, status.code().unwrap_or(-1), None)),
            Err(e) => Ok(CommandResult::spawn_failed(command, &e)),
        }
    }
}
