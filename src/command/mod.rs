//! External command execution behind a swappable runner.
//!
//! Every step of the deployment shells out to a system tool. The
//! [`CommandRunner`] trait is the seam that lets tests substitute scripted
//! outcomes for real processes.

use std::ffi::OsString;
use std::process::Command;

use thiserror::Error;

mod streaming;

pub use streaming::StreamingCommandRunner;

/// Result of running an external command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandOutput {
    /// Exit code reported by the process, if available.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Converts a non-zero or missing exit status into a [`CommandError`].
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Failure`] when the process exited with a
    /// non-zero code, or [`CommandError::MissingExitCode`] when it was
    /// terminated without one (for example, by a signal).
    pub fn into_result(self, program: &str) -> Result<Self, CommandError> {
        match self.code {
            Some(0) => Ok(self),
            Some(code) => Err(CommandError::Failure {
                program: program.to_owned(),
                status: code,
                stderr: self.stderr,
            }),
            None => Err(CommandError::MissingExitCode {
                program: program.to_owned(),
            }),
        }
    }
}

/// Errors raised while running an external tool.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CommandError {
    /// Raised when a command cannot be spawned.
    #[error("failed to spawn {program}: {message}")]
    Spawn {
        /// Command that failed to start.
        program: String,
        /// Operating system error string.
        message: String,
    },
    /// Raised when the command completes with a non-zero exit code.
    #[error("{program} exited with status {status}")]
    Failure {
        /// Command name used for the attempted operation.
        program: String,
        /// Exit status as reported by the OS.
        status: i32,
        /// Stderr captured from the process.
        stderr: String,
    },
    /// Raised when the command finishes without yielding an exit status.
    #[error("{program} terminated without an exit status")]
    MissingExitCode {
        /// Command that completed without a status.
        program: String,
    },
}

impl CommandError {
    /// Process exit code that mirrors this failure.
    ///
    /// A tool that exited non-zero hands its own status through; every other
    /// failure maps to `1`.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Failure { status, .. } if *status != 0 => *status,
            _ => 1,
        }
    }
}

/// Abstraction over command execution to support fakes in tests.
pub trait CommandRunner {
    /// Runs `program` with the given arguments, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Spawn`] if the command cannot be started.
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, CommandError>;
}

/// Real command runner that shells out and captures output silently.
#[derive(Clone, Debug, Default)]
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, CommandError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|err| spawn_error(program, &err))?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

pub(crate) fn spawn_error(program: &str, err: &std::io::Error) -> CommandError {
    CommandError::Spawn {
        program: program.to_owned(),
        message: err.to_string(),
    }
}

/// Renders a program and its arguments as a single line for logging.
#[must_use]
pub fn display_command(program: &str, args: &[OsString]) -> String {
    let mut rendered = String::from(program);
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
