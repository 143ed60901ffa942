//! The deployment driver: cross-build, locate, transfer, and an optional
//! remote command.
//!
//! Every external invocation is checked and short-circuits the pipeline on
//! failure. Nothing is retried and nothing is rolled back.

use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use shell_escape::unix::escape;
use thiserror::Error;

use crate::artifact::ensure_artifact;
use crate::command::{
    CommandOutput, CommandRunner, StreamingCommandRunner, display_command,
};
use crate::config::DeployConfig;
use crate::destination::Destination;
use crate::error::{DeployError, DeployStep, TransferError};
use crate::ssh::SshClient;

mod state;

pub use state::{DeployEvent, DeployState};

/// Command run on the destination host after a successful transfer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteCommand(String);

impl RemoteCommand {
    /// Wraps a command line that is passed to the remote shell verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Usage`] when the command is blank.
    pub fn new(command: &str) -> Result<Self, DeployError> {
        let trimmed = command.trim();
        if trimmed.is_empty() {
            return Err(DeployError::usage("remote command must not be empty"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Builds a command line from separate arguments, shell-escaping each.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Usage`] when `args` is empty or any argument
    /// contains ASCII control characters.
    pub fn from_args(args: &[String]) -> Result<Self, DeployError> {
        if args.is_empty() {
            return Err(DeployError::usage("remote command must not be empty"));
        }
        if args
            .iter()
            .any(|arg| arg.chars().any(|ch| ch.is_ascii_control()))
        {
            return Err(DeployError::usage(concat!(
                "remote command arguments must not contain control characters (ASCII ",
                "0x00-0x1F or 0x7F, e.g. newline, carriage return, tab, NUL)"
            )));
        }

        let rendered = args
            .iter()
            .map(|arg| escape(arg.as_str().into()).into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Self(rendered))
    }

    /// The command line as sent to the remote shell.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Summary of a completed deployment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeployReport {
    /// Conventional path of the artefact that was copied.
    pub artifact: Utf8PathBuf,
    /// Destination the artefact was copied to.
    pub destination: Destination,
    /// Final pipeline state; always [`DeployState::Transferred`].
    pub state: DeployState,
    /// Output of the remote command, when one was configured.
    pub remote: Option<CommandOutput>,
}

/// A deployment that stopped early, with the state the pipeline reached.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{error}")]
pub struct DeployFailure {
    /// [`DeployState::Failed`] naming the step that failed, or
    /// [`DeployState::Transferred`] when only the remote command failed.
    pub state: DeployState,
    /// What went wrong.
    pub error: DeployError,
}

impl DeployFailure {
    /// Step at which the pipeline stopped.
    #[must_use]
    pub const fn step(&self) -> DeployStep {
        self.error.step()
    }

    /// Process exit status for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }
}

/// Runs the build → transfer pipeline for one configuration.
#[derive(Clone, Debug)]
pub struct Deployer<R: CommandRunner> {
    config: DeployConfig,
    runner: R,
    workspace: Utf8PathBuf,
    remote_command: Option<RemoteCommand>,
}

impl Deployer<StreamingCommandRunner> {
    /// Convenience constructor that streams tool output to the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidConfig`] when validation fails.
    pub fn with_streaming_runner(
        config: DeployConfig,
        workspace: Utf8PathBuf,
    ) -> Result<Self, DeployError> {
        Self::new(config, StreamingCommandRunner, workspace)
    }
}

impl<R: CommandRunner> Deployer<R> {
    /// Creates a driver for `config`, running tools through `runner`.
    ///
    /// `workspace` is the directory the build runs in; relative artefact
    /// paths are resolved against it.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidConfig`] when configuration validation
    /// fails.
    pub fn new(
        config: DeployConfig,
        runner: R,
        workspace: Utf8PathBuf,
    ) -> Result<Self, DeployError> {
        config.validate()?;
        let remote_command = config
            .remote_command
            .as_deref()
            .map(RemoteCommand::new)
            .transpose()?;
        Ok(Self {
            config,
            runner,
            workspace,
            remote_command,
        })
    }

    /// Replaces the configured remote command. `None` disables the step.
    #[must_use]
    pub fn with_remote_command(mut self, remote_command: Option<RemoteCommand>) -> Self {
        self.remote_command = remote_command;
        self
    }

    /// Conventional artefact path for the configured triple and profile.
    #[must_use]
    pub fn artifact_path(&self) -> Utf8PathBuf {
        self.config.artifact_path()
    }

    /// Runs the whole pipeline against `destination`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeployFailure`] carrying the state the pipeline reached.
    /// A remote command enabled for a local destination fails with
    /// [`DeployError::Usage`] before anything runs; otherwise the error is the
    /// one the first failing step reports.
    pub fn deploy(&self, destination: &Destination) -> Result<DeployReport, DeployFailure> {
        let building = DeployState::Building;
        debug!("deploy state: {building:?}");

        let remote_host = match self.remote_host(destination) {
            Ok(host) => host,
            Err(err) => return Err(fail(building, err)),
        };

        let artifact = match self.build() {
            Ok(artifact) => artifact,
            Err(err) => return Err(fail(building, err)),
        };
        let built = transition(building, DeployEvent::BuildSucceeded(artifact.clone()));

        if let Err(err) = self.transfer(&artifact, destination) {
            return Err(fail(built, err));
        }
        let state = transition(built, DeployEvent::TransferSucceeded);

        let remote = match (remote_host, &self.remote_command) {
            (Some(host), Some(command)) => match self.remote_execute(&host, command) {
                Ok(output) => Some(output),
                Err(err) => return Err(fail(state, err)),
            },
            _ => None,
        };

        Ok(DeployReport {
            artifact,
            destination: destination.clone(),
            state,
            remote,
        })
    }

    /// Cross-compiles the artefact and returns its conventional path.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Build`] when the build tool cannot be spawned
    /// or exits non-zero.
    pub fn build(&self) -> Result<Utf8PathBuf, DeployError> {
        let program = self.config.build_bin.as_str();
        let args = self.build_args();
        info!(
            "compiling {} for {} ({} profile)",
            self.config.artifact_name,
            self.config.target_triple,
            self.config.build_profile()
        );
        debug!("running {}", display_command(program, &args));

        self.runner
            .run(program, &args)
            .and_then(|output| output.into_result(program))
            .map_err(DeployError::Build)?;

        Ok(self.artifact_path())
    }

    /// Copies `artifact` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Transfer`] when the artefact is missing, or the
    /// transfer tool cannot be spawned or exits non-zero.
    pub fn transfer(
        &self,
        artifact: &Utf8Path,
        destination: &Destination,
    ) -> Result<(), DeployError> {
        ensure_artifact(&self.workspace, artifact).map_err(DeployError::Transfer)?;

        let program = self.config.transfer_bin.as_str();
        let args = self.transfer_args(artifact, destination);
        info!("copying {artifact} to {destination}");
        debug!("running {}", display_command(program, &args));

        self.runner
            .run(program, &args)
            .and_then(|output| output.into_result(program))
            .map_err(|err| DeployError::Transfer(TransferError::Command(err)))?;

        Ok(())
    }

    /// Runs `command` on `host` over SSH.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Remote`] when the SSH client cannot be spawned,
    /// or the remote command exits non-zero or without a status.
    pub fn remote_execute(
        &self,
        host: &str,
        command: &RemoteCommand,
    ) -> Result<CommandOutput, DeployError> {
        let program = self.config.ssh_bin.as_str();
        let args = self.remote_args(host, command);
        info!("running remote command on {host}");
        debug!("running {}", display_command(program, &args));

        self.runner
            .run(program, &args)
            .and_then(|output| output.into_result(program))
            .map_err(DeployError::Remote)
    }

    fn remote_host(&self, destination: &Destination) -> Result<Option<String>, DeployError> {
        if self.remote_command.is_none() {
            return Ok(None);
        }
        destination.remote_host().map(Some).ok_or_else(|| {
            DeployError::usage(format!(
                "remote command requires a remote destination ([user@]host:path), got {destination}"
            ))
        })
    }

    fn build_args(&self) -> Vec<OsString> {
        let mut args = vec![
            OsString::from(&self.config.build_subcommand),
            OsString::from("--target"),
            OsString::from(&self.config.target_triple),
        ];
        args.extend(self.config.build_profile().cargo_args());

        if let Some(ref package) = self.config.package {
            args.push(OsString::from("--package"));
            args.push(OsString::from(package));
        }

        if self.config.select_bin {
            args.push(OsString::from("--bin"));
            args.push(OsString::from(&self.config.artifact_name));
        }

        args
    }

    fn transfer_args(&self, artifact: &Utf8Path, destination: &Destination) -> Vec<OsString> {
        let mut args = self.transfer_options();
        args.push(OsString::from(artifact.as_str()));
        args.push(OsString::from(destination.as_str()));
        args
    }

    fn transfer_options(&self) -> Vec<OsString> {
        // SSH flags mean nothing to a non-scp transfer tool (`cp`, `rsync`).
        if is_scp(&self.config.transfer_bin) {
            self.config.ssh_options().to_args(SshClient::Scp)
        } else {
            Vec::new()
        }
    }

    fn remote_args(&self, host: &str, command: &RemoteCommand) -> Vec<OsString> {
        let mut args = self.config.ssh_options().to_args(SshClient::Ssh);
        args.push(OsString::from(host));
        args.push(OsString::from(command.as_str()));
        args
    }
}

fn is_scp(program: &str) -> bool {
    Utf8Path::new(program).file_name() == Some("scp")
}

fn transition(state: DeployState, event: DeployEvent) -> DeployState {
    let next = state.advance(event);
    debug!("deploy state: {next:?}");
    next
}

fn fail(state: DeployState, error: DeployError) -> DeployFailure {
    DeployFailure {
        state: transition(state, DeployEvent::StepFailed(error.step())),
        error,
    }
}

#[cfg(test)]
mod tests;
