//! Error taxonomy for the deployment pipeline.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::command::CommandError;

/// Pipeline step that an error belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeployStep {
    /// Input and configuration checks before any tool runs.
    Validate,
    /// Cross-compilation of the artefact.
    Build,
    /// Copying the artefact to its destination.
    Transfer,
    /// Optional command run on the destination host.
    RemoteExecute,
}

/// Errors raised while copying the artefact.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TransferError {
    /// The build reported success but the artefact is not where it should be.
    #[error("artifact missing after build: {path}")]
    MissingArtifact {
        /// Conventional artefact path that was checked.
        path: Utf8PathBuf,
    },
    /// The transfer tool failed to start or exited non-zero.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Errors surfaced by the deployment driver.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DeployError {
    /// Missing or malformed caller input. No step has run.
    #[error("usage error: {message}")]
    Usage {
        /// Description of the problem.
        message: String,
    },
    /// Raised when configuration is missing a required value. The message
    /// names the environment variable and configuration file key to set.
    #[error(
        "missing {field}: set CROSSDEPLOY_{env_suffix} or add {field} to crossdeploy.toml",
        env_suffix = field.to_uppercase()
    )]
    InvalidConfig {
        /// Configuration field that failed validation.
        field: String,
    },
    /// The build toolchain failed; nothing was transferred.
    #[error("build failed: {0}")]
    Build(#[source] CommandError),
    /// The artefact could not be copied to the destination.
    #[error("transfer failed: {0}")]
    Transfer(#[source] TransferError),
    /// The optional remote command failed after a successful transfer.
    #[error("remote command failed: {0}")]
    Remote(#[source] CommandError),
}

impl DeployError {
    /// Builds a [`DeployError::Usage`] from any message.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Step at which the pipeline stopped.
    #[must_use]
    pub const fn step(&self) -> DeployStep {
        match self {
            Self::Usage { .. } | Self::InvalidConfig { .. } => DeployStep::Validate,
            Self::Build(_) => DeployStep::Build,
            Self::Transfer(_) => DeployStep::Transfer,
            Self::Remote(_) => DeployStep::RemoteExecute,
        }
    }

    /// Process exit status for this failure.
    ///
    /// Usage and configuration errors exit with `2`. Tool failures pass the
    /// tool's own non-zero status through, falling back to `1`.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } | Self::InvalidConfig { .. } => 2,
            Self::Build(err) | Self::Remote(err) | Self::Transfer(TransferError::Command(err)) => {
                err.exit_code()
            }
            Self::Transfer(TransferError::MissingArtifact { .. }) => 1,
        }
    }
}
