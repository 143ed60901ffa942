//! Core library for the `crossdeploy` tool.
//!
//! The crate drives a fixed, fail-fast pipeline: cross-compile a binary for a
//! target triple with an external toolchain (`cross` by default), locate the
//! artefact at its conventional path, and copy it to a destination with an
//! external transfer tool (`scp` by default). An optional remote command can
//! run on the destination host afterwards.

pub mod artifact;
pub mod command;
pub mod config;
pub mod deploy;
pub mod destination;
pub mod error;
pub mod ssh;
pub mod test_support;

pub use artifact::{BuildProfile, artifact_path};
pub use command::{
    CommandError, CommandOutput, CommandRunner, ProcessCommandRunner, StreamingCommandRunner,
};
pub use config::{ConfigLoadError, DeployConfig};
pub use deploy::{DeployFailure, DeployReport, DeployState, Deployer, RemoteCommand};
pub use destination::Destination;
pub use error::{DeployError, DeployStep, TransferError};
