//! Command-line interface definitions for the `crossdeploy` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `crossdeploy` binary.
#[derive(Debug, Parser)]
#[command(
    name = "crossdeploy",
    version,
    about = "Cross-compile a binary and copy it to a remote host",
    after_help = concat!(
        "Settings not given as flags are read from CROSSDEPLOY_* environment ",
        "variables or crossdeploy.toml."
    )
)]
pub(crate) struct Cli {
    /// Where to copy the artefact, e.g. `user@host:/opt/chess`.
    ///
    /// Falls back to the `destination` configuration value.
    #[arg(value_name = "DESTINATION")]
    pub(crate) destination: Option<String>,
    /// Override the target triple for this run.
    #[arg(long = "target", value_name = "TRIPLE")]
    pub(crate) target_triple: Option<String>,
    /// Override the Cargo profile for this run.
    #[arg(long, value_name = "NAME")]
    pub(crate) profile: Option<String>,
    /// Override the artefact (binary) name for this run.
    #[arg(long = "artifact", value_name = "NAME")]
    pub(crate) artifact_name: Option<String>,
    /// Override the build tool executable for this run (`cross`, `cargo`).
    #[arg(long = "build-tool", value_name = "BIN")]
    pub(crate) build_bin: Option<String>,
    /// Print the artefact path and exit without building.
    #[arg(long)]
    pub(crate) locate: bool,
    /// Command to run on the destination host after the transfer (use -- to
    /// separate it from crossdeploy's own flags).
    #[arg(last = true, value_name = "REMOTE_COMMAND")]
    pub(crate) remote_command: Vec<String>,
}
