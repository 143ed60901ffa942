//! Deployment configuration loaded via `ortho-config`.
//!
//! Values merge compiled-in defaults, `crossdeploy.toml`, and `CROSSDEPLOY_*`
//! environment variables. The binary applies command-line overrides on top.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::artifact::{BuildProfile, artifact_path};
use crate::error::DeployError;
use crate::ssh::SshOptions;

/// Target triple used when none is configured.
pub const DEFAULT_TARGET_TRIPLE: &str = "aarch64-unknown-linux-gnu";

/// Artefact (binary) name used when none is configured.
pub const DEFAULT_ARTIFACT_NAME: &str = "chess";

/// Build profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "release";

/// Cargo target directory relative to the workspace root.
pub const DEFAULT_TARGET_DIR: &str = "./target";

/// Cross-compilation wrapper invoked for the build step.
pub const DEFAULT_BUILD_BIN: &str = "cross";

/// Tool used to copy the artefact.
pub const DEFAULT_TRANSFER_BIN: &str = "scp";

/// Client used for the optional remote command.
pub const DEFAULT_SSH_BIN: &str = "ssh";

/// Build, transfer and remote-execution settings.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "CROSSDEPLOY",
    discovery(
        app_name = "crossdeploy",
        env_var = "CROSSDEPLOY_CONFIG_PATH",
        config_file_name = "crossdeploy.toml",
        dotfile_name = ".crossdeploy.toml",
        project_file_name = "crossdeploy.toml"
    )
)]
pub struct DeployConfig {
    /// Target triple passed to the build tool's `--target` flag.
    #[ortho_config(default = DEFAULT_TARGET_TRIPLE.to_owned())]
    pub target_triple: String,
    /// Name of the binary produced by the build.
    #[ortho_config(default = DEFAULT_ARTIFACT_NAME.to_owned())]
    pub artifact_name: String,
    /// Cargo profile name (`release`, `dev`, or a custom profile).
    #[ortho_config(default = DEFAULT_PROFILE.to_owned())]
    pub profile: String,
    /// Cargo target directory; the artefact path is derived from it.
    #[ortho_config(default = DEFAULT_TARGET_DIR.to_owned())]
    pub target_dir: String,
    /// Build tool executable (`cross`, `cargo`, ...).
    #[ortho_config(default = DEFAULT_BUILD_BIN.to_owned())]
    pub build_bin: String,
    /// Subcommand passed to the build tool (`build`, `zigbuild`, ...).
    #[ortho_config(default = "build".to_owned())]
    pub build_subcommand: String,
    /// Workspace package to build (`--package`); builds the default package
    /// when unset.
    pub package: Option<String>,
    /// Restricts the build to the artefact binary (`--bin <artifact_name>`).
    #[ortho_config(default = false)]
    pub select_bin: bool,
    /// Transfer tool executable.
    #[ortho_config(default = DEFAULT_TRANSFER_BIN.to_owned())]
    pub transfer_bin: String,
    /// SSH client used for the remote command.
    #[ortho_config(default = DEFAULT_SSH_BIN.to_owned())]
    pub ssh_bin: String,
    /// SSH port override shared by transfer and remote execution.
    pub ssh_port: Option<u16>,
    /// Private key for transfer and remote execution. Supports `~/`.
    pub ssh_identity_file: Option<String>,
    /// Whether to force `BatchMode=yes` so missing keys fail instead of
    /// prompting.
    #[ortho_config(default = false)]
    pub ssh_batch_mode: bool,
    /// Destination used when none is given on the command line.
    pub destination: Option<String>,
    /// Command run on the destination host after a successful transfer.
    /// Remote execution is disabled when unset.
    pub remote_command: Option<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            target_triple: DEFAULT_TARGET_TRIPLE.to_owned(),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            target_dir: DEFAULT_TARGET_DIR.to_owned(),
            build_bin: DEFAULT_BUILD_BIN.to_owned(),
            build_subcommand: String::from("build"),
            package: None,
            select_bin: false,
            transfer_bin: DEFAULT_TRANSFER_BIN.to_owned(),
            ssh_bin: DEFAULT_SSH_BIN.to_owned(),
            ssh_port: None,
            ssh_identity_file: None,
            ssh_batch_mode: false,
            destination: None,
            remote_command: None,
        }
    }
}

/// Errors raised when loading configuration from layered sources.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigLoadError {
    /// Indicates that parsing or merging configuration layers failed.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl DeployConfig {
    /// Loads configuration from defaults, configuration files and environment
    /// variables, without parsing process arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::Parse`] when merging sources fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigLoadError> {
        Self::load_from_iter([std::ffi::OsString::from("crossdeploy")])
            .map_err(|err| ConfigLoadError::Parse(err.to_string()))
    }

    /// Ensures required values are present after trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidConfig`] naming the first empty field.
    pub fn validate(&self) -> Result<(), DeployError> {
        Self::require_value(&self.target_triple, "target_triple")?;
        Self::require_value(&self.artifact_name, "artifact_name")?;
        Self::require_value(&self.profile, "profile")?;
        Self::require_value(&self.target_dir, "target_dir")?;
        Self::require_value(&self.build_bin, "build_bin")?;
        Self::require_value(&self.build_subcommand, "build_subcommand")?;
        Self::require_optional_value(self.package.as_deref(), "package")?;
        Self::require_value(&self.transfer_bin, "transfer_bin")?;
        Self::require_value(&self.ssh_bin, "ssh_bin")?;
        Self::require_optional_value(self.ssh_identity_file.as_deref(), "ssh_identity_file")?;
        Self::require_optional_value(self.remote_command.as_deref(), "remote_command")?;
        Ok(())
    }

    /// Parsed build profile.
    #[must_use]
    pub fn build_profile(&self) -> BuildProfile {
        BuildProfile::from_name(&self.profile)
    }

    /// Conventional path of the artefact for this configuration.
    #[must_use]
    pub fn artifact_path(&self) -> Utf8PathBuf {
        artifact_path(
            Utf8PathBuf::from(&self.target_dir).as_path(),
            &self.target_triple,
            &self.build_profile(),
            &self.artifact_name,
        )
    }

    /// SSH options shared by the transfer and remote steps.
    #[must_use]
    pub fn ssh_options(&self) -> SshOptions {
        SshOptions {
            port: self.ssh_port,
            identity_file: self.ssh_identity_file.clone(),
            batch_mode: self.ssh_batch_mode,
        }
    }

    fn require_optional_value(value: Option<&str>, field: &str) -> Result<(), DeployError> {
        match value {
            None => Ok(()),
            Some(v) if !v.trim().is_empty() => Ok(()),
            Some(_) => Err(DeployError::InvalidConfig {
                field: field.to_owned(),
            }),
        }
    }

    fn require_value(value: &str, field: &str) -> Result<(), DeployError> {
        Self::require_optional_value(Some(value), field)
    }
}
