//! Deterministic artefact paths and post-build existence checks.
//!
//! Cargo (and wrappers such as `cross` or `cargo zigbuild`) place
//! cross-compiled binaries at `<target-dir>/<triple>/<profile-dir>/<name>`.
//! The path is a pure function of those inputs, so the driver computes it
//! rather than asking the toolchain.

use std::ffi::OsString;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::error::TransferError;

/// Cargo build profile selected for the cross-build.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildProfile {
    /// Optimised build (`--release`).
    Release,
    /// Default development profile (no profile flag).
    Dev,
    /// Named custom profile (`--profile <name>`).
    Custom(String),
}

impl BuildProfile {
    /// Parses a profile name as written in configuration.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "release" => Self::Release,
            "dev" | "debug" => Self::Dev,
            other => Self::Custom(other.to_owned()),
        }
    }

    /// Directory under `<target-dir>/<triple>/` that holds this profile's
    /// output.
    #[must_use]
    pub fn output_dir(&self) -> &str {
        match self {
            Self::Release => "release",
            Self::Dev => "debug",
            Self::Custom(name) => match name.as_str() {
                "test" => "debug",
                "bench" => "release",
                other => other,
            },
        }
    }

    /// Command-line flags that select this profile.
    #[must_use]
    pub fn cargo_args(&self) -> Vec<OsString> {
        match self {
            Self::Release => vec![OsString::from("--release")],
            Self::Dev => Vec::new(),
            Self::Custom(name) => vec![OsString::from("--profile"), OsString::from(name)],
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release => f.write_str("release"),
            Self::Dev => f.write_str("dev"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Computes the conventional output path of a cross-compiled artefact.
#[must_use]
pub fn artifact_path(
    target_dir: &Utf8Path,
    target_triple: &str,
    profile: &BuildProfile,
    artifact_name: &str,
) -> Utf8PathBuf {
    target_dir
        .join(target_triple)
        .join(profile.output_dir())
        .join(artifact_name)
}

/// Confirms that `artifact` exists as a regular file.
///
/// Relative artefact paths are resolved against `workspace`; absolute paths
/// are checked as-is. The artefact's parent directory is opened with ambient
/// authority, so `..` components and a symlinked target directory resolve
/// the same way the build tool saw them.
///
/// # Errors
///
/// Returns [`TransferError::MissingArtifact`] when the file is absent or is
/// not a regular file.
pub fn ensure_artifact(workspace: &Utf8Path, artifact: &Utf8Path) -> Result<(), TransferError> {
    let missing = || TransferError::MissingArtifact {
        path: artifact.to_path_buf(),
    };

    let resolved = workspace.join(artifact);
    let (Some(parent), Some(file_name)) = (resolved.parent(), resolved.file_name()) else {
        return Err(missing());
    };

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|_| missing())?;
    let metadata = dir.metadata(file_name).map_err(|_| missing())?;
    if metadata.is_file() {
        Ok(())
    } else {
        Err(missing())
    }
}
