//! Shared fixtures for deploy BDD scenarios.

use std::cell::RefCell;
use std::sync::Arc;

use camino::Utf8PathBuf;
use crossdeploy::test_support::ScriptedRunner;
use crossdeploy::{DeployConfig, DeployFailure, DeployReport, RemoteCommand};
use rstest::fixture;
use tempfile::TempDir;

/// Conventional artefact path for the default configuration.
pub const ARTIFACT: &str = "./target/aarch64-unknown-linux-gnu/release/chess";

#[derive(Debug)]
pub struct DeployContext {
    pub runner: ScriptedRunner,
    pub config: DeployConfig,
    pub workspace: Utf8PathBuf,
    pub remote_command: RefCell<Option<RemoteCommand>>,
    pub outcome: RefCell<Option<Result<DeployReport, DeployFailure>>>,
    _workspace_tmp: Arc<TempDir>,
}

impl DeployContext {
    /// Writes a stand-in binary where the build would leave it.
    pub fn write_artifact(&self) {
        let path = self.workspace.join(ARTIFACT);
        let parent = path
            .parent()
            .unwrap_or_else(|| panic!("artifact path {path} should have a parent"));
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|err| panic!("create artifact directories: {err}"));
        std::fs::write(&path, b"\x7fELF")
            .unwrap_or_else(|err| panic!("write artifact {path}: {err}"));
    }
}

#[fixture]
pub fn deploy_context() -> DeployContext {
    let tmp = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let workspace = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
        .unwrap_or_else(|path| panic!("non-utf8 tempdir path: {}", path.display()));

    DeployContext {
        runner: ScriptedRunner::new(),
        config: DeployConfig::default(),
        workspace,
        remote_command: RefCell::new(None),
        outcome: RefCell::new(None),
        _workspace_tmp: Arc::new(tmp),
    }
}
