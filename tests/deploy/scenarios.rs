//! BDD scenarios for the deploy pipeline.

use rstest_bdd_macros::scenario;

use super::test_helpers::{DeployContext, deploy_context};

#[scenario(
    path = "tests/features/deploy.feature",
    name = "Deploy the conventional artefact to a remote host"
)]
fn scenario_deploy_conventional_artifact(deploy_context: DeployContext) {
    let _ = deploy_context;
}

#[scenario(
    path = "tests/features/deploy.feature",
    name = "Build failure skips the transfer"
)]
fn scenario_build_failure_skips_transfer(deploy_context: DeployContext) {
    let _ = deploy_context;
}

#[scenario(
    path = "tests/features/deploy.feature",
    name = "Missing artefact after a successful build"
)]
fn scenario_missing_artifact(deploy_context: DeployContext) {
    let _ = deploy_context;
}

#[scenario(
    path = "tests/features/deploy.feature",
    name = "Surface the remote command exit code"
)]
fn scenario_remote_exit_code(deploy_context: DeployContext) {
    let _ = deploy_context;
}
