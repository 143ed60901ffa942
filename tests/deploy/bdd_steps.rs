//! BDD step definitions for the deploy pipeline.

use crossdeploy::{Deployer, Destination, RemoteCommand};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{ARTIFACT, DeployContext};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a workspace where the build produces the artefact")]
fn workspace_with_artifact(deploy_context: &DeployContext) {
    deploy_context.write_artifact();
}

#[given("an empty workspace")]
fn empty_workspace(deploy_context: &DeployContext) {
    let _ = deploy_context;
}

#[given("the build and transfer tools succeed")]
fn tools_succeed(deploy_context: &DeployContext) {
    deploy_context.runner.push_success();
    deploy_context.runner.push_success();
}

#[given("the build fails with status \"{code}\"")]
fn build_fails(deploy_context: &DeployContext, code: i32) {
    deploy_context.runner.push_failure(code);
}

#[given("the remote command \"{command}\" is enabled")]
fn remote_command_enabled(deploy_context: &DeployContext, command: String) -> Result<(), StepError> {
    let remote =
        RemoteCommand::new(&command).map_err(|err| StepError::Assertion(err.to_string()))?;
    deploy_context.remote_command.replace(Some(remote));
    Ok(())
}

#[given("the remote command exits with status \"{code}\"")]
fn remote_command_exits(deploy_context: &DeployContext, code: i32) {
    deploy_context.runner.push_exit_code(code);
}

#[when("I deploy to \"{destination}\"")]
fn deploy_to(deploy_context: &DeployContext, destination: String) -> Result<(), StepError> {
    let target =
        Destination::parse(&destination).map_err(|err| StepError::Assertion(err.to_string()))?;
    let deployer = Deployer::new(
        deploy_context.config.clone(),
        deploy_context.runner.clone(),
        deploy_context.workspace.clone(),
    )
    .map_err(|err| StepError::Assertion(err.to_string()))?
    .with_remote_command(deploy_context.remote_command.borrow().clone());

    let outcome = deployer.deploy(&target);
    deploy_context.outcome.replace(Some(outcome));
    Ok(())
}

#[then("the deployment succeeds")]
fn deployment_succeeds(deploy_context: &DeployContext) -> Result<(), StepError> {
    match deploy_context.outcome.borrow().as_ref() {
        Some(Ok(_)) => Ok(()),
        Some(Err(err)) => Err(StepError::Assertion(format!(
            "deployment failed unexpectedly: {err}"
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

#[then("the deployment fails with exit code \"{code}\"")]
fn deployment_fails_with(deploy_context: &DeployContext, code: i32) -> Result<(), StepError> {
    match deploy_context.outcome.borrow().as_ref() {
        Some(Err(err)) if err.exit_code() == code => Ok(()),
        Some(Err(err)) => Err(StepError::Assertion(format!(
            "expected exit code {code}, got {} ({err})",
            err.exit_code()
        ))),
        Some(Ok(report)) => Err(StepError::Assertion(format!(
            "expected failure, deployment succeeded: {report:?}"
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

#[then("the transfer copies the conventional artefact to \"{destination}\"")]
fn transfer_copies_artifact(
    deploy_context: &DeployContext,
    destination: String,
) -> Result<(), StepError> {
    let transfers = deploy_context.runner.invocations_of("scp");
    let [transfer] = transfers.as_slice() else {
        return Err(StepError::Assertion(format!(
            "expected exactly one transfer, got {}",
            transfers.len()
        )));
    };
    let args = transfer.args_lossy();
    if args != [ARTIFACT, destination.as_str()] {
        return Err(StepError::Assertion(format!(
            "unexpected transfer arguments: {args:?}"
        )));
    }
    Ok(())
}

#[then("the build runs before the transfer")]
fn build_runs_first(deploy_context: &DeployContext) -> Result<(), StepError> {
    let programs: Vec<String> = deploy_context
        .runner
        .invocations()
        .into_iter()
        .map(|invocation| invocation.program)
        .collect();
    if programs.get(..2) == Some(&[String::from("cross"), String::from("scp")][..]) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "unexpected invocation order: {programs:?}"
        )))
    }
}

#[then("no transfer is attempted")]
fn no_transfer(deploy_context: &DeployContext) -> Result<(), StepError> {
    let transfers = deploy_context.runner.invocations_of("scp");
    if transfers.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "transfer should not run, saw {transfers:?}"
        )))
    }
}

#[then("the remote command runs on \"{host}\"")]
fn remote_command_runs_on(deploy_context: &DeployContext, host: String) -> Result<(), StepError> {
    let invocations = deploy_context.runner.invocations_of("ssh");
    let Some(invocation) = invocations.last() else {
        return Err(StepError::Assertion(String::from("missing ssh invocation")));
    };
    let args = invocation.args_lossy();
    if args.iter().any(|arg| *arg == host) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "ssh should target {host}, got {args:?}"
        )))
    }
}
