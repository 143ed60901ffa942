//! Binary entry point for the `crossdeploy` CLI.

use std::io::{self, Write};
use std::process;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use thiserror::Error;

use crossdeploy::{
    DeployConfig, DeployError, DeployFailure, Deployer, Destination, RemoteCommand,
};

mod cli;

use cli::Cli;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Deploy(#[from] DeployError),
    #[error(transparent)]
    Failed(#[from] DeployFailure),
    #[error("failed to write output: {0}")]
    Output(String),
}

impl CliError {
    const fn exit_code(&self) -> i32 {
        match self {
            Self::Deploy(err) => err.exit_code(),
            Self::Failed(failure) => failure.exit_code(),
            Self::Config(_) | Self::Output(_) => 1,
        }
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            err.exit_code()
        }
    };

    process::exit(exit_code);
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut config =
        DeployConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    apply_overrides(&mut config, cli)?;

    if cli.locate {
        config.validate()?;
        return write_line(io::stdout(), config.artifact_path().as_str());
    }

    let destination =
        resolve_destination(cli.destination.as_deref(), config.destination.as_deref())?;
    let remote_command = if cli.remote_command.is_empty() {
        None
    } else {
        Some(RemoteCommand::from_args(&cli.remote_command)?)
    };
    let workspace = current_workspace()?;

    let mut deployer = Deployer::with_streaming_runner(config, workspace)?;
    if let Some(command) = remote_command {
        deployer = deployer.with_remote_command(Some(command));
    }

    let report = deployer.deploy(&destination)?;
    info!("deployed {} to {}", report.artifact, report.destination);
    Ok(())
}

fn apply_overrides(config: &mut DeployConfig, cli: &Cli) -> Result<(), DeployError> {
    if let Some(ref triple) = cli.target_triple {
        config.target_triple = parse_override("--target", triple)?;
    }
    if let Some(ref profile) = cli.profile {
        config.profile = parse_override("--profile", profile)?;
    }
    if let Some(ref artifact) = cli.artifact_name {
        config.artifact_name = parse_override("--artifact", artifact)?;
    }
    if let Some(ref build_bin) = cli.build_bin {
        config.build_bin = parse_override("--build-tool", build_bin)?;
    }
    Ok(())
}

fn parse_override(flag: &str, value: &str) -> Result<String, DeployError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeployError::usage(format!("{flag} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

fn resolve_destination(
    from_cli: Option<&str>,
    from_config: Option<&str>,
) -> Result<Destination, DeployError> {
    let raw = from_cli.or(from_config).ok_or_else(|| {
        DeployError::usage(concat!(
            "missing destination: pass DESTINATION (e.g. user@host:/opt/chess) ",
            "or set CROSSDEPLOY_DESTINATION"
        ))
    })?;
    Destination::parse(raw)
}

fn current_workspace() -> Result<Utf8PathBuf, CliError> {
    let cwd = std::env::current_dir().map_err(|err| CliError::Config(err.to_string()))?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
        CliError::Config(format!(
            "working directory is not valid UTF-8: {}",
            path.display()
        ))
    })
}

fn write_line(mut target: impl Write, line: &str) -> Result<(), CliError> {
    writeln!(target, "{line}").map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
