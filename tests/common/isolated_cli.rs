//! Builds `crossdeploy` commands that cannot see the developer's own
//! configuration.

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;

/// Returns a command running in `dir` with an empty environment apart from
/// `PATH`, and with the home and XDG configuration directories pointed at
/// `dir`.
pub fn isolated_command(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("crossdeploy");
    cmd.current_dir(dir);
    cmd.env_clear();
    if let Some(path) = std::env::var_os("PATH") {
        cmd.env("PATH", path);
    }
    cmd.env("HOME", dir);
    cmd.env("XDG_CONFIG_HOME", dir);
    cmd.env("XDG_CONFIG_DIRS", dir);
    cmd
}
