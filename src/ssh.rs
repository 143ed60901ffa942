//! OpenSSH option rendering shared by `scp` transfers and `ssh` remote
//! execution.

use std::ffi::OsString;

/// Connection options passed to OpenSSH-family tools.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SshOptions {
    /// Port override; `None` leaves the client default (or `~/.ssh/config`).
    pub port: Option<u16>,
    /// Private key path; supports a leading `~/`.
    pub identity_file: Option<String>,
    /// Forces `BatchMode=yes` so a missing key fails instead of prompting.
    pub batch_mode: bool,
}

/// Which OpenSSH client the options are rendered for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SshClient {
    /// `scp`, which spells the port flag `-P`.
    Scp,
    /// `ssh`, which spells the port flag `-p`.
    Ssh,
}

impl SshOptions {
    /// Renders the options as command-line arguments for `client`.
    #[must_use]
    pub fn to_args(&self, client: SshClient) -> Vec<OsString> {
        let mut args = Vec::new();

        if let Some(port) = self.port {
            let flag = match client {
                SshClient::Scp => "-P",
                SshClient::Ssh => "-p",
            };
            args.push(OsString::from(flag));
            args.push(OsString::from(port.to_string()));
        }

        if let Some(ref identity_file) = self.identity_file {
            args.push(OsString::from("-i"));
            args.push(OsString::from(expand_tilde(identity_file)));
        }

        if self.batch_mode {
            args.push(OsString::from("-o"));
            args.push(OsString::from("BatchMode=yes"));
        }

        args
    }
}

/// Expands a leading `~/` prefix to the user's home directory.
///
/// If `HOME` is not set, the input is returned unchanged.
///
/// # Examples
///
/// ```
/// # use crossdeploy::ssh::expand_tilde;
/// let home = std::env::var("HOME").expect("HOME should be set");
/// assert_eq!(expand_tilde("~/.ssh/id_ed25519"), format!("{home}/.ssh/id_ed25519"));
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return format!("{}/{rest}", home.to_string_lossy());
    }
    path.to_owned()
}
