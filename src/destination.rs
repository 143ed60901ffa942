//! Validated transfer destinations.

use std::fmt;

use crate::error::DeployError;

/// Where the artefact is copied to.
///
/// The raw string is handed to the transfer tool untouched. Remote
/// destinations follow scp syntax (`[user@]host:path`); anything else is
/// treated as a local path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Destination {
    raw: String,
}

impl Destination {
    /// Validates a caller-supplied destination.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Usage`] when the value is empty after trimming,
    /// contains ASCII control characters, or opens a bracketed host
    /// (`[fe80::1]`) without closing it.
    pub fn parse(raw: &str) -> Result<Self, DeployError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DeployError::usage("destination must not be empty"));
        }
        if trimmed.chars().any(|ch| ch.is_ascii_control()) {
            return Err(DeployError::usage(concat!(
                "destination must not contain control characters (ASCII ",
                "0x00-0x1F or 0x7F)"
            )));
        }
        if let Some(open) = bracket_open(trimmed)
            && !trimmed.get(open..).is_some_and(|rest| rest.contains(']'))
        {
            return Err(DeployError::usage(format!(
                "destination host is missing a closing ']': {trimmed}"
            )));
        }
        Ok(Self {
            raw: trimmed.to_owned(),
        })
    }

    /// The destination exactly as passed to the transfer tool.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The `[user@]host` part of a remote destination, as `ssh` expects it.
    ///
    /// A colon only marks a host when it comes before the first slash, so
    /// `./a:b` and `/srv/a:b` stay local. Brackets around an IPv6 literal
    /// (`user@[fe80::1]:/opt`) are stripped.
    #[must_use]
    pub fn remote_host(&self) -> Option<String> {
        let raw = self.raw.as_str();
        let colon = match bracket_open(raw) {
            Some(open) => {
                let close = raw.get(open..)?.find(']')? + open;
                raw.get(close..)?.find(':')? + close
            }
            None => raw.find(':')?,
        };

        let host = raw.get(..colon)?;
        if host.is_empty() || host.contains('/') || host.ends_with('@') {
            return None;
        }
        Some(host.replace(['[', ']'], ""))
    }
}

/// Position of a `[` that opens a bracketed host, i.e. one with no `/` or `:`
/// before it.
fn bracket_open(raw: &str) -> Option<usize> {
    let open = raw.find('[')?;
    let prefix = raw.get(..open)?;
    (!prefix.contains(['/', ':'])).then_some(open)
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::scp("user@host:/opt/chess", Some("user@host"))]
    #[case::home("root@192.168.1.56:~/", Some("root@192.168.1.56"))]
    #[case::no_user("pi:chess", Some("pi"))]
    #[case::empty_path("pi:", Some("pi"))]
    #[case::ipv6("user@[fe80::1]:/opt", Some("user@fe80::1"))]
    #[case::ipv6_no_user("[::1]:chess", Some("::1"))]
    #[case::absolute("/srv/deploy/chess", None)]
    #[case::relative_with_colon("./out:1/chess", None)]
    #[case::absolute_with_colon("/tmp/a:b", None)]
    #[case::bracket_in_path("./out/[1]:chess", None)]
    fn parse_classifies_remote_and_local(#[case] raw: &str, #[case] host: Option<&str>) {
        let destination = Destination::parse(raw).expect("destination should parse");

        assert_eq!(destination.remote_host().as_deref(), host);
        assert_eq!(destination.as_str(), raw);
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("   ")]
    #[case::newline("host:/opt\nrm -rf /")]
    #[case::tab("host:\t/opt")]
    #[case::unclosed_bracket("user@[fe80::1:/opt")]
    fn parse_rejects_invalid_values(#[case] raw: &str) {
        let err = Destination::parse(raw).expect_err("value should be rejected");
        assert!(matches!(err, DeployError::Usage { .. }), "got {err:?}");
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let destination = Destination::parse("  user@host:/opt/chess \n").expect("should parse");
        assert_eq!(destination.to_string(), "user@host:/opt/chess");
    }
}
