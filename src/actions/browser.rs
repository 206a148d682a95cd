use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("opening URLs is not supported on this platform")]
    Unsupported,

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Command used to open URLs on the current platform.
fn opener() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("open")
    } else if cfg!(target_os = "linux") {
        Some("xdg-open")
    } else {
        None
    }
}

/// Open a URL in the default browser.
///
/// The opener runs detached; only failing to launch it is an error.
pub fn open_in_browser(url: &str) -> Result<(), OpenError> {
    let program = opener().ok_or(OpenError::Unsupported)?;
    tracing::debug!("opening {url} with {program}");
    Command::new(program)
        .arg(url)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map(drop)
        .map_err(|source| OpenError::Spawn { program, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opener_matches_platform() {
        if cfg!(target_os = "linux") {
            assert_eq!(opener(), Some("xdg-open"));
        } else if cfg!(target_os = "macos") {
            assert_eq!(opener(), Some("open"));
        }
    }

    #[test]
    fn spawn_error_names_program() {
        let err = OpenError::Spawn {
            program: "xdg-open",
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to run xdg-open: not found");
    }
}
