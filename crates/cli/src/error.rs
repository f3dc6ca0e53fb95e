//! CLI errors and their process exit codes.
//!
//! | code | meaning |
//! |---|---|
//! | 2  | argument parse error (reported by clap) |
//! | 10 | animator failed: unknown name, bad dimensions, step error |
//! | 11 | file could not be read or written |
//! | 12 | bad user input: params JSON, seed file contents, colors |
//! | 13 | JSON output could not be produced |

use std::path::Path;

use canvas_fx_core::FxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Animator(FxError),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Input(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Wraps a filesystem failure on `path`; `action` is e.g. "read".
    pub fn file(action: &str, path: &Path, err: std::io::Error) -> Self {
        CliError::Io(format!("cannot {action} {}: {err}", path.display()))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Animator(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

/// Routes animator errors by what went wrong: file trouble is I/O, bad
/// colors or params are input, everything else is the animator's.
impl From<FxError> for CliError {
    fn from(e: FxError) -> Self {
        match e {
            FxError::Io(msg) => CliError::Io(msg),
            FxError::InvalidColor(_) | FxError::InvalidParams(_) => CliError::Input(e.to_string()),
            other => CliError::Animator(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fx_errors_route_to_exit_codes() {
        let cases = [
            (FxError::UnknownAnimator("spiral".into()), 10),
            (FxError::InvalidDimensions { width: 0.0, height: 1.0 }, 10),
            (FxError::SurfaceUnavailable("no canvas".into()), 10),
            (FxError::Io("disk full".into()), 11),
            (FxError::InvalidColor("teal".into()), 12),
            (FxError::InvalidParams("eof".into()), 12),
        ];
        for (fx, code) in cases {
            let shown = fx.to_string();
            let err = CliError::from(fx);
            assert_eq!(err.exit_code(), code, "{shown}");
        }
    }

    #[test]
    fn messages_survive_routing() {
        assert!(CliError::from(FxError::UnknownAnimator("spiral".into()))
            .to_string()
            .contains("spiral"));
        assert!(CliError::from(FxError::InvalidColor("teal".into()))
            .to_string()
            .contains("teal"));
    }

    #[test]
    fn file_errors_name_the_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CliError::file("read", Path::new("/tmp/seed.json"), io);
        assert_eq!(err.exit_code(), 11);
        assert_eq!(err.to_string(), "cannot read /tmp/seed.json: gone");
    }

    #[test]
    fn serde_errors_are_serialization() {
        let err: CliError = serde_json::from_str::<serde_json::Value>("{invalid")
            .unwrap_err()
            .into();
        assert_eq!(err.exit_code(), 13);
    }
}
