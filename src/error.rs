/// review-mock error types
use std::path::PathBuf;

/// Main error type for mock chroot operations
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// Mock config file missing, unreadable or without a usable `root`
    #[error("Mock config error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
    /// The subprocess could not be started at all
    #[error("Cannot launch `{command}`: {output}")]
    Launch { command: String, output: String },
    /// The subprocess ran but exited nonzero
    #[error("`{command}` exited with code {code}")]
    CommandFailed {
        command: String,
        code: i32,
        output: String,
    },
    /// Creating a chroot directory failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MockError {
    /// Diagnostic text for the review report.
    ///
    /// For command errors this is the captured transcript (possibly empty),
    /// otherwise the rendered error message.
    pub fn output(&self) -> String {
        match self {
            MockError::Launch { output, .. } | MockError::CommandFailed { output, .. } => {
                output.clone()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MockError>;
