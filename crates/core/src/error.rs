//! Error types for android-sdk-setup
//!
//! Every failure is fatal to the run. The variants follow the provisioning
//! stage that produced them so callers can tell a bad invocation apart from a
//! flaky network or a broken package-manager install.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SDK provisioning
#[derive(Error, Debug)]
pub enum SetupError {
    /// Unresolvable host platform, missing SDK root, invalid request or config
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Download failed (network, HTTP status, truncated body)
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Archive could not be unpacked
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Directory creation/removal or file write failed
    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external program exited unsuccessfully
    #[error("`{program}` failed with exit code {code:?}: {stderr}")]
    Subprocess {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, SetupError>;

impl SetupError {
    /// Shorthand for wrapping an IO error with the path it concerns
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SetupError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Whether the error was raised before anything on disk was touched
    pub fn is_configuration(&self) -> bool {
        matches!(self, SetupError::Configuration(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            SetupError::Configuration(msg) => format!("Invalid setup: {}", msg),
            SetupError::Transfer(msg) => {
                format!("Download failed: {}. Re-run the job to retry.", msg)
            }
            SetupError::Extraction(msg) => format!("Could not unpack archive: {}", msg),
            SetupError::Filesystem { path, source } => {
                format!("Cannot write to {}: {}", path.display(), source)
            }
            SetupError::Subprocess { program, code, stderr } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                if stderr.trim().is_empty() {
                    format!("{} exited with {}", program, code)
                } else {
                    format!("{} exited with {}:\n{}", program, code, stderr.trim_end())
                }
            }
        }
    }
}
