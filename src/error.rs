//! Error types for bom-workbench.
//!
//! One crate-wide error enum with constructor helpers, following the
//! taxonomy in the design notes: validation errors from reviewer input,
//! read errors from persisted state, and filesystem errors from the
//! tree walk.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bom-workbench operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WorkbenchError {
    /// A reviewer decision failed validation (missing purl, bad action).
    #[error("Invalid decision: {0}")]
    Validation(String),

    /// Persisted rule-set or scan-report content could not be parsed.
    ///
    /// A *missing* file is not a read error (the session starts empty);
    /// malformed content is.
    #[error("Failed to read {what} at {}: {message}", .path.display())]
    Read {
        what: &'static str,
        path: PathBuf,
        message: String,
    },

    /// IO errors with the path that produced them.
    ///
    /// During tree building this aborts the enclosing subtree; the path
    /// lets callers decide whether to soften that to skip-and-continue.
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenient Result type for bom-workbench operations.
pub type Result<T> = std::result::Result<T, WorkbenchError>;

impl WorkbenchError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a read error for a persisted file.
    pub fn read(what: &'static str, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Read {
            what,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an IO error carrying the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }
}

impl From<std::io::Error> for WorkbenchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}
