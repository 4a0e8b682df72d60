//! Error types for the token-list file store.

use std::path::PathBuf;

/// Errors that can occur while loading or saving a token list.
#[derive(Debug, thiserror::Error)]
pub enum TokenListError {
    /// Reading or writing the file failed.
    #[error("I/O error on {path}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a valid token list.
    #[error("Invalid token list JSON in {path}")]
    Json {
        /// File being parsed or written
        path: PathBuf,
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

impl TokenListError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TokenListError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        TokenListError::Json {
            path: path.into(),
            source,
        }
    }
}
