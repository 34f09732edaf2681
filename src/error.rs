//! Error types for loading, configuring and saving

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that end a conversion run.
///
/// Problems with a single play are not represented here, see
/// [`crate::convert::Skip`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON on line {line} of the database: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line} of the database is not a JSON object")]
    NotAnObject { line: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
