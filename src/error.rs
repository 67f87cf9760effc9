use std::path::PathBuf;

use thiserror::Error;

/// A row that cannot become a [`crate::models::BookRecord`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unreadable record: {0}")]
    Malformed(String),
}

/// Why a cover request produced nothing usable.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("status {0}")]
    Status(u16),
    #[error("payload too small ({0} bytes)")]
    Undersized(usize),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

/// Per-book write failure; the importer records it and moves on.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("{file_name}: {source}")]
    Io {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    pub fn io(file_name: impl Into<String>, source: std::io::Error) -> Self {
        WriteError::Io {
            file_name: file_name.into(),
            source,
        }
    }
}

/// Failures that stop a whole import before any row is processed.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read input: {0}")]
    Input(#[from] csv::Error),
    #[error("cannot build http client: {0}")]
    Client(#[from] FetchError),
    #[error("cannot prepare {}: {source}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
