//! Crate-wide error taxonomy for the fallible seams: the remote catalog,
//! the durable store, deck selection, and edit-boundary validation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MissionsError {
    /// The catalog request itself failed (connect, timeout, bad payload).
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered but refused the request (`status != "OK"`).
    #[error("catalog rejected the request: {0}")]
    Api(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rating range matches fewer problems than the deck needs.
    #[error("only {available} problem(s) rated within the requested range, need {requested}")]
    InsufficientProblems { available: usize, requested: usize },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("handle must not be empty")]
    EmptyHandle,
}

impl MissionsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
