//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::bank::BankError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while fetching or parsing the question source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("invalid question source url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("question source request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Bank(#[from] BankError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
