use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// Failures touching the backing file. None of these invalidate the in-memory cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("could not read cache file {path}: {source}")]
    PersistenceRead {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("could not write cache file {path}: {source}")]
    PersistenceWrite {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("could not delete cache file {path}: {source}")]
    PersistenceDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // NaN and infinities have no JSON form and would poison the whole file
    #[error("latency must be a finite number of seconds, got {0}")]
    InvalidLatency(f64),
}

impl CacheError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        CacheError::PersistenceRead {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        CacheError::PersistenceWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}

// Failures of the remote generate call
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("parse error: {0}")]
    Decode(#[source] reqwest::Error),
}
