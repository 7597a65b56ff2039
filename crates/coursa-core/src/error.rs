//! Error types for the coursa-core crate.

use std::{io, path::PathBuf};

use coursa_config::ConfigError;
use coursa_index::IndexError;
use thiserror::Error;

use crate::model::CourseId;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read a snapshot.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Failed to write a snapshot.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// A snapshot could not be decoded.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// In-memory state could not be encoded.
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by engine operations that cannot degrade gracefully.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The search index failed.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A cache file could not be written.
    #[error("failed to write cache {key}: {message}")]
    Cache {
        /// Cache key.
        key: &'static str,
        /// Error message.
        message: String,
    },

    /// No configuration file was found, so there is nowhere to keep data.
    #[error("no .coursa.toml found; run `coursa init` first")]
    NoDataDirectory,

    /// The referenced course does not exist.
    #[error("unknown course: {0}")]
    UnknownCourse(CourseId),
}
