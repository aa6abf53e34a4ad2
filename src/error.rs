// src/error.rs

//! Error types for debprune

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced by the retention engine and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// Bad target directory or option value; fatal before any side effect
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// One archive could not be read; the archive is skipped
    #[error("Failed to read package metadata from '{}': {reason}", .path.display())]
    MetadataExtraction { path: PathBuf, reason: String },

    /// Version string rejected by the Debian version grammar
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Removing a planned archive failed; the run continues
    #[error("Failed to delete '{}': {source}", .path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a metadata extraction failure on `path`
    pub fn metadata(path: &Path, reason: impl Into<String>) -> Self {
        Error::MetadataExtraction {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// True for errors that abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
