//! Error types for RO-Crate validation and export
//!
//! Malformed crate *content* never shows up here; it is reported as
//! strings in a [`ValidationResult`](crate::validate::ValidationResult).
//! These variants cover the I/O edges and invalid call-site usage.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("Failed to load crate from {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("Invalid crate document: {0}")]
    InvalidDocument(String),

    #[error("Invalid profile document: {0}")]
    InvalidProfile(String),

    #[error("Refusing to overwrite read-only file {0}")]
    ReadOnlyFile(PathBuf),

    #[error("Project directory {0} does not exist")]
    MissingProjectDirectory(PathBuf),

    #[error("RO-Crate validation failed:\n{0}")]
    ValidationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}
