//! Domain-level errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors a run can hit while reading and interpreting lexicon files.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("malformed XML in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("schema violation in {path}: {message}")]
    Schema { path: PathBuf, message: String },
}
