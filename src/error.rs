//! Error types for the wikidown library.
//!
//! Rendering itself never fails; these errors cover loading trees and
//! options from outside the process.

use std::io;
use thiserror::Error;

/// Result type alias for wikidown operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around an export.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document tree is not valid JSON or does not match the node schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The tree decoded but cannot be exported.
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// The options file could not be read.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
