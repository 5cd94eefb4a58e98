//! Error types for scanning and artifact generation.
//!
//! Ports report failures as boxed errors; the core wraps them here with
//! the path or stage that failed so the message is actionable on its own.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience type for fallible core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Things that can go wrong while scanning a project or producing artifacts.
#[derive(Error, Debug)]
pub enum Error {
    /// The project root does not exist.
    #[error("project directory '{0}' does not exist")]
    NotFound(PathBuf),

    /// A file or directory could not be read.
    #[error("failed to read '{path}': {reason}")]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error message.
        reason: String,
    },

    /// An output artifact could not be written.
    #[error("failed to write '{path}': {reason}")]
    Write {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error message.
        reason: String,
    },

    /// The text-generation collaborator failed.
    #[error("text generation failed: {0}")]
    Completion(String),

    /// The environment snapshot command failed.
    #[error("environment snapshot failed: {0}")]
    Snapshot(String),

    /// An artifact could not be serialized.
    #[error("failed to serialize {0}")]
    Serialize(String),

    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(String),
}

impl Error {
    /// Creates a read error with the path for context.
    pub fn read(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Read { path: path.into(), reason: reason.to_string() }
    }

    /// Creates a write error with the path for context.
    pub fn write(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Write { path: path.into(), reason: reason.to_string() }
    }
}
