//! Error types for merge operations.
//!
//! This module provides:
//! - `MergeError`: The crate-level error taxonomy
//! - `MergeResult`: Convenience alias for `Result<T, MergeError>`
//!
//! Precondition violations (`DestinationExists`, `IntermediateExists`) abort
//! before any byte is written. `Commit` errors deliberately leave the
//! intermediate job directory in place so the failed rename can be diagnosed.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Errors that can occur while resolving, running, or committing a merge.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The destination file already exists; it is never overwritten.
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// The intermediate merge directory already exists from a previous run.
    #[error("intermediate merge directory already exists: {0}")]
    IntermediateExists(PathBuf),

    /// The input pattern matched zero files.
    #[error("no files matched pattern: {0}")]
    NoMatch(String),

    /// A source file's encoded records disagree with the configured types.
    #[error("record type mismatch in {path}: {source}")]
    CodecMismatch {
        /// File whose records did not match
        path: PathBuf,
        source: CodecError,
    },

    /// Any other codec failure, with the file it occurred on.
    #[error("codec failure in {path}: {source}")]
    Codec {
        /// File being read or written when the codec failed
        path: PathBuf,
        source: CodecError,
    },

    /// The external job host reported a failed job.
    #[error("merge job failed: {0}")]
    JobExecution(String),

    /// The post-job rename of the reduce output could not complete.
    #[error("commit failed: {0}")]
    Commit(String),

    /// The merge request did not pass validation.
    #[error("invalid merge request: {0}")]
    InvalidRequest(String),

    /// I/O error outside the codec boundary.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergeError {
    /// Wrap a codec error with the path it occurred on.
    ///
    /// Type mismatches get their own variant so callers can distinguish a
    /// wrongly-typed source file from stream corruption or I/O trouble.
    pub fn from_codec(path: impl Into<PathBuf>, source: CodecError) -> Self {
        match source {
            CodecError::TypeMismatch { .. } => MergeError::CodecMismatch {
                path: path.into(),
                source,
            },
            _ => MergeError::Codec {
                path: path.into(),
                source,
            },
        }
    }
}

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;
