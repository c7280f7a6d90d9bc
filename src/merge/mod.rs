//! Merge strategies and their shared precondition and path helpers.
//!
//! This module provides:
//! - `TextMerger`: Local raw byte concatenation
//! - `RecordMerger`: Local typed-record merge through the codec
//! - `DistributedMerger`: Cluster-job-based merge with a commit protocol
//! - `MergeOutcome`: What a successful merge produced
//!
//! All strategies share the same preconditions: the destination must not
//! exist, and the glob must match at least one file. The pre-existence
//! checks are the only concurrency control; two merges must never target the
//! same destination or intermediate directory concurrently.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::MERGE_TMP_DIR;
use crate::error::{MergeError, MergeResult};
use crate::fs::FileSystem;

mod distributed;
mod record;
mod text;

pub use distributed::DistributedMerger;
pub use record::RecordMerger;
pub use text::TextMerger;

/// What a successful merge produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The final output file
    pub output_path: PathBuf,
    /// How many source files were merged
    pub files_merged: usize,
}

/// Derive the intermediate job directory for an input pattern.
///
/// Convention: the pattern's parent directory plus the reserved name.
pub(crate) fn intermediate_dir(input_glob: &str) -> PathBuf {
    let parent = Path::new(input_glob)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    parent.join(MERGE_TMP_DIR)
}

/// Fail if the destination already exists. Checked before any byte is
/// written; the destination is never silently overwritten.
pub(crate) fn guard_destination(fs: &dyn FileSystem, destination: &Path) -> MergeResult<()> {
    if fs.exists(destination) {
        return Err(MergeError::DestinationExists(destination.to_path_buf()));
    }
    Ok(())
}

/// Expand the pattern, failing if it matches nothing.
pub(crate) fn resolve_sources(fs: &dyn FileSystem, pattern: &str) -> MergeResult<Vec<PathBuf>> {
    let sources = fs.glob(pattern)?;
    if sources.is_empty() {
        return Err(MergeError::NoMatch(pattern.to_string()));
    }
    Ok(sources)
}

/// Remove a partially written destination after a failed merge.
///
/// The merge has already failed; a secondary cleanup failure is logged, not
/// surfaced.
pub(crate) fn discard_partial(fs: &dyn FileSystem, destination: &Path) {
    if let Err(e) = fs.remove_file(destination) {
        warn!(
            destination = %destination.display(),
            error = %e,
            "failed to remove partial output"
        );
    }
}

/// Delete source files after the destination is durable.
///
/// Individual deletion failures are non-fatal: the merge result already
/// exists, so they are logged and skipped.
pub(crate) fn delete_sources(fs: &dyn FileSystem, sources: &[PathBuf]) {
    for source in sources {
        match fs.remove_file(source) {
            Ok(()) => debug!(source = %source.display(), "deleted source"),
            Err(e) => warn!(
                source = %source.display(),
                error = %e,
                "failed to delete source after merge"
            ),
        }
    }
}
