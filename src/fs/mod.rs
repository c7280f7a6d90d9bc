//! Filesystem boundary for merge operations.
//!
//! This module provides:
//! - `FileSystem`: Trait over the path operations the merge engine needs
//! - `LocalFs`: Implementation over `std::fs` and glob expansion
//! - `MemoryFs`: In-memory implementation for testing
//!
//! The engine only ever touches the filesystem through this trait, so tests
//! and alternative backends can substitute their own implementation.

use std::fmt::Debug;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

mod local;
mod memory;

pub use local::LocalFs;
pub use memory::MemoryFs;

/// Trait for the filesystem operations used by the merge strategies.
///
/// `glob` must return matches in a stable, sorted order; that order decides
/// the order of bytes and records in the merged output.
pub trait FileSystem: Send + Sync + Debug {
    /// Check whether a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Expand a glob pattern into an ordered list of matching files.
    fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>>;

    /// Open a file for reading.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;

    /// Create a file for writing, failing if it already exists.
    fn create_new(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;

    /// Rename a file.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and everything under it.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a directory and any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}
