//! Local text merge: raw byte concatenation in glob order.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::{MergeOutcome, delete_sources, discard_partial, guard_destination, resolve_sources};
use crate::error::MergeResult;
use crate::fs::FileSystem;

/// Concatenates the byte streams of all glob-matched files into one output
/// file, optionally inserting a delimiter between files.
pub struct TextMerger<'a> {
    fs: &'a dyn FileSystem,
    delimiter: Vec<u8>,
}

impl<'a> TextMerger<'a> {
    /// Create a text merger with no delimiter.
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            delimiter: Vec::new(),
        }
    }

    /// Set the delimiter inserted between consecutive files.
    pub fn with_delimiter(mut self, delimiter: impl Into<Vec<u8>>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Merge every file matching `pattern` into `destination`.
    ///
    /// Fails with `DestinationExists` if the destination is present, and
    /// `NoMatch` if the pattern matches nothing. A failure mid-copy removes
    /// the partial destination. Sources are deleted only after the output
    /// stream is flushed and closed.
    pub fn merge(
        &self,
        pattern: &str,
        destination: &Path,
        delete_source: bool,
    ) -> MergeResult<MergeOutcome> {
        guard_destination(self.fs, destination)?;
        let sources = resolve_sources(self.fs, pattern)?;

        info!(
            pattern,
            destination = %destination.display(),
            files = sources.len(),
            "starting local text merge"
        );

        if let Err(e) = self.copy_all(&sources, destination) {
            discard_partial(self.fs, destination);
            return Err(e);
        }

        if delete_source {
            delete_sources(self.fs, &sources);
        }

        info!(destination = %destination.display(), "local text merge complete");
        Ok(MergeOutcome {
            output_path: destination.to_path_buf(),
            files_merged: sources.len(),
        })
    }

    fn copy_all(&self, sources: &[PathBuf], destination: &Path) -> MergeResult<()> {
        let mut writer = self.fs.create_new(destination)?;
        for (i, source) in sources.iter().enumerate() {
            if i > 0 && !self.delimiter.is_empty() {
                writer.write_all(&self.delimiter)?;
            }
            let mut reader = self.fs.open_read(source)?;
            io::copy(&mut reader, &mut writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}
