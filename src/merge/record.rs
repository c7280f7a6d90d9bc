//! Local record merge: typed-record re-emission in glob order.

use std::path::{Path, PathBuf};

use tracing::info;

use super::{MergeOutcome, delete_sources, discard_partial, guard_destination, resolve_sources};
use crate::codec::{RecordCodec, RecordType};
use crate::error::{MergeError, MergeResult};
use crate::fs::FileSystem;

/// Opens each glob-matched file through the codec and appends every record,
/// in file order then in-file order, to a single destination writer.
pub struct RecordMerger<'a> {
    fs: &'a dyn FileSystem,
    codec: &'a dyn RecordCodec,
    key_type: RecordType,
    value_type: RecordType,
}

impl<'a> RecordMerger<'a> {
    /// Create a record merger bound to the given key/value types.
    pub fn new(
        fs: &'a dyn FileSystem,
        codec: &'a dyn RecordCodec,
        key_type: RecordType,
        value_type: RecordType,
    ) -> Self {
        Self {
            fs,
            codec,
            key_type,
            value_type,
        }
    }

    /// Merge every record of every file matching `pattern` into `destination`.
    ///
    /// A type mismatch in any source aborts the merge with `CodecMismatch`
    /// and removes the partial destination. Source deletion is deferred until
    /// the destination writer is closed; per-file deletion failures are
    /// logged, not surfaced.
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
            "starting local record merge"
        );

        let records = match self.copy_records(&sources, destination) {
            Ok(records) => records,
            Err(e) => {
                discard_partial(self.fs, destination);
                return Err(e);
            }
        };

        // The writer is closed by now; the destination is durable.
        if delete_source {
            delete_sources(self.fs, &sources);
        }

        info!(
            destination = %destination.display(),
            records,
            "local record merge complete"
        );
        Ok(MergeOutcome {
            output_path: destination.to_path_buf(),
            files_merged: sources.len(),
        })
    }

    fn copy_records(&self, sources: &[PathBuf], destination: &Path) -> MergeResult<u64> {
        let sink = self.fs.create_new(destination)?;
        let mut writer = self
            .codec
            .open_writer(sink, self.key_type, self.value_type)
            .map_err(|e| MergeError::from_codec(destination, e))?;

        let mut records = 0u64;
        for source in sources {
            let stream = self.fs.open_read(source)?;
            let mut reader = self
                .codec
                .open_reader(stream, self.key_type, self.value_type)
                .map_err(|e| MergeError::from_codec(source, e))?;

            while let Some((key, value)) =
                reader.next().map_err(|e| MergeError::from_codec(source, e))?
            {
                writer
                    .append(&key, &value)
                    .map_err(|e| MergeError::from_codec(destination, e))?;
                records += 1;
            }
        }

        writer
            .finish()
            .map_err(|e| MergeError::from_codec(destination, e))?;
        Ok(records)
    }
}
