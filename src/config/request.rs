//! Merge request and strategy types.

use std::path::PathBuf;

use crate::codec::RecordType;
use crate::error::{MergeError, MergeResult};
use crate::job::JobFormat;

use super::{DEFAULT_DELIMITER, DEFAULT_MAPPER_COUNT};

/// The strategy used to produce the merged output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Concatenate raw bytes of each source in glob order.
    LocalText {
        /// Inserted between consecutive files, never after the last
        delimiter: String,
    },
    /// Re-emit every typed record of each source through the codec.
    LocalRecord {
        key_type: RecordType,
        value_type: RecordType,
    },
    /// Submit an identity job with a single reduce task to the job host.
    Distributed {
        mapper_count: usize,
        key_type: RecordType,
        value_type: RecordType,
        input_format: JobFormat,
        output_format: JobFormat,
    },
}

impl MergeStrategy {
    /// Local text merge with the default (empty) delimiter.
    pub fn local_text() -> Self {
        MergeStrategy::LocalText {
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }

    /// Local typed-record merge.
    pub fn local_record(key_type: RecordType, value_type: RecordType) -> Self {
        MergeStrategy::LocalRecord {
            key_type,
            value_type,
        }
    }

    /// Distributed merge reading and writing typed records.
    pub fn distributed(mapper_count: usize, key_type: RecordType, value_type: RecordType) -> Self {
        MergeStrategy::Distributed {
            mapper_count,
            key_type,
            value_type,
            input_format: JobFormat::Record,
            output_format: JobFormat::Record,
        }
    }
}

impl Default for MergeStrategy {
    fn default() -> Self {
        MergeStrategy::distributed(DEFAULT_MAPPER_COUNT, RecordType::Long, RecordType::Text)
    }
}

/// A validated description of one merge.
///
/// Immutable once constructed; `validate` runs before any strategy touches
/// the filesystem.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// Glob pattern of the files to be merged
    pub input_glob: String,
    /// Destination file for the merged output
    pub output_path: PathBuf,
    /// Delete the source files once the destination is durably written
    pub delete_source: bool,
    /// Strategy used to produce the output
    pub strategy: MergeStrategy,
}

impl MergeRequest {
    /// Create a request with `delete_source` off.
    pub fn new(
        input_glob: impl Into<String>,
        output_path: impl Into<PathBuf>,
        strategy: MergeStrategy,
    ) -> Self {
        Self {
            input_glob: input_glob.into(),
            output_path: output_path.into(),
            delete_source: false,
            strategy,
        }
    }

    /// Set whether the sources are deleted after a successful merge.
    pub fn with_delete_source(mut self, delete_source: bool) -> Self {
        self.delete_source = delete_source;
        self
    }

    /// Check the request for configuration errors.
    pub fn validate(&self) -> MergeResult<()> {
        if self.input_glob.is_empty() {
            return Err(MergeError::InvalidRequest(
                "input pattern must not be empty".to_string(),
            ));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(MergeError::InvalidRequest(
                "output path must not be empty".to_string(),
            ));
        }
        if let MergeStrategy::Distributed { mapper_count, .. } = self.strategy {
            if mapper_count == 0 {
                return Err(MergeError::InvalidRequest(
                    "mapper count must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}
