//! Merge engine dispatching a validated request to its strategy.

use std::sync::Arc;

use crate::codec::RecordCodec;
use crate::config::{MergeRequest, MergeStrategy};
use crate::error::MergeResult;
use crate::fs::FileSystem;
use crate::job::JobClient;
use crate::merge::{DistributedMerger, MergeOutcome, RecordMerger, TextMerger};

/// Runs one merge: validates the request, selects the strategy, executes it.
///
/// The engine is single-threaded per invocation; the distributed strategy
/// blocks at job submission until the host reports a terminal status.
#[derive(Debug)]
pub struct MergeEngine {
    fs: Arc<dyn FileSystem>,
    codec: Arc<dyn RecordCodec>,
    jobs: Arc<dyn JobClient>,
    request: MergeRequest,
}

impl MergeEngine {
    /// Create an engine over the given capabilities and request.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        codec: Arc<dyn RecordCodec>,
        jobs: Arc<dyn JobClient>,
        request: MergeRequest,
    ) -> Self {
        Self {
            fs,
            codec,
            jobs,
            request,
        }
    }

    /// Get the request this engine will run.
    pub fn request(&self) -> &MergeRequest {
        &self.request
    }

    /// Execute the merge and return the final output path.
    ///
    /// All-or-nothing: on failure no partial output is left at the
    /// destination.
    pub fn run(&self) -> MergeResult<MergeOutcome> {
        self.request.validate()?;

        let pattern = self.request.input_glob.as_str();
        let destination = self.request.output_path.as_path();
        let delete_source = self.request.delete_source;

        match &self.request.strategy {
            MergeStrategy::LocalText { delimiter } => TextMerger::new(self.fs.as_ref())
                .with_delimiter(delimiter.as_bytes())
                .merge(pattern, destination, delete_source),
            MergeStrategy::LocalRecord {
                key_type,
                value_type,
            } => RecordMerger::new(self.fs.as_ref(), self.codec.as_ref(), *key_type, *value_type)
                .merge(pattern, destination, delete_source),
            MergeStrategy::Distributed {
                mapper_count,
                key_type,
                value_type,
                input_format,
                output_format,
            } => DistributedMerger::new(
                self.fs.as_ref(),
                self.jobs.as_ref(),
                *mapper_count,
                *key_type,
                *value_type,
            )
            .with_formats(*input_format, *output_format)
            .merge(pattern, destination, delete_source),
        }
    }
}
