//! Distributed merge: identity job with a single reduce task, then a commit
//! rename of the reduce partition.

use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use super::{MergeOutcome, delete_sources, guard_destination, intermediate_dir, resolve_sources};
use crate::codec::RecordType;
use crate::error::{MergeError, MergeResult};
use crate::fs::FileSystem;
use crate::job::{JobClient, JobFormat, JobOutcome, JobSpec, REDUCE_PART_FILE};

/// Builds an identity job over all glob-matched inputs, waits for it, then
/// renames the single reduce partition to the requested destination.
///
/// The job writes into a transient intermediate directory derived from the
/// input pattern's parent. That directory is removed on success and on job
/// failure, but kept when the commit rename fails so the state can be
/// inspected.
pub struct DistributedMerger<'a> {
    fs: &'a dyn FileSystem,
    jobs: &'a dyn JobClient,
    mapper_count: usize,
    key_type: RecordType,
    value_type: RecordType,
    input_format: JobFormat,
    output_format: JobFormat,
}

impl<'a> DistributedMerger<'a> {
    /// Create a distributed merger reading and writing typed records.
    pub fn new(
        fs: &'a dyn FileSystem,
        jobs: &'a dyn JobClient,
        mapper_count: usize,
        key_type: RecordType,
        value_type: RecordType,
    ) -> Self {
        Self {
            fs,
            jobs,
            mapper_count,
            key_type,
            value_type,
            input_format: JobFormat::Record,
            output_format: JobFormat::Record,
        }
    }

    /// Override the job's input and output formats.
    pub fn with_formats(mut self, input_format: JobFormat, output_format: JobFormat) -> Self {
        self.input_format = input_format;
        self.output_format = output_format;
        self
    }

    /// Merge every file matching `pattern` into `destination` via the job
    /// host.
    ///
    /// State machine: validate, configure, submit & wait, commit, cleanup.
    /// The calling thread blocks while the job runs. A job failure surfaces
    /// as `JobExecution` without attempting the commit; a failed commit
    /// surfaces as `Commit` with the intermediate directory left intact.
    pub fn merge(
        &self,
        pattern: &str,
        destination: &Path,
        delete_source: bool,
    ) -> MergeResult<MergeOutcome> {
        // Validate
        guard_destination(self.fs, destination)?;
        let staging = intermediate_dir(pattern);
        if self.fs.exists(&staging) {
            return Err(MergeError::IntermediateExists(staging));
        }
        let sources = resolve_sources(self.fs, pattern)?;

        // Configure: identity transform, exactly one reduce partition
        let spec = JobSpec {
            name: "file-merge".to_string(),
            mapper_count: self.mapper_count,
            reducer_count: 1,
            key_type: self.key_type,
            value_type: self.value_type,
            input_format: self.input_format,
            output_format: self.output_format,
            input_glob: pattern.to_string(),
            output_dir: staging.clone(),
            compress_output: false,
        };

        info!(
            pattern,
            destination = %destination.display(),
            mappers = self.mapper_count,
            files = sources.len(),
            "submitting merge job"
        );

        // Submit & wait
        let started = Instant::now();
        match self.jobs.submit(&spec) {
            JobOutcome::Success => {
                info!(elapsed = ?started.elapsed(), "merge job finished");
            }
            JobOutcome::Failure(cause) => {
                cleanup_staging(self.fs, &staging);
                return Err(MergeError::JobExecution(cause));
            }
        }

        // Commit; on failure the staging directory is kept for diagnosis
        self.commit(&staging, destination)?;

        // Cleanup
        cleanup_staging(self.fs, &staging);
        if delete_source {
            delete_sources(self.fs, &sources);
        }

        info!(destination = %destination.display(), "distributed merge complete");
        Ok(MergeOutcome {
            output_path: destination.to_path_buf(),
            files_merged: sources.len(),
        })
    }

    fn commit(&self, staging: &Path, destination: &Path) -> MergeResult<()> {
        let part = staging.join(REDUCE_PART_FILE);
        if !self.fs.exists(&part) {
            return Err(MergeError::Commit(format!(
                "reduce output {} is missing",
                part.display()
            )));
        }
        if self.fs.exists(destination) {
            return Err(MergeError::Commit(format!(
                "destination {} appeared during the merge",
                destination.display()
            )));
        }
        self.fs.rename(&part, destination).map_err(|e| {
            MergeError::Commit(format!(
                "rename {} -> {} failed: {e}",
                part.display(),
                destination.display()
            ))
        })
    }
}

/// Remove the intermediate directory. The merge's outcome is already
/// decided; failures here are logged, not escalated.
fn cleanup_staging(fs: &dyn FileSystem, staging: &Path) {
    if !fs.exists(staging) {
        return;
    }
    if let Err(e) = fs.remove_dir_all(staging) {
        warn!(
            staging = %staging.display(),
            error = %e,
            "failed to remove intermediate merge directory"
        );
    }
}
