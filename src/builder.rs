//! Builder for creating MergeEngine instances.

use std::path::PathBuf;
use std::sync::Arc;

use crate::codec::{KvCodec, RecordCodec};
use crate::config::{MergePlan, MergeRequest, MergeStrategy};
use crate::engine::MergeEngine;
use crate::error::{MergeError, MergeResult};
use crate::fs::{FileSystem, LocalFs};
use crate::job::{JobClient, LocalJobClient};

/// Fluent builder for a `MergeEngine`.
///
/// Defaults to the local filesystem, the built-in codec, and the in-process
/// job host; each capability can be swapped for tests or real deployments.
pub struct MergeBuilder {
    input_glob: Option<String>,
    output_path: Option<PathBuf>,
    delete_source: bool,
    strategy: MergeStrategy,
    fs: Option<Arc<dyn FileSystem>>,
    codec: Option<Arc<dyn RecordCodec>>,
    jobs: Option<Arc<dyn JobClient>>,
}

impl MergeBuilder {
    pub fn new() -> Self {
        Self {
            input_glob: None,
            output_path: None,
            delete_source: false,
            strategy: MergeStrategy::default(),
            fs: None,
            codec: None,
            jobs: None,
        }
    }

    /// Seed the builder from an already-constructed request.
    pub fn from_request(request: MergeRequest) -> Self {
        let mut builder = Self::new();
        builder.input_glob = Some(request.input_glob);
        builder.output_path = Some(request.output_path);
        builder.delete_source = request.delete_source;
        builder.strategy = request.strategy;
        builder
    }

    /// Seed the builder from a declarative plan.
    pub fn from_plan(plan: MergePlan) -> MergeResult<Self> {
        Ok(Self::from_request(plan.into_request()?))
    }

    /// Set the input glob pattern.
    pub fn input(mut self, pattern: impl Into<String>) -> Self {
        self.input_glob = Some(pattern.into());
        self
    }

    /// Set the destination path.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set whether sources are deleted after a successful merge.
    pub fn delete_source(mut self, delete_source: bool) -> Self {
        self.delete_source = delete_source;
        self
    }

    /// Set the merge strategy.
    pub fn strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Use a custom filesystem implementation.
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Use a custom record codec.
    pub fn with_codec(mut self, codec: Arc<dyn RecordCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Use a custom job client.
    pub fn with_job_client(mut self, jobs: Arc<dyn JobClient>) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Validate and build the engine.
    pub fn build(self) -> MergeResult<MergeEngine> {
        let input_glob = self.input_glob.ok_or_else(|| {
            MergeError::InvalidRequest("input pattern is required".to_string())
        })?;
        let output_path = self.output_path.ok_or_else(|| {
            MergeError::InvalidRequest("output path is required".to_string())
        })?;

        let request = MergeRequest::new(input_glob, output_path, self.strategy)
            .with_delete_source(self.delete_source);
        request.validate()?;

        let fs: Arc<dyn FileSystem> = self.fs.unwrap_or_else(|| Arc::new(LocalFs::new()));
        let codec: Arc<dyn RecordCodec> = self.codec.unwrap_or_else(|| Arc::new(KvCodec::new()));
        let jobs: Arc<dyn JobClient> = self
            .jobs
            .unwrap_or_else(|| Arc::new(LocalJobClient::new(fs.clone(), codec.clone())));

        Ok(MergeEngine::new(fs, codec, jobs, request))
    }
}

impl Default for MergeBuilder {
    fn default() -> Self {
        MergeBuilder::new()
    }
}
