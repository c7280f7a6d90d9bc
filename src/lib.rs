//! # mergeio
//!
//! A file-merge orchestration library for batch data pipelines.
//!
//! ## Overview
//!
//! mergeio consolidates many small files — typically one per worker of a
//! batch job — into a single output file, preserving record order within
//! each source and glob-match order across sources. It provides:
//!
//! - **Local text merge**: Raw byte concatenation with an optional delimiter
//! - **Local record merge**: Typed key/value records re-emitted through a
//!   pluggable codec
//! - **Distributed merge**: An identity job with a single reduce task,
//!   submitted to a pluggable job host, followed by a commit rename
//! - **Capability seams**: `FileSystem`, `RecordCodec`, and `JobClient`
//!   traits so every external dependency can be substituted in tests
//! - **All-or-nothing semantics**: No partial output is left at the
//!   destination on failure, and a pre-existing destination is never
//!   overwritten
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mergeio::{MergeBuilder, MergeStrategy, RecordType};
//!
//! fn main() -> Result<(), mergeio::MergeError> {
//!     let engine = MergeBuilder::new()
//!         .input("data/part-*")
//!         .output("data/merged.out")
//!         .strategy(MergeStrategy::local_record(
//!             RecordType::Long,
//!             RecordType::Text,
//!         ))
//!         .build()?;
//!
//!     let outcome = engine.run()?;
//!     println!("merged {} files", outcome.files_merged);
//!     Ok(())
//! }
//! ```
//!
//! ## Ordering and concurrency
//!
//! The glob expansion order is significant: it decides the order of bytes
//! and records in the merged output. Each merge invocation runs
//! single-threaded; the distributed strategy blocks at job submission until
//! the host reports a terminal status. Pre-existence checks on the
//! destination and the intermediate directory are the only concurrency
//! control — callers must not run two merges against the same destination
//! concurrently.

// Core modules
pub mod builder;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod fs;
pub mod job;
pub mod merge;

// CLI shell (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use builder::MergeBuilder;
pub use codec::{KvCodec, RecordCodec, RecordReader, RecordType, RecordValue, RecordWriter};
pub use config::{MergePlan, MergeRequest, MergeStrategy};
pub use engine::MergeEngine;
pub use error::{MergeError, MergeResult};
pub use fs::{FileSystem, LocalFs, MemoryFs};
pub use job::{JobClient, JobFormat, JobOutcome, JobSpec, LocalJobClient};
pub use merge::{DistributedMerger, MergeOutcome, RecordMerger, TextMerger};
