//! Job execution boundary for the distributed merge strategy.
//!
//! This module provides:
//! - `JobSpec`: Specification of an identity merge job
//! - `JobFormat`: Input/output format selection for the job
//! - `JobOutcome`: Terminal status reported by the execution host
//! - `JobClient`: The pluggable, blocking submission seam
//! - `LocalJobClient`: In-process job host for local runs and tests
//!
//! A merge job is always an identity transform with exactly one reduce task:
//! the job exists purely to harness the host's parallel read and ordered
//! shuffle into a single output partition.

use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::codec::RecordType;

mod local;
pub use local::LocalJobClient;

/// Name of the single reduce partition inside the job output directory.
pub const REDUCE_PART_FILE: &str = "part-00000";

/// File format a merge job reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobFormat {
    /// Typed key/value records through the configured codec
    Record,
    /// Raw byte streams
    Text,
}

impl fmt::Display for JobFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobFormat::Record => write!(f, "record"),
            JobFormat::Text => write!(f, "text"),
        }
    }
}

impl FromStr for JobFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "record" | "seq" => Ok(JobFormat::Record),
            "text" => Ok(JobFormat::Text),
            other => Err(format!("unknown job format: {other}")),
        }
    }
}

/// Specification for one identity merge job.
///
/// `reducer_count` is always 1 for merges: more than one reduce task would
/// partition the records across multiple output files.
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// Job name reported to the execution host
    pub name: String,
    /// Number of map tasks reading the inputs
    pub mapper_count: usize,
    /// Number of reduce tasks (1 for merges)
    pub reducer_count: usize,
    /// Key type for map output and job output
    pub key_type: RecordType,
    /// Value type for map output and job output
    pub value_type: RecordType,
    /// Format the job reads its inputs with
    pub input_format: JobFormat,
    /// Format the job writes its output with
    pub output_format: JobFormat,
    /// Glob pattern of the job inputs
    pub input_glob: String,
    /// Directory the job writes its partitions into
    pub output_dir: PathBuf,
    /// Whether the job output is compressed (always false for merges)
    pub compress_output: bool,
}

/// Terminal status of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job ran to completion.
    Success,
    /// The job failed; the cause is host-specific.
    Failure(String),
}

/// Blocking job submission seam.
///
/// `submit` suspends the calling thread until the execution host reports a
/// terminal status. No timeout is enforced here; callers that cannot tolerate
/// a hung host must wrap the call themselves.
pub trait JobClient: Send + Sync + Debug {
    /// Submit a job and wait for its terminal status.
    fn submit(&self, spec: &JobSpec) -> JobOutcome;
}
