//! Declarative merge plan loaded from JSON.

use serde::Deserialize;

use crate::codec::RecordType;
use crate::error::{MergeError, MergeResult};
use crate::job::JobFormat;

use super::request::{MergeRequest, MergeStrategy};
use super::{DEFAULT_DELIMITER, DEFAULT_MAPPER_COUNT};

/// Configuration for a single merge, as written in a plan file.
///
/// String-typed fields are parsed when the plan is converted into a
/// `MergeRequest`; unknown names surface as `InvalidRequest`.
#[derive(Debug, Clone, Deserialize)]
pub struct MergePlan {
    /// Glob pattern of the files to be merged
    pub input: String,
    /// Destination file
    pub output: String,
    /// Strategy: "local-text", "local-record", or "distributed"
    #[serde(default)]
    pub strategy: Option<String>,
    /// Delete sources after a successful merge
    #[serde(default)]
    pub delete_source: bool,
    /// Delimiter for the text strategy
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Record key type: "long", "text", or "bytes"
    #[serde(default)]
    pub key_type: Option<String>,
    /// Record value type: "long", "text", or "bytes"
    #[serde(default)]
    pub value_type: Option<String>,
    /// Map task count for the distributed strategy
    #[serde(default)]
    pub mapper_count: Option<usize>,
    /// Job input format: "record" or "text"
    #[serde(default)]
    pub input_format: Option<String>,
    /// Job output format: "record" or "text"
    #[serde(default)]
    pub output_format: Option<String>,
}

impl MergePlan {
    /// Parse a plan from a JSON document.
    pub fn from_json(json: &str) -> MergeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MergeError::InvalidRequest(format!("invalid merge plan: {e}")))
    }

    /// Convert the plan into a validated request.
    pub fn into_request(self) -> MergeResult<MergeRequest> {
        let key_type = parse_record_type(self.key_type.as_deref(), RecordType::Long)?;
        let value_type = parse_record_type(self.value_type.as_deref(), RecordType::Text)?;

        let strategy = match self.strategy.as_deref().unwrap_or("distributed") {
            "local-text" => MergeStrategy::LocalText {
                delimiter: self
                    .delimiter
                    .unwrap_or_else(|| DEFAULT_DELIMITER.to_string()),
            },
            "local-record" => MergeStrategy::LocalRecord {
                key_type,
                value_type,
            },
            "distributed" => MergeStrategy::Distributed {
                mapper_count: self.mapper_count.unwrap_or(DEFAULT_MAPPER_COUNT),
                key_type,
                value_type,
                input_format: parse_job_format(self.input_format.as_deref())?,
                output_format: parse_job_format(self.output_format.as_deref())?,
            },
            other => {
                return Err(MergeError::InvalidRequest(format!(
                    "unknown strategy: {other}"
                )));
            }
        };

        let request = MergeRequest::new(self.input, self.output, strategy)
            .with_delete_source(self.delete_source);
        request.validate()?;
        Ok(request)
    }
}

fn parse_record_type(s: Option<&str>, default: RecordType) -> MergeResult<RecordType> {
    match s {
        None => Ok(default),
        Some(s) => s
            .parse::<RecordType>()
            .map_err(|e| MergeError::InvalidRequest(e.to_string())),
    }
}

fn parse_job_format(s: Option<&str>) -> MergeResult<JobFormat> {
    match s {
        None => Ok(JobFormat::Record),
        Some(s) => s
            .parse::<JobFormat>()
            .map_err(MergeError::InvalidRequest),
    }
}
