//! CLI argument definitions for the mergeio binary.
//!
//! The CLI is a thin shell: it converts flags and `-D` property overrides
//! into a validated `MergeRequest` and hands it to the engine. Everything
//! with design content lives in the library.
//!
//! Supported properties:
//! - `key.type` — record key type (`long`, `text`, `bytes`)
//! - `value.type` — record value type
//! - `delimiter` — delimiter for the local text strategy
//! - `merge.format` — local strategy selection (`record` or `text`)

use clap::Parser;

use crate::codec::RecordType;
use crate::config::{DEFAULT_MAPPER_COUNT, MergeRequest, MergeStrategy};
use crate::error::{MergeError, MergeResult};

/// Merge many small files into a single output file.
#[derive(Debug, Parser)]
#[command(name = "mergeio", version, about)]
pub struct MergeCli {
    /// Glob pattern of the files to be merged
    #[arg(long)]
    pub input: String,

    /// Destination file for the merged output
    #[arg(long)]
    pub output: String,

    /// Number of map tasks for the distributed strategy
    #[arg(long, default_value_t = DEFAULT_MAPPER_COUNT)]
    pub mapper: usize,

    /// Merge locally instead of submitting a job
    #[arg(long)]
    pub localmerge: bool,

    /// Delete the source files after the destination is written
    #[arg(long)]
    pub deletesource: bool,

    /// Property overrides, e.g. -D key.type=long
    #[arg(short = 'D', value_name = "property=value", value_parser = parse_property)]
    pub property: Vec<(String, String)>,
}

impl MergeCli {
    /// Convert the parsed arguments into a merge request.
    pub fn into_request(self) -> MergeResult<MergeRequest> {
        let mut key_type = RecordType::Long;
        let mut value_type = RecordType::Text;
        let mut delimiter = String::new();
        let mut local_format = "record".to_string();

        for (name, value) in &self.property {
            match name.as_str() {
                "key.type" => {
                    key_type = value
                        .parse()
                        .map_err(|e: crate::codec::UnknownRecordType| {
                            MergeError::InvalidRequest(e.to_string())
                        })?;
                }
                "value.type" => {
                    value_type = value
                        .parse()
                        .map_err(|e: crate::codec::UnknownRecordType| {
                            MergeError::InvalidRequest(e.to_string())
                        })?;
                }
                "delimiter" => delimiter = value.clone(),
                "merge.format" => local_format = value.clone(),
                other => {
                    return Err(MergeError::InvalidRequest(format!(
                        "unknown property: {other}"
                    )));
                }
            }
        }

        let strategy = if self.localmerge {
            match local_format.as_str() {
                "text" => MergeStrategy::LocalText { delimiter },
                "record" => MergeStrategy::local_record(key_type, value_type),
                other => {
                    return Err(MergeError::InvalidRequest(format!(
                        "unknown merge.format: {other}"
                    )));
                }
            }
        } else {
            MergeStrategy::distributed(self.mapper, key_type, value_type)
        };

        let request = MergeRequest::new(self.input, self.output, strategy)
            .with_delete_source(self.deletesource);
        request.validate()?;
        Ok(request)
    }
}

/// Parse a `property=value` pair.
fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected property=value, got '{s}'")),
    }
}
