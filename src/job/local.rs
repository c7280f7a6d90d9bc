//! In-process job host.
//!
//! Runs the identity merge job on the calling thread: every glob match is
//! read through the spec's input format and re-emitted, unmodified, into a
//! single `part-00000` under the job's output directory. This stands in for
//! a real cluster host in local runs and tests.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::{debug, info};

use super::{JobClient, JobOutcome, JobSpec, REDUCE_PART_FILE};
use crate::codec::RecordCodec;
use crate::fs::FileSystem;

/// `JobClient` that executes merge jobs in-process.
#[derive(Debug)]
pub struct LocalJobClient {
    fs: Arc<dyn FileSystem>,
    codec: Arc<dyn RecordCodec>,
}

impl LocalJobClient {
    /// Create a local job host over the given filesystem and codec.
    pub fn new(fs: Arc<dyn FileSystem>, codec: Arc<dyn RecordCodec>) -> Self {
        Self { fs, codec }
    }

    fn run(&self, spec: &JobSpec) -> Result<u64, String> {
        if spec.input_format != spec.output_format {
            return Err(format!(
                "identity merge requires matching formats, got {} -> {}",
                spec.input_format, spec.output_format
            ));
        }
        if spec.compress_output {
            return Err("compressed output is not supported".to_string());
        }

        let sources = self.fs.glob(&spec.input_glob).map_err(|e| e.to_string())?;
        self.fs
            .create_dir_all(&spec.output_dir)
            .map_err(|e| e.to_string())?;
        let part = spec.output_dir.join(REDUCE_PART_FILE);

        match spec.output_format {
            super::JobFormat::Record => {
                let sink = self.fs.create_new(&part).map_err(|e| e.to_string())?;
                let mut writer = self
                    .codec
                    .open_writer(sink, spec.key_type, spec.value_type)
                    .map_err(|e| e.to_string())?;

                let mut records = 0u64;
                for source in &sources {
                    let stream = self.fs.open_read(source).map_err(|e| e.to_string())?;
                    let mut reader = self
                        .codec
                        .open_reader(stream, spec.key_type, spec.value_type)
                        .map_err(|e| format!("{}: {e}", source.display()))?;
                    while let Some((key, value)) =
                        reader.next().map_err(|e| format!("{}: {e}", source.display()))?
                    {
                        writer.append(&key, &value).map_err(|e| e.to_string())?;
                        records += 1;
                    }
                    debug!(source = %source.display(), "map input consumed");
                }
                writer.finish().map_err(|e| e.to_string())?;
                Ok(records)
            }
            super::JobFormat::Text => {
                let mut sink = self.fs.create_new(&part).map_err(|e| e.to_string())?;
                let mut bytes = 0u64;
                for source in &sources {
                    let mut stream = self.fs.open_read(source).map_err(|e| e.to_string())?;
                    bytes += io::copy(&mut stream, &mut sink).map_err(|e| e.to_string())?;
                    debug!(source = %source.display(), "map input consumed");
                }
                sink.flush().map_err(|e| e.to_string())?;
                Ok(bytes)
            }
        }
    }
}

impl JobClient for LocalJobClient {
    fn submit(&self, spec: &JobSpec) -> JobOutcome {
        info!(
            job = %spec.name,
            mappers = spec.mapper_count,
            reducers = spec.reducer_count,
            input = %spec.input_glob,
            "running job in-process"
        );
        match self.run(spec) {
            Ok(units) => {
                info!(job = %spec.name, units, "job finished");
                JobOutcome::Success
            }
            Err(cause) => JobOutcome::Failure(cause),
        }
    }
}
