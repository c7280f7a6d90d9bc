//! Tests for the distributed merge strategy.
//!
//! The job host is either the in-process `LocalJobClient` or a canned fake,
//! so no cluster is involved anywhere here.

use std::path::Path;
use std::sync::Arc;

use crate::codec::{KvCodec, RecordCodec, RecordType};
use crate::error::MergeError;
use crate::fs::{FileSystem, MemoryFs};
use crate::job::{JobClient, JobOutcome, JobSpec, LocalJobClient};
use crate::merge::DistributedMerger;
use crate::tests::support::long_text;

/// Job host that reports failure without touching the filesystem.
#[derive(Debug)]
struct FailingJobClient;

impl JobClient for FailingJobClient {
    fn submit(&self, _spec: &JobSpec) -> JobOutcome {
        JobOutcome::Failure("task attempt 0 failed".to_string())
    }
}

/// Job host that claims success but never writes the reduce partition.
#[derive(Debug)]
struct VanishingOutputJobClient {
    fs: Arc<MemoryFs>,
}

impl JobClient for VanishingOutputJobClient {
    fn submit(&self, spec: &JobSpec) -> JobOutcome {
        // Leaves debris in the staging directory, but no part file
        self.fs.create_dir_all(&spec.output_dir).unwrap();
        self.fs.insert(spec.output_dir.join("_logs"), "attempt log");
        JobOutcome::Success
    }
}

fn seed_record_file(fs: &MemoryFs, path: &str, records: &[(i64, &str)]) {
    let sink = fs.create_new(Path::new(path)).expect("create source");
    let mut writer = KvCodec::new()
        .open_writer(sink, RecordType::Long, RecordType::Text)
        .expect("open writer");
    for (key, value) in records {
        let (k, v) = long_text(*key, value);
        writer.append(&k, &v).expect("append");
    }
    writer.finish().expect("finish");
}

fn read_record_file(fs: &MemoryFs, path: &Path) -> Vec<(crate::codec::RecordValue, crate::codec::RecordValue)> {
    let stream = fs.open_read(path).expect("open");
    let mut reader = KvCodec::new()
        .open_reader(stream, RecordType::Long, RecordType::Text)
        .expect("open reader");
    let mut records = Vec::new();
    while let Some(record) = reader.next().expect("read") {
        records.push(record);
    }
    records
}

#[test]
fn successful_merge_commits_renames_and_cleans_up() {
    let fs = Arc::new(MemoryFs::new());
    seed_record_file(&fs, "data/part-00000", &[(1, "a")]);
    seed_record_file(&fs, "data/part-00001", &[(2, "b")]);
    seed_record_file(&fs, "data/part-00002", &[(3, "c")]);

    let codec = Arc::new(KvCodec::new());
    let jobs = LocalJobClient::new(fs.clone(), codec);
    let destination = Path::new("data/merged.out");

    let outcome = DistributedMerger::new(
        fs.as_ref(),
        &jobs,
        3,
        RecordType::Long,
        RecordType::Text,
    )
    .merge("data/part-*", destination, true)
    .expect("merge");

    assert_eq!(outcome.files_merged, 3);

    // Exactly one output file with every record in order
    assert_eq!(
        read_record_file(&fs, destination),
        vec![long_text(1, "a"), long_text(2, "b"), long_text(3, "c")]
    );
    // Intermediate directory gone
    assert!(!fs.exists(Path::new("data/merge-tmp-dir")));
    // delete_source removed every input
    assert!(!fs.exists(Path::new("data/part-00000")));
    assert!(!fs.exists(Path::new("data/part-00001")));
    assert!(!fs.exists(Path::new("data/part-00002")));
}

#[test]
fn job_failure_leaves_sources_and_no_destination() {
    let fs = Arc::new(MemoryFs::new());
    seed_record_file(&fs, "data/part-00000", &[(1, "a")]);

    let destination = Path::new("data/merged.out");
    let err = DistributedMerger::new(
        fs.as_ref(),
        &FailingJobClient,
        2,
        RecordType::Long,
        RecordType::Text,
    )
    .merge("data/part-*", destination, true)
    .expect_err("expected job failure");

    assert!(matches!(err, MergeError::JobExecution(_)));
    assert!(!fs.exists(destination));
    assert!(!fs.exists(Path::new("data/merge-tmp-dir")));
    // Sources untouched even though delete_source was requested
    assert!(fs.exists(Path::new("data/part-00000")));
}

#[test]
fn missing_reduce_partition_is_a_commit_error_and_staging_is_kept() {
    let fs = Arc::new(MemoryFs::new());
    seed_record_file(&fs, "data/part-00000", &[(1, "a")]);

    let jobs = VanishingOutputJobClient { fs: fs.clone() };
    let destination = Path::new("data/merged.out");

    let err = DistributedMerger::new(
        fs.as_ref(),
        &jobs,
        1,
        RecordType::Long,
        RecordType::Text,
    )
    .merge("data/part-*", destination, false)
    .expect_err("expected commit failure");

    assert!(matches!(err, MergeError::Commit(_)));
    assert!(!fs.exists(destination));
    // Staging kept for diagnosis on commit failure
    assert!(fs.exists(Path::new("data/merge-tmp-dir")));
    assert!(fs.exists(Path::new("data/merge-tmp-dir/_logs")));
}

#[test]
fn stale_intermediate_directory_is_a_precondition_error() {
    let fs = Arc::new(MemoryFs::new());
    seed_record_file(&fs, "data/part-00000", &[(1, "a")]);
    fs.create_dir_all(Path::new("data/merge-tmp-dir")).unwrap();

    let codec = Arc::new(KvCodec::new());
    let jobs = LocalJobClient::new(fs.clone(), codec);
    let destination = Path::new("data/merged.out");

    let err = DistributedMerger::new(
        fs.as_ref(),
        &jobs,
        1,
        RecordType::Long,
        RecordType::Text,
    )
    .merge("data/part-*", destination, false)
    .expect_err("expected precondition failure");

    assert!(matches!(err, MergeError::IntermediateExists(_)));
    assert!(!fs.exists(destination));
}

#[test]
fn existing_destination_is_checked_before_submission() {
    let fs = Arc::new(MemoryFs::new());
    seed_record_file(&fs, "data/part-00000", &[(1, "a")]);
    fs.insert("data/merged.out", "precious");

    let destination = Path::new("data/merged.out");
    // A failing client proves the job is never submitted
    let err = DistributedMerger::new(
        fs.as_ref(),
        &FailingJobClient,
        1,
        RecordType::Long,
        RecordType::Text,
    )
    .merge("data/part-*", destination, false)
    .expect_err("expected precondition failure");

    assert!(matches!(err, MergeError::DestinationExists(_)));
    assert_eq!(fs.contents(destination).expect("contents"), b"precious");
}

#[test]
fn empty_glob_fails_before_submission() {
    let fs = Arc::new(MemoryFs::new());
    let destination = Path::new("data/merged.out");

    let err = DistributedMerger::new(
        fs.as_ref(),
        &FailingJobClient,
        1,
        RecordType::Long,
        RecordType::Text,
    )
    .merge("data/part-*", destination, false)
    .expect_err("expected no match");

    assert!(matches!(err, MergeError::NoMatch(_)));
}
