//! Tests for MergePlan parsing and conversion.

use std::path::Path;

use crate::codec::RecordType;
use crate::config::{MergePlan, MergeStrategy};
use crate::error::MergeError;

#[test]
fn minimal_plan_defaults_to_distributed() {
    let plan = MergePlan::from_json(r#"{"input": "data/part-*", "output": "data/merged.out"}"#)
        .expect("parse plan");
    let request = plan.into_request().expect("convert plan");

    assert_eq!(request.input_glob, "data/part-*");
    assert_eq!(request.output_path, Path::new("data/merged.out"));
    assert!(!request.delete_source);
    assert!(matches!(
        request.strategy,
        MergeStrategy::Distributed { mapper_count: 1, .. }
    ));
}

#[test]
fn record_plan_carries_types() {
    let json = r#"{
        "input": "part-*",
        "output": "merged.out",
        "strategy": "local-record",
        "key_type": "text",
        "value_type": "bytes",
        "delete_source": true
    }"#;
    let request = MergePlan::from_json(json)
        .expect("parse plan")
        .into_request()
        .expect("convert plan");

    assert!(request.delete_source);
    assert_eq!(
        request.strategy,
        MergeStrategy::LocalRecord {
            key_type: RecordType::Text,
            value_type: RecordType::Bytes,
        }
    );
}

#[test]
fn text_plan_carries_delimiter() {
    let json = r#"{
        "input": "part-*",
        "output": "merged.out",
        "strategy": "local-text",
        "delimiter": "\n"
    }"#;
    let request = MergePlan::from_json(json)
        .expect("parse plan")
        .into_request()
        .expect("convert plan");

    assert_eq!(
        request.strategy,
        MergeStrategy::LocalText {
            delimiter: "\n".to_string(),
        }
    );
}

#[test]
fn unknown_strategy_is_invalid() {
    let json = r#"{"input": "a", "output": "b", "strategy": "sideways"}"#;
    let err = MergePlan::from_json(json)
        .expect("parse plan")
        .into_request()
        .expect_err("expected invalid request");
    assert!(matches!(err, MergeError::InvalidRequest(_)));
}

#[test]
fn unknown_record_type_is_invalid() {
    let json = r#"{"input": "a", "output": "b", "strategy": "local-record", "key_type": "float"}"#;
    let err = MergePlan::from_json(json)
        .expect("parse plan")
        .into_request()
        .expect_err("expected invalid request");
    assert!(matches!(err, MergeError::InvalidRequest(_)));
}

#[test]
fn malformed_json_is_invalid() {
    let err = MergePlan::from_json("{not json").expect_err("expected parse failure");
    assert!(matches!(err, MergeError::InvalidRequest(_)));
}
