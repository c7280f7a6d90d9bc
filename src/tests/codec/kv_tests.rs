//! Tests for the built-in length-prefixed codec.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use crate::codec::{CodecError, KvCodec, RecordCodec, RecordType, RecordValue};

/// In-memory sink whose buffer survives the boxed writer.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl std::io::Write for SharedBuf {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn encode(key_type: RecordType, value_type: RecordType, records: &[(RecordValue, RecordValue)]) -> Vec<u8> {
    let buf = SharedBuf::default();
    let mut writer = KvCodec::new()
        .open_writer(Box::new(buf.clone()), key_type, value_type)
        .expect("open writer");
    for (key, value) in records {
        writer.append(key, value).expect("append");
    }
    writer.finish().expect("finish");
    buf.contents()
}

fn decode(
    bytes: Vec<u8>,
    key_type: RecordType,
    value_type: RecordType,
) -> Result<Vec<(RecordValue, RecordValue)>, CodecError> {
    let mut reader = KvCodec::new().open_reader(Box::new(Cursor::new(bytes)), key_type, value_type)?;
    let mut records = Vec::new();
    while let Some(record) = reader.next()? {
        records.push(record);
    }
    Ok(records)
}

#[test]
fn long_text_records_survive_encode_decode() {
    let records = vec![
        (RecordValue::Long(1), RecordValue::Text("a".to_string())),
        (RecordValue::Long(2), RecordValue::Text("".to_string())),
        (RecordValue::Long(-7), RecordValue::Text("héllo".to_string())),
    ];
    let bytes = encode(RecordType::Long, RecordType::Text, &records);
    let decoded = decode(bytes, RecordType::Long, RecordType::Text).expect("decode");
    assert_eq!(decoded, records);
}

#[test]
fn bytes_values_survive_encode_decode() {
    let records = vec![(
        RecordValue::Text("blob".to_string()),
        RecordValue::Bytes(vec![0, 1, 2, 255]),
    )];
    let bytes = encode(RecordType::Text, RecordType::Bytes, &records);
    let decoded = decode(bytes, RecordType::Text, RecordType::Bytes).expect("decode");
    assert_eq!(decoded, records);
}

#[test]
fn empty_stream_decodes_to_no_records() {
    let bytes = encode(RecordType::Long, RecordType::Text, &[]);
    let decoded = decode(bytes, RecordType::Long, RecordType::Text).expect("decode");
    assert!(decoded.is_empty());
}

#[test]
fn reader_rejects_mismatched_key_type() {
    let bytes = encode(
        RecordType::Text,
        RecordType::Text,
        &[(
            RecordValue::Text("k".to_string()),
            RecordValue::Text("v".to_string()),
        )],
    );
    let err = decode(bytes, RecordType::Long, RecordType::Text).expect_err("expected mismatch");
    assert!(matches!(
        err,
        CodecError::TypeMismatch {
            expected: RecordType::Long,
            found: RecordType::Text,
        }
    ));
}

#[test]
fn writer_rejects_wrongly_typed_value() {
    let buf = SharedBuf::default();
    let mut writer = KvCodec::new()
        .open_writer(Box::new(buf), RecordType::Long, RecordType::Text)
        .expect("open writer");
    let err = writer
        .append(&RecordValue::Long(1), &RecordValue::Long(2))
        .expect_err("expected mismatch");
    assert!(matches!(err, CodecError::TypeMismatch { .. }));
}

#[test]
fn truncated_stream_is_corrupt() {
    let mut bytes = encode(
        RecordType::Long,
        RecordType::Text,
        &[(RecordValue::Long(1), RecordValue::Text("abc".to_string()))],
    );
    bytes.truncate(bytes.len() - 2);
    let err = decode(bytes, RecordType::Long, RecordType::Text).expect_err("expected corrupt");
    assert!(matches!(err, CodecError::Corrupt(_)));
}

#[test]
fn bad_magic_is_corrupt() {
    let err = decode(b"NOPE\x01\x02".to_vec(), RecordType::Long, RecordType::Text)
        .expect_err("expected corrupt");
    assert!(matches!(err, CodecError::Corrupt(_)));
}
