//! Typed-record codec boundary.
//!
//! This module provides:
//! - `RecordType`: The key/value type vocabulary
//! - `RecordValue`: A single decoded key or value
//! - `RecordReader` / `RecordWriter`: Streaming record access
//! - `RecordCodec`: The pluggable codec seam
//! - `KvCodec`: Built-in length-prefixed binary codec
//!
//! The merge engine never interprets record contents; it only moves typed
//! key/value pairs from readers to a writer in order. Implement `RecordCodec`
//! to plug in a different on-disk encoding.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

mod kv;
pub use kv::KvCodec;

/// The type of a record key or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// 64-bit signed integer
    Long,
    /// UTF-8 string
    Text,
    /// Raw byte sequence
    Bytes,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Long => write!(f, "long"),
            RecordType::Text => write!(f, "text"),
            RecordType::Bytes => write!(f, "bytes"),
        }
    }
}

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "long" | "i64" => Ok(RecordType::Long),
            "text" | "string" => Ok(RecordType::Text),
            "bytes" => Ok(RecordType::Bytes),
            _ => Err(UnknownRecordType(s.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized record type name.
#[derive(Debug, Error)]
#[error("unknown record type: {0}")]
pub struct UnknownRecordType(pub String);

/// A single decoded key or value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValue {
    Long(i64),
    Text(String),
    Bytes(Vec<u8>),
}

impl RecordValue {
    /// The type this value carries.
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordValue::Long(_) => RecordType::Long,
            RecordValue::Text(_) => RecordType::Text,
            RecordValue::Bytes(_) => RecordType::Bytes,
        }
    }
}

impl From<i64> for RecordValue {
    fn from(v: i64) -> Self {
        RecordValue::Long(v)
    }
}

impl From<&str> for RecordValue {
    fn from(v: &str) -> Self {
        RecordValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for RecordValue {
    fn from(v: Vec<u8>) -> Self {
        RecordValue::Bytes(v)
    }
}

/// Errors that can occur while encoding or decoding records.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stream's declared types disagree with the configured types.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: RecordType,
        found: RecordType,
    },

    /// The stream is not a valid record stream or ends mid-record.
    #[error("corrupt record stream: {0}")]
    Corrupt(String),

    /// I/O error while reading or writing the stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Streaming reader over a typed-record file.
pub trait RecordReader: Send {
    /// Read the next record, or `None` at a clean end of stream.
    fn next(&mut self) -> Result<Option<(RecordValue, RecordValue)>, CodecError>;
}

/// Streaming writer producing a typed-record file.
pub trait RecordWriter: Send {
    /// Append one record to the stream.
    fn append(&mut self, key: &RecordValue, value: &RecordValue) -> Result<(), CodecError>;

    /// Flush buffered data and finalize the stream.
    ///
    /// Must be called before the writer is dropped for the output to be
    /// considered durable.
    fn finish(&mut self) -> Result<(), CodecError>;
}

/// A pluggable encoding for typed key/value records.
pub trait RecordCodec: Send + Sync + fmt::Debug {
    /// Open a reader bound to the given key/value types.
    ///
    /// Fails with `CodecError::TypeMismatch` if the stream declares types
    /// other than the configured ones.
    fn open_reader(
        &self,
        stream: Box<dyn Read + Send>,
        key_type: RecordType,
        value_type: RecordType,
    ) -> Result<Box<dyn RecordReader>, CodecError>;

    /// Open a writer producing records of the given key/value types.
    fn open_writer(
        &self,
        stream: Box<dyn Write + Send>,
        key_type: RecordType,
        value_type: RecordType,
    ) -> Result<Box<dyn RecordWriter>, CodecError>;
}
