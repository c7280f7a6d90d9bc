//! Built-in length-prefixed binary codec.
//!
//! Stream layout: a 6-byte header (4-byte magic, key type tag, value type
//! tag) followed by records. A `Long` is 8 bytes big-endian; `Text` and
//! `Bytes` are a 4-byte big-endian length followed by that many bytes.

use std::io::{Read, Write};

use super::{CodecError, RecordCodec, RecordReader, RecordType, RecordValue, RecordWriter};

const MAGIC: &[u8; 4] = b"KVF1";

fn type_tag(t: RecordType) -> u8 {
    match t {
        RecordType::Long => 0x01,
        RecordType::Text => 0x02,
        RecordType::Bytes => 0x03,
    }
}

fn tag_type(tag: u8) -> Result<RecordType, CodecError> {
    match tag {
        0x01 => Ok(RecordType::Long),
        0x02 => Ok(RecordType::Text),
        0x03 => Ok(RecordType::Bytes),
        other => Err(CodecError::Corrupt(format!(
            "unknown record type tag 0x{other:02x}"
        ))),
    }
}

/// Default codec for typed key/value files.
#[derive(Debug, Clone, Copy, Default)]
pub struct KvCodec;

impl KvCodec {
    /// Create a new codec instance.
    pub fn new() -> Self {
        KvCodec
    }
}

impl RecordCodec for KvCodec {
    fn open_reader(
        &self,
        mut stream: Box<dyn Read + Send>,
        key_type: RecordType,
        value_type: RecordType,
    ) -> Result<Box<dyn RecordReader>, CodecError> {
        let mut header = [0u8; 6];
        stream
            .read_exact(&mut header)
            .map_err(|_| CodecError::Corrupt("missing or truncated header".to_string()))?;
        if &header[..4] != MAGIC {
            return Err(CodecError::Corrupt("bad magic".to_string()));
        }

        let declared_key = tag_type(header[4])?;
        let declared_value = tag_type(header[5])?;
        if declared_key != key_type {
            return Err(CodecError::TypeMismatch {
                expected: key_type,
                found: declared_key,
            });
        }
        if declared_value != value_type {
            return Err(CodecError::TypeMismatch {
                expected: value_type,
                found: declared_value,
            });
        }

        Ok(Box::new(KvReader {
            stream,
            key_type,
            value_type,
        }))
    }

    fn open_writer(
        &self,
        mut stream: Box<dyn Write + Send>,
        key_type: RecordType,
        value_type: RecordType,
    ) -> Result<Box<dyn RecordWriter>, CodecError> {
        stream.write_all(MAGIC)?;
        stream.write_all(&[type_tag(key_type), type_tag(value_type)])?;
        Ok(Box::new(KvWriter {
            stream,
            key_type,
            value_type,
        }))
    }
}

struct KvReader {
    stream: Box<dyn Read + Send>,
    key_type: RecordType,
    value_type: RecordType,
}

impl KvReader {
    /// Fill `buf` completely, or report a clean end of stream if no bytes
    /// were available at a record boundary.
    fn fill(&mut self, buf: &mut [u8], at_boundary: bool) -> Result<bool, CodecError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.stream.read(&mut buf[filled..])?;
            if n == 0 {
                if filled == 0 && at_boundary {
                    return Ok(false);
                }
                return Err(CodecError::Corrupt("truncated record".to_string()));
            }
            filled += n;
        }
        Ok(true)
    }

    fn read_value(
        &mut self,
        record_type: RecordType,
        at_boundary: bool,
    ) -> Result<Option<RecordValue>, CodecError> {
        match record_type {
            RecordType::Long => {
                let mut buf = [0u8; 8];
                if !self.fill(&mut buf, at_boundary)? {
                    return Ok(None);
                }
                Ok(Some(RecordValue::Long(i64::from_be_bytes(buf))))
            }
            RecordType::Text | RecordType::Bytes => {
                let mut len_buf = [0u8; 4];
                if !self.fill(&mut len_buf, at_boundary)? {
                    return Ok(None);
                }
                let len = u32::from_be_bytes(len_buf) as usize;
                let mut data = vec![0u8; len];
                self.fill(&mut data, false)?;
                if record_type == RecordType::Text {
                    let text = String::from_utf8(data)
                        .map_err(|_| CodecError::Corrupt("invalid UTF-8 in text value".to_string()))?;
                    Ok(Some(RecordValue::Text(text)))
                } else {
                    Ok(Some(RecordValue::Bytes(data)))
                }
            }
        }
    }
}

impl RecordReader for KvReader {
    fn next(&mut self) -> Result<Option<(RecordValue, RecordValue)>, CodecError> {
        let Some(key) = self.read_value(self.key_type, true)? else {
            return Ok(None);
        };
        let value = self
            .read_value(self.value_type, false)?
            .ok_or_else(|| CodecError::Corrupt("record missing value".to_string()))?;
        Ok(Some((key, value)))
    }
}

struct KvWriter {
    stream: Box<dyn Write + Send>,
    key_type: RecordType,
    value_type: RecordType,
}

impl KvWriter {
    fn write_value(&mut self, value: &RecordValue) -> Result<(), CodecError> {
        match value {
            RecordValue::Long(v) => self.stream.write_all(&v.to_be_bytes())?,
            RecordValue::Text(v) => {
                self.stream.write_all(&(v.len() as u32).to_be_bytes())?;
                self.stream.write_all(v.as_bytes())?;
            }
            RecordValue::Bytes(v) => {
                self.stream.write_all(&(v.len() as u32).to_be_bytes())?;
                self.stream.write_all(v)?;
            }
        }
        Ok(())
    }
}

impl RecordWriter for KvWriter {
    fn append(&mut self, key: &RecordValue, value: &RecordValue) -> Result<(), CodecError> {
        if key.record_type() != self.key_type {
            return Err(CodecError::TypeMismatch {
                expected: self.key_type,
                found: key.record_type(),
            });
        }
        if value.record_type() != self.value_type {
            return Err(CodecError::TypeMismatch {
                expected: self.value_type,
                found: value.record_type(),
            });
        }
        self.write_value(key)?;
        self.write_value(value)
    }

    fn finish(&mut self) -> Result<(), CodecError> {
        self.stream.flush()?;
        Ok(())
    }
}
