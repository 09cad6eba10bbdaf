//! MessagePack packer.
//!
//! Walks a `Value` tree and writes it into a growable buffer. Dispatch is an ordered match,
//! first match wins:
//! 1. **Absence:** nil marker.
//! 2. **Scalars:** bool, int32, int64, float32, float64, string. Integers take the most
//!    compact integer encoding, so `Int(42)` and `Long(42)` produce the same bytes.
//! 3. **Bytes:** binary header followed by the raw payload.
//! 4. **Sequences:** fixed arrays and ordered collections both become an array header
//!    followed by each element.
//! 5. **Maps:** map header, then key and value interleaved in iteration order.
//! 6. **Signals:** `[name, [args...]]`, arguments encoded recursively through this dispatch.
//! 7. **Failures:** `[type name, display string]`.
//! 8. **Handles:** the display string parsed as a 32-bit integer, or `UnsupportedType`.
//!
//! Encoding is all-or-nothing. After an error the packer's buffer holds a partial tree and
//! must be discarded.

use rmp::encode;

use super::value::{OpaqueValue, Value};
use crate::common::{EncodeError, FailureRecord, Signal};

/// Converts a container length to the 32-bit length prefix of the wire format.
fn wire_len(kind: &'static str, len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::TooLarge { kind, len })
}

/// Encodes one value tree into a fresh byte buffer.
///
/// # Arguments
///
/// * `value` - Root of the tree to encode.
///
/// # Returns
///
/// The complete encoding, or the first error met anywhere in the tree.
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut packer = Packer::new();
    packer.pack(value)?;
    Ok(packer.into_bytes())
}

/// Incremental MessagePack writer over an owned buffer.
#[derive(Debug, Default)]
pub struct Packer {
    buf: Vec<u8>,
}

impl Packer {
    /// Creates an empty packer.
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a packer whose buffer can hold `capacity` bytes without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the packer, returning its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Appends the encoding of `value`.
    pub fn pack(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => encode::write_nil(&mut self.buf)?,
            Value::Bool(v) => encode::write_bool(&mut self.buf, *v)?,
            Value::Int(v) => self.pack_int(i64::from(*v))?,
            Value::Long(v) => self.pack_int(*v)?,
            Value::Float(v) => encode::write_f32(&mut self.buf, *v)?,
            Value::Double(v) => encode::write_f64(&mut self.buf, *v)?,
            Value::Str(v) => encode::write_str(&mut self.buf, v)?,
            Value::Bytes(data) => self.pack_binary(data)?,
            Value::Array(items) => self.pack_seq(items)?,
            Value::List(items) => self.pack_seq(items)?,
            Value::Map(pairs) => self.pack_map(pairs)?,
            Value::Signal(signal) => self.pack_signal(signal)?,
            Value::Failure(record) => self.pack_failure(record)?,
            Value::Handle(handle) => self.pack_handle(handle.as_ref())?,
        }
        Ok(())
    }

    fn pack_int(&mut self, v: i64) -> Result<(), EncodeError> {
        let _ = encode::write_sint(&mut self.buf, v)?;
        Ok(())
    }

    fn pack_array_header(&mut self, len: usize) -> Result<(), EncodeError> {
        let _ = encode::write_array_len(&mut self.buf, wire_len("array", len)?)?;
        Ok(())
    }

    fn pack_binary(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        let _ = encode::write_bin_len(&mut self.buf, wire_len("binary", data.len())?)?;
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn pack_seq(&mut self, items: &[Value]) -> Result<(), EncodeError> {
        self.pack_array_header(items.len())?;
        for item in items {
            self.pack(item)?;
        }
        Ok(())
    }

    fn pack_map(&mut self, pairs: &[(Value, Value)]) -> Result<(), EncodeError> {
        let _ = encode::write_map_len(&mut self.buf, wire_len("map", pairs.len())?)?;
        for (key, value) in pairs {
            self.pack(key)?;
            self.pack(value)?;
        }
        Ok(())
    }

    /// Writes `[name, [args...]]`.
    fn pack_signal(&mut self, signal: &Signal) -> Result<(), EncodeError> {
        self.pack_array_header(2)?;
        encode::write_str(&mut self.buf, signal.name())?;
        self.pack_seq(signal.args())
    }

    /// Writes `[type name, display string]`.
    fn pack_failure(&mut self, record: &FailureRecord) -> Result<(), EncodeError> {
        self.pack_array_header(2)?;
        encode::write_str(&mut self.buf, record.type_name())?;
        encode::write_str(&mut self.buf, &record.to_string())?;
        Ok(())
    }

    /// Legacy fallback for handle references: their only identity is a printable numeric id.
    fn pack_handle(&mut self, handle: &dyn OpaqueValue) -> Result<(), EncodeError> {
        let display = handle.to_string();
        match display.parse::<i32>() {
            Ok(id) => self.pack_int(i64::from(id)),
            Err(_) => Err(EncodeError::UnsupportedType {
                type_name: handle.type_name().to_owned(),
                display,
            }),
        }
    }
}
