use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use guestlink_core::Value;
use tempfile::NamedTempFile;

/// Decodes one wire value with an independent MessagePack reader.
pub fn decode(bytes: &[u8]) -> rmpv::Value {
    let mut cursor = bytes;
    let value = rmpv::decode::read_value(&mut cursor).unwrap();
    assert!(cursor.is_empty(), "trailing bytes after value");
    value
}

/// What a conformant decoder should produce for a tree of plain (non-composite) values.
pub fn expected_wire(value: &Value) -> rmpv::Value {
    match value {
        Value::Nil => rmpv::Value::Nil,
        Value::Bool(v) => rmpv::Value::Boolean(*v),
        Value::Int(v) => rmpv::Value::from(i64::from(*v)),
        Value::Long(v) => rmpv::Value::from(*v),
        Value::Float(v) => rmpv::Value::F32(*v),
        Value::Double(v) => rmpv::Value::F64(*v),
        Value::Str(v) => rmpv::Value::from(v.as_str()),
        Value::Bytes(v) => rmpv::Value::Binary(v.clone()),
        Value::Array(items) => rmpv::Value::Array(items.iter().map(expected_wire).collect()),
        Value::List(items) => rmpv::Value::Array(items.iter().map(expected_wire).collect()),
        Value::Map(pairs) => rmpv::Value::Map(
            pairs
                .iter()
                .map(|(k, v)| (expected_wire(k), expected_wire(v)))
                .collect(),
        ),
        other => panic!("no plain wire form for {}", other.kind()),
    }
}

/// Fixed point in time used for firmware image modification times.
pub fn epoch_plus(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Sets the modification time of the file at `path`.
pub fn set_mtime(path: &Path, time: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

/// A firmware image on disk whose modification time the test controls.
pub struct TempImage {
    file: NamedTempFile,
}

impl TempImage {
    /// Creates an image with some content and a known modification time.
    pub fn new(mtime: SystemTime) -> Self {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\x7fFWIMG").unwrap();
        file.flush().unwrap();
        file.as_file().set_modified(mtime).unwrap();
        Self { file }
    }

    /// Path of the image.
    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}
