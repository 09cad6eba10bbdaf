//! Host value model.
//!
//! `Value` is the closed set of shapes the host may hand to the codec. Each variant maps to
//! exactly one wire form, except `Handle`, which carries a host object the bridge knows only
//! through its display string (component and device handle references). Handles are
//! reduced to 32-bit integers at encode time.

use std::fmt;
use std::sync::Arc;

use crate::common::{FailureRecord, Signal};

/// Host object with no structural shape known to the bridge.
///
/// Implementors are identified only by their `Display` output, which the codec parses as a
/// decimal 32-bit integer. Anything that does not parse fails the encode.
pub trait OpaqueValue: fmt::Debug + fmt::Display + Send + Sync {
    /// Runtime type name, reported in `EncodeError::UnsupportedType`.
    fn type_name(&self) -> &str;
}

/// Reference to a host-side handle (open file, socket, component proxy) by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleValue(pub i32);

impl fmt::Display for HandleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueValue for HandleValue {
    fn type_name(&self) -> &str {
        "HandleValue"
    }
}

/// A host value accepted by the codec.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value.
    Nil,
    /// Boolean.
    Bool(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// Single-precision float.
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// UTF-8 string.
    Str(String),
    /// Raw byte payload.
    Bytes(Vec<u8>),
    /// Fixed-size array of values.
    Array(Box<[Value]>),
    /// Ordered, growable collection of values.
    List(Vec<Value>),
    /// Key/value pairs, written in iteration order.
    Map(Vec<(Value, Value)>),
    /// Host event; written as `[name, [args...]]`.
    Signal(Signal),
    /// Host error object; written as `[type name, message]`.
    Failure(FailureRecord),
    /// Opaque host handle; written as the integer its display string parses to.
    Handle(Arc<dyn OpaqueValue>),
}

impl Value {
    /// Wraps an opaque host object.
    pub fn handle(handle: impl OpaqueValue + 'static) -> Self {
        Self::Handle(Arc::new(handle))
    }

    /// Builds a map from string keys.
    pub fn map_of<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (Self::Str(k.into()), v.into()))
                .collect(),
        )
    }

    /// Short name of the variant, for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Signal(_) => "signal",
            Self::Failure(_) => "failure",
            Self::Handle(_) => "handle",
        }
    }

    /// Returns `true` for `Value::Nil`.
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Signal(a), Self::Signal(b)) => a == b,
            (Self::Failure(a), Self::Failure(b)) => a == b,
            // Handles have no identity beyond what they print.
            (Self::Handle(a), Self::Handle(b)) => {
                a.type_name() == b.type_name() && a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl From<Signal> for Value {
    fn from(v: Signal) -> Self {
        Self::Signal(v)
    }
}

impl From<FailureRecord> for Value {
    fn from(v: FailureRecord) -> Self {
        Self::Failure(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}
