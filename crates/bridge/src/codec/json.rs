//! JSON to `Value` conversion.
//!
//! Lets tooling and tests describe value trees as JSON documents. Integers that fit in 32 bits
//! become `Int`, wider integers become `Long`, everything else numeric becomes `Double`.
//! Objects become maps with string keys, ordered by key.

use serde_json::Value as Json;

use super::value::Value;

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Self::Nil,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => n.as_i64().map_or_else(
                || n.as_f64().map_or(Self::Nil, Self::Double),
                |v| i32::try_from(v).map_or(Self::Long(v), Self::Int),
            ),
            Json::String(s) => Self::Str(s),
            Json::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (Self::Str(k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Parses a JSON document into a `Value`.
pub fn from_json_str(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str::<Json>(text).map(Value::from)
}
