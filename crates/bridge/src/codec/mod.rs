//! Value codec.
//!
//! Encodes the host's dynamic value domain into MessagePack for the guest runtime:
//! 1. **Value model:** `Value`, a closed tagged union plus the `Handle` escape hatch.
//! 2. **Packer:** Ordered, recursive dispatch from `Value` to wire tags.
//! 3. **JSON:** Conversion from `serde_json::Value` for tooling and tests.

/// `serde_json::Value` to `Value` conversion.
pub mod json;
/// Recursive MessagePack packer.
pub mod packer;
/// Host value model and the opaque-handle trait.
pub mod value;

pub use packer::{Packer, encode};
pub use value::{HandleValue, OpaqueValue, Value};
