//! Signal bridge.
//!
//! Adapts host signals into the value the guest expects to receive: a two-element sequence
//! of the signal name and its argument list. The shape is identical to what the packer writes
//! for a `Value::Signal`, so wrapping first or encoding the signal directly yields the same bytes.

use crate::codec::{self, Value};
use crate::common::{EncodeError, Signal};

/// Converts a signal into the `[name, [args...]]` value the guest consumes.
pub fn wrap(signal: &Signal) -> Value {
    Value::List(vec![
        Value::Str(signal.name().to_owned()),
        Value::List(signal.args().to_vec()),
    ])
}

/// Wraps and encodes a signal in one step, ready to hand to the guest.
pub fn encode_signal(signal: &Signal) -> Result<Vec<u8>, EncodeError> {
    codec::encode(&wrap(signal))
}
