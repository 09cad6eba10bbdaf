//! Error definitions for the bridge.
//!
//! Each boundary of the bridge has its own error type:
//! 1. **Encoding:** `EncodeError` aborts a single encode call; there is no partial output.
//! 2. **Guest:** `GuestError` is what a guest implementation reports from start, step, or signal,
//!    and what a panic inside the guest is caught as.
//! 3. **Initialization:** `InitError` explains why a session did not come up.
//! 4. **Session:** `SessionError` covers misuse of a session and signal delivery failures.
//!
//! None of these cross the controller's stepping entry points; they are converted into
//! `StepResult::Error` or the initialized flag before the host sees them.

use std::io;

use rmp::encode::ValueWriteError;
use thiserror::Error;

/// Failure while encoding a value tree into the wire format.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A value reached the opaque-handle fallback and its display form is not a 32-bit integer.
    #[error("unsupported type {type_name} => {display}")]
    UnsupportedType {
        /// Runtime type name reported by the value.
        type_name: String,
        /// Display form that failed to parse.
        display: String,
    },

    /// A container or payload is longer than a MessagePack length prefix can describe.
    #[error("{kind} of {len} entries exceeds the wire format limit")]
    TooLarge {
        /// Which framing header overflowed (`"array"`, `"map"`, `"binary"`).
        kind: &'static str,
        /// Offending length.
        len: usize,
    },

    /// The underlying writer rejected a marker or payload.
    #[error("failed to write wire value: {0}")]
    Write(#[from] ValueWriteError),

    /// The underlying writer rejected a single-byte marker.
    #[error("failed to write wire marker: {0}")]
    Io(#[from] io::Error),
}

/// Failure reported by a guest interpreter.
#[derive(Debug, Error)]
pub enum GuestError {
    /// The firmware image could not be read or is malformed.
    #[error("guest image unavailable: {0}")]
    Image(String),

    /// The guest faulted while executing.
    #[error("guest faulted: {0}")]
    Fault(String),

    /// The guest refused a delivered signal (e.g. its queue is full).
    #[error("guest rejected signal: {0}")]
    Signal(String),

    /// The guest implementation panicked; the payload message is kept.
    #[error("guest panicked: {0}")]
    Panic(String),

    /// A value crossing into the guest could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Reason a session failed to reach the initialized state.
#[derive(Debug, Error)]
pub enum InitError {
    /// The guest factory could not construct an interpreter.
    #[error("failed to construct guest: {0}")]
    Construct(#[source] GuestError),

    /// The interpreter was constructed but its startup sequence failed.
    #[error("guest startup failed: {0}")]
    Startup(#[source] GuestError),

    /// Startup completed without error but the guest reported it is not ready.
    #[error("guest reported not ready after startup")]
    NotReady,
}

/// Failure of a session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session has no live guest; the caller stepped or signalled before initializing.
    #[error("session has no live guest")]
    NotInitialized,

    /// A signal could not be encoded for delivery.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The guest rejected a delivered signal.
    #[error(transparent)]
    Guest(#[from] GuestError),
}
