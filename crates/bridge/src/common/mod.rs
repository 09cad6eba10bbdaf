//! Common types shared across the bridge.
//!
//! Holds the data carried between host and guest that more than one layer needs to see:
//! host signals, failure records, and the error enums for every boundary.

/// Error enums for encoding, guest, initialization, and session failures.
pub mod error;
/// Host-side failure record encoded as `[type name, message]`.
pub mod failure;
/// Named host event with ordered arguments.
pub mod signal;

pub use error::{EncodeError, GuestError, InitError, SessionError};
pub use failure::FailureRecord;
pub use signal::Signal;
