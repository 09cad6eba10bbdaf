//! Failure records.
//!
//! A failure record is the host's view of an error object: the error's fully-qualified type
//! name and its display message. It is what the codec writes for a `Value::Failure` and what
//! the session turns into a `StepResult::Error` when a step fails.

use std::any;
use std::error::Error;
use std::fmt;

/// Host-side error object reduced to a type name and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    type_name: String,
    message: String,
}

impl FailureRecord {
    /// Creates a record from an explicit type name and message.
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Captures an error value, using its static type path as the type name.
    ///
    /// # Arguments
    ///
    /// * `err` - The error to record; its `Display` output becomes the message.
    ///
    /// # Returns
    ///
    /// A record such as `guestlink_core::common::error::GuestError: guest faulted: boom`.
    pub fn capture<E: Error + ?Sized>(err: &E) -> Self {
        Self::new(any::type_name::<E>(), err.to_string())
    }

    /// Fully-qualified type name of the recorded error.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Human-readable message of the recorded error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}
