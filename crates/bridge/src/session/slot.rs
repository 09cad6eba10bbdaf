//! Single-slot, take-once exchange.
//!
//! Carries the result of a synchronized step over to the threaded call that drains it. A value
//! put into the slot can be taken exactly once; taking always leaves the slot empty.

/// Holds at most one value until it is taken.
#[derive(Debug)]
pub struct ResultSlot<T> {
    value: Option<T>,
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> ResultSlot<T> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Stores `value`, returning the previous value if it was never taken.
    pub fn put(&mut self, value: T) -> Option<T> {
        self.value.replace(value)
    }

    /// Removes and returns the stored value. The slot is empty afterwards.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Returns the stored value without consuming it.
    pub const fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns `true` if nothing is waiting to be taken.
    pub const fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}
