//! Host signals.
//!
//! A signal is a named occurrence raised by a host device (key press, component attach,
//! redstone change, ...) carrying an ordered list of arguments. The host builds one per event,
//! the bridge consumes it exactly once, and it is discarded afterwards.

use crate::codec::Value;

/// Named host event with ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    name: String,
    args: Vec<Value>,
}

impl Signal {
    /// Creates a signal from a name and its argument list.
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Appends one argument, builder style.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Signal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered argument list.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Splits the signal into its name and arguments.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.name, self.args)
    }
}
