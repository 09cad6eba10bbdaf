//! Guest interpreter boundary.
//!
//! The bridge never looks inside the guest. It constructs one through a `GuestFactory`, runs
//! its startup sequence, advances it one quantum at a time, feeds it encoded signals, and
//! closes it. `StepResult` is everything a step can tell the host.

use crate::common::{FailureRecord, GuestError};

/// Outcome of one guest step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// The guest wants to run again as soon as the host allows.
    Continue,
    /// The guest is idle until a signal arrives or `ticks` host ticks pass.
    Sleep {
        /// Host ticks to wait before the next step.
        ticks: u32,
    },
    /// The guest needs its next step on the host's synchronized phase.
    SynchronizedCall,
    /// The guest stopped; `reboot` asks the host to start it again.
    Shutdown {
        /// Whether the host should re-initialize the machine.
        reboot: bool,
    },
    /// The step failed; the message is the failure's display form.
    Error(String),
}

impl StepResult {
    /// Builds the error result for a captured failure.
    pub fn from_failure(record: &FailureRecord) -> Self {
        Self::Error(record.to_string())
    }

    /// Returns `true` for `StepResult::Error`.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A running guest interpreter bound to one host device.
pub trait Guest: Send {
    /// Runs the startup sequence. `Ok(false)` means the guest came up but is not runnable.
    fn start(&mut self) -> Result<bool, GuestError>;

    /// Advances the guest by one scheduling quantum.
    ///
    /// `synchronized` is `true` when called from the host's synchronized phase.
    fn step(&mut self, synchronized: bool) -> Result<StepResult, GuestError>;

    /// Delivers one encoded signal (`[name, [args...]]`).
    fn on_signal(&mut self, payload: &[u8]) -> Result<(), GuestError>;

    /// Releases interpreter resources. Must not fail.
    fn close(&mut self);
}

/// Constructs fresh guests for a session.
pub trait GuestFactory: Send {
    /// Guest type produced by this factory.
    type Guest: Guest;

    /// Constructs a new, not yet started guest.
    fn create(&mut self) -> Result<Self::Guest, GuestError>;
}

impl<F, G> GuestFactory for F
where
    F: FnMut() -> Result<G, GuestError> + Send,
    G: Guest,
{
    type Guest = G;

    fn create(&mut self) -> Result<G, GuestError> {
        self()
    }
}
