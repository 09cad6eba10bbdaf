//! Execution session.
//!
//! A session owns the single guest interpreter attached to one host device. It provides:
//! 1. **Lifecycle:** `Uninitialized -> Initialized -> Closed`, re-enterable through `initialize`.
//! 2. **Stepping:** One quantum per call; guest failures come back as `StepResult::Error`.
//! 3. **Signals:** Host signals are wrapped, encoded, and handed to the guest.
//! 4. **Pending result:** The synchronized step's outcome, held until drained once.
//!
//! Initialization failures are logged and reported only through `is_initialized`, because the
//! host polls that flag instead of expecting an error. Every call into the guest runs under
//! `catch_unwind`; a panicking guest is reported as `GuestError::Panic`.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::bridge;
use crate::common::{FailureRecord, GuestError, InitError, SessionError, Signal};

/// Guest boundary traits and `StepResult`.
pub mod guest;
/// Take-once slot for the pending synchronized result.
pub mod slot;

pub use guest::{Guest, GuestFactory, StepResult};
pub use slot::ResultSlot;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No guest has been started, or the last start attempt failed.
    #[default]
    Uninitialized,
    /// A guest is live and may be stepped.
    Initialized,
    /// The guest was released by `close`.
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Per-device owner of one guest interpreter.
pub struct Session<F: GuestFactory> {
    factory: F,
    guest: Option<F::Guest>,
    state: SessionState,
    pending: ResultSlot<StepResult>,
}

impl<F: GuestFactory> fmt::Debug for Session<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("has_guest", &self.guest.is_some())
            .field("pending", &self.pending.peek())
            .finish_non_exhaustive()
    }
}

impl<F: GuestFactory> Session<F> {
    /// Creates an uninitialized session that will build guests with `factory`.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            guest: None,
            state: SessionState::Uninitialized,
            pending: ResultSlot::new(),
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns `true` while a started guest is live.
    pub fn is_initialized(&self) -> bool {
        self.state == SessionState::Initialized
    }

    /// Closes any live guest, then constructs and starts a fresh one.
    ///
    /// On failure the new guest is released and the session is left `Uninitialized`.
    pub fn try_initialize(&mut self) -> Result<(), InitError> {
        self.close();
        self.state = SessionState::Uninitialized;

        let factory = &mut self.factory;
        let mut guest = guarded(|| factory.create()).map_err(InitError::Construct)?;
        match guarded(|| guest.start()) {
            Ok(true) => {
                self.guest = Some(guest);
                self.state = SessionState::Initialized;
                Ok(())
            }
            Ok(false) => {
                close_guest(&mut guest);
                Err(InitError::NotReady)
            }
            Err(e) => {
                close_guest(&mut guest);
                Err(InitError::Startup(e))
            }
        }
    }

    /// Like [`Session::try_initialize`], but logs the failure and reports only success.
    pub fn initialize(&mut self) -> bool {
        match self.try_initialize() {
            Ok(()) => {
                info!("guest initialized");
                true
            }
            Err(e) => {
                warn!(error = %e, "guest failed to initialize");
                false
            }
        }
    }

    /// Releases the live guest, if any. Calling it again is a no-op.
    pub fn close(&mut self) {
        if let Some(mut guest) = self.guest.take() {
            close_guest(&mut guest);
            self.state = SessionState::Closed;
            debug!("guest closed");
        }
    }

    /// Advances the guest by one quantum.
    ///
    /// # Arguments
    ///
    /// * `synchronized` - `true` when called from the host's synchronized phase.
    ///
    /// # Returns
    ///
    /// The guest's result. A guest failure is returned as `Ok(StepResult::Error(..))`;
    /// `Err` means there was no guest to step.
    pub fn step(&mut self, synchronized: bool) -> Result<StepResult, SessionError> {
        let guest = self.guest.as_mut().ok_or(SessionError::NotInitialized)?;
        match guarded(|| guest.step(synchronized)) {
            Ok(result) => Ok(result),
            Err(e) => {
                let record = FailureRecord::capture(&e);
                warn!(synchronized, failure = %record, "guest step failed");
                Ok(StepResult::from_failure(&record))
            }
        }
    }

    /// Wraps, encodes, and delivers a host signal to the guest.
    pub fn push_signal(&mut self, signal: &Signal) -> Result<(), SessionError> {
        let guest = self.guest.as_mut().ok_or(SessionError::NotInitialized)?;
        let payload = bridge::encode_signal(signal)?;
        guarded(|| guest.on_signal(&payload))?;
        Ok(())
    }

    /// Stores the outcome of a synchronized step, returning an undrained previous one.
    pub fn store_synchronized(&mut self, result: StepResult) -> Option<StepResult> {
        self.pending.put(result)
    }

    /// Takes the pending synchronized result. The slot is empty afterwards.
    pub fn take_synchronized(&mut self) -> Option<StepResult> {
        self.pending.take()
    }
}

/// Runs one call into the guest, catching a panic as `GuestError::Panic`.
fn guarded<T>(call: impl FnOnce() -> Result<T, GuestError>) -> Result<T, GuestError> {
    panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(GuestError::Panic(panic_message(&*payload))))
}

/// Closes a guest. A panic during close is logged and dropped.
fn close_guest<G: Guest>(guest: &mut G) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| guest.close())) {
        warn!(panic = %panic_message(&*payload), "guest panicked while closing");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

impl<F: GuestFactory> Drop for Session<F> {
    fn drop(&mut self) {
        self.close();
    }
}
