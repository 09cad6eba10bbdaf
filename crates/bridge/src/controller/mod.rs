//! Stepping controller.
//!
//! The host runs each machine in two phases, at times of its own choosing:
//! 1. **Synchronized phase:** `run_synchronized` steps the guest and parks the outcome.
//! 2. **Threaded phase:** `run_threaded(false)` steps the guest and returns the outcome;
//!    `run_threaded(true)` drains the parked synchronized outcome exactly once.
//!
//! A fresh threaded result is checked against the firmware image watch. If the image's
//! modification time changed while the step ran, the result is replaced by a shutdown that asks
//! the host to reboot, so a stale guest never keeps running against a replaced image. A failed
//! step is reported as its error and skips the check.
//!
//! Every entry point takes the instance lock; the host never runs both phases at once for a
//! machine, and the lock keeps that true if it ever tries.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::common::{FailureRecord, SessionError, Signal};
use crate::config::Config;
use crate::session::{GuestFactory, Session, SessionState, StepResult};
use crate::stats::SessionStats;

/// Firmware image modification-time watch.
pub mod watch;

pub use watch::ImageWatch;

struct Inner<F: GuestFactory> {
    session: Session<F>,
    watch: ImageWatch,
    stats: SessionStats,
}

/// Host-facing driver for one machine's session.
pub struct Controller<F: GuestFactory> {
    inner: Mutex<Inner<F>>,
}

impl<F: GuestFactory> std::fmt::Debug for Controller<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("Controller")
            .field("session", &inner.session)
            .field("watch", &inner.watch)
            .finish_non_exhaustive()
    }
}

impl<F: GuestFactory> Controller<F> {
    /// Creates a controller over a fresh session.
    ///
    /// # Arguments
    ///
    /// * `factory` - Builds a guest on every `initialize`.
    /// * `watch` - Firmware image to check after each threaded step.
    pub fn new(factory: F, watch: ImageWatch) -> Self {
        Self {
            inner: Mutex::new(Inner {
                session: Session::new(factory),
                watch,
                stats: SessionStats::default(),
            }),
        }
    }

    /// Creates a controller whose watch comes from `config`.
    pub fn from_config(factory: F, config: &Config) -> Self {
        Self::new(factory, config.image_watch())
    }

    fn lock(&self) -> MutexGuard<'_, Inner<F>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// (Re)starts the guest. Returns the resulting initialized flag.
    ///
    /// A synchronized result left over from the previous guest is discarded.
    pub fn initialize(&self) -> bool {
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.stats.initializations += 1;
        if let Some(stale) = inner.session.take_synchronized() {
            debug!(?stale, "discarding synchronized result from previous guest");
        }
        let ok = inner.session.initialize();
        if !ok {
            inner.stats.init_failures += 1;
        }
        ok
    }

    /// Returns `true` while a started guest is live.
    pub fn is_initialized(&self) -> bool {
        self.lock().session.is_initialized()
    }

    /// Current session lifecycle state.
    pub fn state(&self) -> SessionState {
        self.lock().session.state()
    }

    /// Releases the guest. Safe to call at any time, any number of times.
    pub fn close(&self) {
        self.lock().session.close();
    }

    /// Runs one step on the host's synchronized phase and parks the outcome for a later drain.
    pub fn run_synchronized(&self) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.stats.synchronized_steps += 1;

        let result = step_or_error(&mut inner.session, true);
        if result.is_error() {
            inner.stats.step_failures += 1;
        }
        if let Some(stale) = inner.session.store_synchronized(result) {
            debug!(?stale, "overwrote undrained synchronized result");
        }
    }

    /// Runs the host's threaded phase.
    ///
    /// # Arguments
    ///
    /// * `is_synchronized_return` - `true` to drain the result parked by `run_synchronized`,
    ///   `false` to step the guest now.
    ///
    /// # Returns
    ///
    /// The step outcome, the drained outcome, or `None` when a drain finds nothing parked.
    pub fn run_threaded(&self, is_synchronized_return: bool) -> Option<StepResult> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if is_synchronized_return {
            inner.stats.drains += 1;
            let drained = inner.session.take_synchronized();
            if drained.is_none() {
                inner.stats.empty_drains += 1;
            }
            return drained;
        }

        inner.stats.threaded_steps += 1;
        let before = inner.watch.last_modified();

        let result = match inner.session.step(false) {
            Ok(result) => result,
            Err(e) => {
                inner.stats.step_failures += 1;
                return Some(error_result(&e));
            }
        };
        if result.is_error() {
            inner.stats.step_failures += 1;
            return Some(result);
        }

        let after = inner.watch.last_modified();
        if ImageWatch::changed(before, after) {
            inner.stats.forced_reloads += 1;
            info!(
                path = ?inner.watch.path(),
                replaced = ?result,
                "firmware image changed during step, forcing reboot"
            );
            return Some(StepResult::Shutdown { reboot: true });
        }

        Some(result)
    }

    /// Delivers a host signal to the guest.
    pub fn on_signal(&self, signal: &Signal) -> Result<(), SessionError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        match inner.session.push_signal(signal) {
            Ok(()) => {
                inner.stats.signals_delivered += 1;
                Ok(())
            }
            Err(e) => {
                inner.stats.signal_failures += 1;
                warn!(signal = signal.name(), error = %e, "signal not delivered");
                Err(e)
            }
        }
    }

    /// Snapshot of the stepping statistics.
    pub fn stats(&self) -> SessionStats {
        self.lock().stats
    }
}

/// Steps the session, folding a missing guest into an error result.
fn step_or_error<F: GuestFactory>(session: &mut Session<F>, synchronized: bool) -> StepResult {
    session
        .step(synchronized)
        .unwrap_or_else(|e| error_result(&e))
}

fn error_result(e: &SessionError) -> StepResult {
    let record = FailureRecord::capture(e);
    warn!(failure = %record, "step aborted");
    StepResult::from_failure(&record)
}
