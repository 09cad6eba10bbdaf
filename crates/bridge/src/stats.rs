//! Stepping statistics collection and reporting.
//!
//! Counts what the controller did on behalf of the host:
//! 1. **Lifecycle:** Initialization attempts and failures.
//! 2. **Stepping:** Threaded steps, synchronized steps, drains, and failed steps.
//! 3. **Reloads:** Shutdowns forced by a firmware image change.
//! 4. **Signals:** Signals delivered to the guest and signals that could not be delivered.

use std::fmt;

/// Counters for one controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Calls to `initialize`.
    pub initializations: u64,
    /// Calls to `initialize` that left the session uninitialized.
    pub init_failures: u64,
    /// Steps run from the threaded phase.
    pub threaded_steps: u64,
    /// Steps run from the synchronized phase.
    pub synchronized_steps: u64,
    /// Drain requests for the pending synchronized result.
    pub drains: u64,
    /// Drain requests that found nothing pending.
    pub empty_drains: u64,
    /// Steps whose result was `StepResult::Error`.
    pub step_failures: u64,
    /// Threaded results overridden by a firmware image change.
    pub forced_reloads: u64,
    /// Signals handed to the guest.
    pub signals_delivered: u64,
    /// Signals that failed to encode or were rejected by the guest.
    pub signal_failures: u64,
}

impl SessionStats {
    /// Total steps run from either phase.
    pub const fn total_steps(&self) -> u64 {
        self.threaded_steps + self.synchronized_steps
    }

    /// Fraction of steps that failed, in `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn failure_rate(&self) -> f64 {
        let total = self.total_steps();
        if total == 0 {
            0.0
        } else {
            self.step_failures as f64 / total as f64
        }
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "SESSION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(
            f,
            "init                 {} attempts, {} failed",
            self.initializations, self.init_failures
        )?;
        writeln!(
            f,
            "steps                {} threaded, {} synchronized",
            self.threaded_steps, self.synchronized_steps
        )?;
        writeln!(
            f,
            "drains               {} ({} empty)",
            self.drains, self.empty_drains
        )?;
        writeln!(
            f,
            "failures             {} ({:.2}%)",
            self.step_failures,
            self.failure_rate() * 100.0
        )?;
        writeln!(f, "forced reloads       {}", self.forced_reloads)?;
        write!(
            f,
            "signals              {} delivered, {} failed",
            self.signals_delivered, self.signal_failures
        )
    }
}
