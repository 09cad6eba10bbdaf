//! Host/guest execution bridge.
//!
//! This crate drives an embedded guest interpreter from a tick-based host and carries values
//! across the boundary. It is organized as follows:
//! 1. **Codec:** Recursive MessagePack encoding of the host's dynamic value domain.
//! 2. **Bridge:** Adapts host signals (name + arguments) into encodable values.
//! 3. **Session:** Owns one guest per device; initialize, step, close, and signal delivery.
//! 4. **Controller:** Reconciles synchronized and threaded stepping and forces a reboot
//!    when the watched firmware image changes underneath a running guest.
//! 5. **Support:** Configuration, shared types and errors, and stepping statistics.

/// Shared types and errors (signals, failure records, error enums).
pub mod common;
/// Bridge configuration (defaults, JSON loading, firmware watch settings).
pub mod config;
/// Value model and MessagePack packer.
pub mod codec;
/// Signal bridge between host events and wire values.
pub mod bridge;
/// Guest ownership, lifecycle state machine, and pending-result slot.
pub mod session;
/// Dual-phase stepping controller and firmware image watch.
pub mod controller;
/// Stepping statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Host-facing stepping entry point; construct with `Controller::new`.
pub use crate::controller::Controller;
/// Host value domain accepted by the codec.
pub use crate::codec::Value;
/// Outcome of one guest step as reported to the host.
pub use crate::session::StepResult;
