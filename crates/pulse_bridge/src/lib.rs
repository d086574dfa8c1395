//! # Pulse Bridge
//!
//! Everything between the signal state and the actuator bridge process:
//! the 4-byte wire codec, the fire-and-forget UDP sender, and the
//! [`Controller`] that composes state, tuning and sender into the object
//! the driver ticks.
//!
//! Delivery is best-effort by design. A dropped datagram costs nothing —
//! the next tick supersedes it with a fresh authoritative value.

pub mod controller;
pub mod sender;
pub mod wire;

pub use controller::{Controller, StateSnapshot};
pub use sender::PulseSender;
pub use wire::WireError;
