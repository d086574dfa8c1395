//! # Pulse Core
//!
//! The stateful heart of the pulse tracker: a single clamped intensity
//! scalar that decays over time, a temporary saturation sub-state that
//! switches the decay regime, and the tuning store that feeds both.
//!
//! ## Architecture
//!
//! - [`SignalState`] owns the intensity value and saturation timer and
//!   applies the deterministic per-tick update rule.
//! - [`Tuning`] is the full set of runtime parameters, replaceable between
//!   ticks without recreating state.
//! - [`settings`] reads and writes the `key=value` tuning file with an
//!   explicit field schema (no runtime introspection).
//!
//! Transport and tick scheduling live in the `pulse_bridge` and `pulse_cli`
//! crates; this crate has no I/O beyond the settings file.

pub mod settings;
pub mod signal;
pub mod tuning;

pub use signal::SignalState;
pub use tuning::Tuning;
