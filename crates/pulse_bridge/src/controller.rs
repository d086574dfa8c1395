//! The tick controller: state + tuning + sender, explicitly owned.
//!
//! The driver holds exactly one of these and calls [`Controller::tick`]
//! once per time step, optionally firing a discrete event first. No global
//! instance exists; whoever drives the loop owns the controller. No
//! internal locking either — a multi-threaded host must wrap it in its own
//! synchronization.

use crate::sender::PulseSender;
use anyhow::Result;
use pulse_core::{SignalState, Tuning};
use serde::Serialize;

/// Serializable view of the live state, for status output.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub intensity: f32,
    pub saturated: bool,
    pub saturation_timer: f32,
    pub fading_enabled: bool,
}

/// Owns the signal state and transmits every tick's result.
pub struct Controller {
    state: SignalState,
    tuning: Tuning,
    sender: PulseSender,
}

impl Controller {
    /// Construct state and sender from a tuning snapshot. The sender binds
    /// to the tuning's destination once, for the controller's lifetime.
    pub fn new(tuning: Tuning) -> Result<Self> {
        let sender = PulseSender::new(&tuning.host, tuning.port)?;
        Ok(Self {
            state: SignalState::new(),
            tuning,
            sender,
        })
    }

    /// Advance the state by `dt` seconds and transmit the result.
    /// Returns the transmitted intensity.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let intensity = self.state.tick(dt, &self.tuning);
        self.sender.send(intensity);
        intensity
    }

    pub fn thrust(&mut self) {
        self.state.thrust(&self.tuning);
    }

    pub fn climax(&mut self) {
        self.state.climax(&self.tuning);
    }

    pub fn peak(&mut self) {
        self.state.peak(&self.tuning);
    }

    pub fn set_fading(&mut self, enabled: bool) {
        self.state.fading_enabled = enabled;
    }

    /// Hot-swap the tunables between ticks. State is kept as-is.
    ///
    /// The sender stays bound to its original destination; a changed
    /// host/port in the new tuning takes effect on the next restart.
    pub fn apply_tuning(&mut self, tuning: Tuning) {
        if tuning.host != self.tuning.host || tuning.port != self.tuning.port {
            tracing::warn!(
                "destination changed to {} in settings; sender stays on {} until restart",
                tuning.destination(),
                self.sender.destination()
            );
        }
        self.tuning = tuning;
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            intensity: self.state.intensity(),
            saturated: self.state.saturated(),
            saturation_timer: self.state.saturation_timer(),
            fading_enabled: self.state.fading_enabled,
        }
    }

    /// Release the sender socket. Idempotent.
    pub fn close(&mut self) {
        self.sender.close();
    }
}
