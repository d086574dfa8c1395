//! Runtime tuning parameters for the signal state and transport.
//!
//! Every knob lives in one plain struct so the driver can hot-swap the
//! whole set between ticks. Defaults match the shipped actuator profile.

use serde::{Deserialize, Serialize};

/// All runtime tunables. Immutable during a tick, replaceable between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Upper clamp for the intensity value. Uncapped by default.
    pub max_intensity: f32,
    /// Intensity lost per second while fading, outside saturation.
    pub normal_falloff_rate: f32,
    /// Intensity lost per second while fading, inside saturation.
    pub saturated_falloff_rate: f32,
    /// Intensity at or above which a tick triggers saturation.
    pub saturation_threshold: f32,
    /// Seconds added to the saturation timer when saturation triggers.
    pub saturation_duration: f32,
    /// Multiplier applied to intensity increases while saturated.
    /// Values below 1.0 dampen increases; applied exactly as configured.
    pub saturation_amplify: f32,
    /// Seconds added to the saturation timer on each increase while saturated.
    pub saturation_extend_time: f32,
    /// Intensity added by a thrust event.
    pub thrust_delta: f32,
    /// Intensity added by a climax event.
    pub climax_delta: f32,
    /// Seconds added to the saturation timer by a climax event.
    pub climax_saturation_bonus: f32,
    /// Intensity added by a peak event.
    pub peak_delta: f32,
    /// Actuator bridge host.
    pub host: String,
    /// Actuator bridge UDP port.
    pub port: u16,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_intensity: f32::MAX,
            normal_falloff_rate: 0.4,
            saturated_falloff_rate: 0.1,
            saturation_threshold: 0.8,
            saturation_duration: 4.5,
            saturation_amplify: 0.8,
            saturation_extend_time: 0.25,
            thrust_delta: 0.155,
            climax_delta: 0.55,
            climax_saturation_bonus: 1.25,
            peak_delta: 0.7,
            host: "127.0.0.1".to_string(),
            port: 54321,
        }
    }
}

impl Tuning {
    /// Destination address in `host:port` form.
    pub fn destination(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
