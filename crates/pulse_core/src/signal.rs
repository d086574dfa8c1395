//! Signal state: the clamped, time-decaying intensity scalar.
//!
//! One mutable value updated every tick, subject to clamping, time-based
//! decay, and a temporary saturation sub-state. While saturated, the decay
//! rate switches to [`Tuning::saturated_falloff_rate`] and every net
//! increase is rescaled by [`Tuning::saturation_amplify`] and extends the
//! saturation timer by [`Tuning::saturation_extend_time`].
//!
//! No operation here can fail: every input is normalized via clamping, and
//! non-finite proposals are dropped so the stored state stays finite.

use crate::tuning::Tuning;
use serde::{Deserialize, Serialize};

/// Clamp without panicking on a misconfigured (min > max) range.
#[inline]
fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.min(max).max(min)
}

/// The sole stateful entity: intensity plus saturation timer.
///
/// `intensity` is kept in `[0, max_intensity]` on every write and the
/// saturation timer never goes below zero. `saturated` is derived, not
/// stored: the state is saturated exactly while the timer is positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalState {
    intensity: f32,
    saturation_timer: f32,
    /// When true, intensity fades every tick at the active falloff rate.
    pub fading_enabled: bool,
}

impl SignalState {
    pub fn new() -> Self {
        Self {
            intensity: 0.0,
            saturation_timer: 0.0,
            fading_enabled: true,
        }
    }

    /// Current intensity, always within `[0, max_intensity]`.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Seconds of saturation remaining.
    pub fn saturation_timer(&self) -> f32 {
        self.saturation_timer
    }

    /// Saturated while the timer is positive.
    pub fn saturated(&self) -> bool {
        self.saturation_timer > 0.0
    }

    /// The core write path. All other mutators route through here.
    ///
    /// While saturated, a net increase (clamped proposal strictly above the
    /// current value) extends the saturation timer and is rescaled by the
    /// amplify factor before clamping. The factor is applied exactly as
    /// configured even when it is below 1.0 and therefore dampens.
    pub fn set_intensity(&mut self, value: f32, tuning: &Tuning) {
        if !value.is_finite() {
            tracing::warn!("dropping non-finite intensity proposal {}", value);
            return;
        }

        let mut value = value;
        if self.saturated() && clamp(value, 0.0, tuning.max_intensity) > self.intensity {
            // Timer invariant holds on every write, even for a negative
            // configured extend time.
            self.saturation_timer =
                (self.saturation_timer + tuning.saturation_extend_time).max(0.0);
            value *= tuning.saturation_amplify;
        }

        self.intensity = clamp(value, 0.0, tuning.max_intensity);
    }

    /// Enter (or re-arm) saturation for at least one configured duration.
    ///
    /// The add-amount is always the full `saturation_duration`, and nothing
    /// is added while the timer already holds a full duration or more. A
    /// single trigger therefore never stacks past one duration-worth unless
    /// triggered again after partial decay. Tuning downstream depends on
    /// this exact behavior.
    pub fn extend_saturation(&mut self, tuning: &Tuning) {
        if self.saturation_timer < tuning.saturation_duration {
            self.saturation_timer += tuning.saturation_duration;
        }
    }

    /// Unconditionally add raw seconds to the saturation timer.
    ///
    /// Used by the climax event's saturation bonus, which stacks regardless
    /// of how much time is already on the clock. Negative results clamp to
    /// zero per the timer invariant.
    pub fn add_saturation(&mut self, secs: f32) {
        if !secs.is_finite() {
            tracing::warn!("dropping non-finite saturation add {}", secs);
            return;
        }
        self.saturation_timer = (self.saturation_timer + secs).max(0.0);
    }

    /// The per-tick update. Returns the resulting intensity for transmission.
    ///
    /// Order matters: the timer decays first, then the threshold check may
    /// trigger saturation, and the fade rate reflects the saturation status
    /// *after* those two steps. An intensity that crosses the threshold
    /// therefore fades at the saturated rate within the same tick.
    pub fn tick(&mut self, dt: f32, tuning: &Tuning) -> f32 {
        let dt = if dt.is_finite() {
            dt.max(0.0)
        } else {
            tracing::warn!("non-finite tick delta {}, treating as empty step", dt);
            0.0
        };

        if self.saturation_timer > 0.0 {
            self.saturation_timer = (self.saturation_timer - dt).max(0.0);
        }

        if self.intensity >= tuning.saturation_threshold && !self.saturated() {
            self.extend_saturation(tuning);
        }

        if self.fading_enabled {
            let rate = if self.saturated() {
                tuning.saturated_falloff_rate
            } else {
                tuning.normal_falloff_rate
            };
            self.set_intensity(self.intensity - rate * dt, tuning);
        }

        self.intensity
    }

    /// Thrust event: one fixed bump to intensity.
    pub fn thrust(&mut self, tuning: &Tuning) {
        self.set_intensity(self.intensity + tuning.thrust_delta, tuning);
    }

    /// Climax event: intensity bump plus an unconditional saturation bonus.
    pub fn climax(&mut self, tuning: &Tuning) {
        self.set_intensity(self.intensity + tuning.climax_delta, tuning);
        self.add_saturation(tuning.climax_saturation_bonus);
    }

    /// Peak event: intensity bump plus forced saturation.
    pub fn peak(&mut self, tuning: &Tuning) {
        self.set_intensity(self.intensity + tuning.peak_delta, tuning);
        self.extend_saturation(tuning);
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capped_tuning() -> Tuning {
        Tuning {
            max_intensity: 1.0,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_set_intensity_exact_clamp_when_unsaturated() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();

        state.set_intensity(0.5, &tuning);
        assert_eq!(state.intensity(), 0.5);

        state.set_intensity(-3.0, &tuning);
        assert_eq!(state.intensity(), 0.0);

        state.set_intensity(7.5, &tuning);
        assert_eq!(state.intensity(), 1.0);
    }

    #[test]
    fn test_repeated_thrusts_clamp_at_max() {
        // Seven unclamped additions of 0.155 exceed 1.0; the stored value
        // must sit exactly on the clamp boundary.
        let tuning = capped_tuning();
        let mut state = SignalState::new();

        for _ in 0..7 {
            state.thrust(&tuning);
        }

        assert_eq!(state.intensity(), 1.0);
        // No ticks ran, so the threshold check never fired.
        assert!(!state.saturated());
    }

    #[test]
    fn test_saturated_increase_amplified_and_extends_timer() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();

        state.set_intensity(0.5, &tuning);
        state.add_saturation(1.0);

        state.set_intensity(0.7, &tuning);

        // Timer extended first, then the proposal rescaled by 0.8.
        assert!((state.saturation_timer() - 1.25).abs() < 1e-6);
        assert!((state.intensity() - 0.56).abs() < 1e-6);
    }

    #[test]
    fn test_saturated_decrease_not_amplified() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();

        state.set_intensity(0.5, &tuning);
        state.add_saturation(1.0);

        state.set_intensity(0.3, &tuning);

        assert!((state.intensity() - 0.3).abs() < 1e-6);
        assert!((state.saturation_timer() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_saturated_equal_value_not_amplified() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();

        state.set_intensity(0.5, &tuning);
        state.add_saturation(1.0);

        // Strictly-greater comparison: a rewrite of the same value is not
        // a net increase.
        state.set_intensity(0.5, &tuning);

        assert!((state.intensity() - 0.5).abs() < 1e-6);
        assert!((state.saturation_timer() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normal_fade_over_ticks() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();
        state.set_intensity(0.5, &tuning);

        // 0.5 is below the 0.8 threshold, so the normal rate applies.
        for _ in 0..4 {
            state.tick(0.25, &tuning);
        }
        assert!((state.intensity() - (0.5 - 0.4)).abs() < 1e-6);

        // Further fading bottoms out at zero.
        for _ in 0..20 {
            state.tick(0.25, &tuning);
        }
        assert_eq!(state.intensity(), 0.0);
    }

    #[test]
    fn test_threshold_cross_uses_saturated_rate_same_tick() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();
        state.set_intensity(0.85, &tuning);

        let out = state.tick(1.0, &tuning);

        // Saturation triggered this tick, so the fade already used the
        // saturated rate (0.1), not the normal rate (0.4).
        assert!(state.saturated());
        assert!((out - 0.75).abs() < 1e-6);
        assert!((state.saturation_timer() - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_tick_while_saturated_decays_both_values() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();
        state.set_intensity(0.85, &tuning);
        state.add_saturation(4.5);

        let out = state.tick(1.0, &tuning);

        assert!((out - 0.75).abs() < 1e-6);
        assert!((state.saturation_timer() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_saturation_timer_never_negative() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();

        state.add_saturation(-10.0);
        assert_eq!(state.saturation_timer(), 0.0);

        state.add_saturation(0.5);
        state.tick(1_000_000.0, &tuning);
        assert_eq!(state.saturation_timer(), 0.0);
    }

    #[test]
    fn test_negative_extend_time_cannot_drive_timer_negative() {
        // Config is not validated here, so a negative extend time must
        // still leave the timer invariant intact on the increase path.
        let tuning = Tuning {
            saturation_extend_time: -5.0,
            ..capped_tuning()
        };
        let mut state = SignalState::new();

        state.set_intensity(0.2, &tuning);
        state.add_saturation(0.5);

        state.set_intensity(0.6, &tuning);

        assert_eq!(state.saturation_timer(), 0.0);
        // The increase itself still lands, amplified as usual.
        assert!((state.intensity() - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_extend_saturation_does_not_stack() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();

        state.extend_saturation(&tuning);
        assert!((state.saturation_timer() - 4.5).abs() < 1e-6);

        // Already holding a full duration: no-op.
        state.extend_saturation(&tuning);
        assert!((state.saturation_timer() - 4.5).abs() < 1e-6);

        // After partial decay the full duration is added again.
        state.tick(1.5, &tuning);
        state.extend_saturation(&tuning);
        assert!((state.saturation_timer() - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_climax_bonus_stacks_unconditionally() {
        let tuning = Tuning::default();
        let mut state = SignalState::new();
        state.add_saturation(10.0);

        state.climax(&tuning);

        // The intensity increase while saturated extends the timer by
        // 0.25 and is dampened to 0.55 * 0.8; the bonus then stacks on top
        // regardless of the time already on the clock.
        assert!((state.intensity() - 0.44).abs() < 1e-6);
        assert!((state.saturation_timer() - 11.5).abs() < 1e-5);
    }

    #[test]
    fn test_peak_forces_saturation() {
        let tuning = Tuning::default();
        let mut state = SignalState::new();

        state.peak(&tuning);

        assert!((state.intensity() - 0.7).abs() < 1e-6);
        assert!(state.saturated());
        assert!((state.saturation_timer() - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_fading_disabled_holds_intensity() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();
        state.set_intensity(0.5, &tuning);
        state.fading_enabled = false;

        state.add_saturation(2.0);
        let out = state.tick(1.0, &tuning);

        // The timer still decays; the intensity does not.
        assert!((out - 0.5).abs() < 1e-6);
        assert!((state.saturation_timer() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_inputs_ignored() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();
        state.set_intensity(0.5, &tuning);

        state.set_intensity(f32::NAN, &tuning);
        assert_eq!(state.intensity(), 0.5);

        state.set_intensity(f32::INFINITY, &tuning);
        assert_eq!(state.intensity(), 0.5);

        state.add_saturation(f32::NAN);
        assert_eq!(state.saturation_timer(), 0.0);

        let out = state.tick(f32::NAN, &tuning);
        assert!((out - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_huge_dt_stays_stable() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();
        state.set_intensity(0.9, &tuning);
        state.add_saturation(100.0);

        let out = state.tick(1e9, &tuning);

        assert!(out.is_finite());
        assert_eq!(out, 0.0);
        // The timer drained fully, then the threshold check re-armed it
        // for one configured duration before the fade ran.
        assert!((state.saturation_timer() - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_negative_dt_treated_as_empty_step() {
        let tuning = capped_tuning();
        let mut state = SignalState::new();
        state.set_intensity(0.5, &tuning);
        state.add_saturation(1.0);

        let out = state.tick(-5.0, &tuning);

        assert!((out - 0.5).abs() < 1e-6);
        assert!((state.saturation_timer() - 1.0).abs() < 1e-6);
    }
}
