// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spring stepping: explicit Euler integration toward a target value.

/// Normalized spring configuration.
///
/// `max_delta` bounds how much simulated time a single substep inside
/// [`step`] may cover; a `dt` larger than `max_delta` is walked in several
/// substeps of at most `max_delta` each, which keeps the explicit Euler
/// integration stable for stiff springs even under a long frame stall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Restoring force per unit displacement. Must be `>= 0`.
    pub stiffness: f64,
    /// Velocity damping coefficient. Must be `>= 0`.
    pub damping: f64,
    /// Inertial mass. Must be `> 0`.
    pub mass: f64,
    /// Displacement from target below which the spring may be considered
    /// at rest. Must be `>= 0`.
    pub rest_delta: f64,
    /// Velocity magnitude below which the spring may be considered at
    /// rest. Must be `>= 0`.
    pub rest_speed: f64,
    /// Maximum simulated time per substep. Must be in `(0, 1]`.
    pub max_delta: f64,
}

impl SpringConfig {
    /// Whether every field lies in its documented valid range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.stiffness.is_finite()
            && self.stiffness >= 0.0
            && self.damping.is_finite()
            && self.damping >= 0.0
            && self.mass.is_finite()
            && self.mass > 0.0
            && self.rest_delta.is_finite()
            && self.rest_delta >= 0.0
            && self.rest_speed.is_finite()
            && self.rest_speed >= 0.0
            && self.max_delta.is_finite()
            && self.max_delta > 0.0
            && self.max_delta <= 1.0
    }
}

/// A spring's position and velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringState {
    /// Current interpolated value.
    pub value: f64,
    /// Current velocity.
    pub velocity: f64,
}

/// Result of one [`step`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteppedSpring {
    /// The spring's state after stepping.
    pub state: SpringState,
    /// Whether the spring has reached its rest condition: both
    /// `|value - target| <= rest_delta` and `|velocity| <= rest_speed`.
    pub at_rest: bool,
}

/// Advance `state` toward `target` by `dt`, per `config`.
///
/// An invalid `config` (any field outside its documented range) or a
/// non-finite or negative `dt` snaps the spring directly to `target` at
/// rest, rather than propagating an error — a spring is rendering-critical
/// state with no natural "previous frame" to fall back to.
#[must_use]
pub fn step(state: SpringState, target: f64, config: &SpringConfig, dt: f64) -> SteppedSpring {
    if !config.is_valid() || !dt.is_finite() || dt < 0.0 {
        return SteppedSpring { state: SpringState { value: target, velocity: 0.0 }, at_rest: true };
    }

    let mut value = state.value;
    let mut velocity = state.velocity;
    let mut remaining = dt;
    while remaining > 0.0 {
        let h = remaining.min(config.max_delta);
        let accel = (config.stiffness * (target - value) - config.damping * velocity) / config.mass;
        velocity += accel * h;
        value += velocity * h;
        remaining -= h;
    }

    let at_rest = (value - target).abs() <= config.rest_delta && velocity.abs() <= config.rest_speed;
    if at_rest {
        value = target;
        velocity = 0.0;
    }
    SteppedSpring { state: SpringState { value, velocity }, at_rest }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SpringConfig {
        SpringConfig { stiffness: 170.0, damping: 26.0, mass: 1.0, rest_delta: 0.01, rest_speed: 0.01, max_delta: 1.0 / 60.0 }
    }

    #[test]
    fn settles_to_target_given_enough_time() {
        let cfg = config();
        let mut stepped = SteppedSpring { state: SpringState { value: 0.0, velocity: 0.0 }, at_rest: false };
        for _ in 0..20 {
            stepped = step(stepped.state, 100.0, &cfg, 1.0);
            if stepped.at_rest {
                break;
            }
        }
        assert!(stepped.at_rest);
        assert!((stepped.state.value - 100.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_config_snaps_to_target() {
        let bad = SpringConfig { mass: 0.0, ..config() };
        let stepped = step(SpringState { value: 0.0, velocity: 5.0 }, 42.0, &bad, 1.0);
        assert_eq!(stepped.state, SpringState { value: 42.0, velocity: 0.0 });
        assert!(stepped.at_rest);
    }

    #[test]
    fn non_finite_dt_snaps_to_target() {
        let stepped = step(SpringState { value: 0.0, velocity: 0.0 }, 10.0, &config(), f64::NAN);
        assert_eq!(stepped.state.value, 10.0);
        assert!(stepped.at_rest);
    }

    #[test]
    fn large_dt_is_substepped_without_blowing_up() {
        let stiff = SpringConfig { stiffness: 2000.0, damping: 10.0, mass: 1.0, ..config() };
        let stepped = step(SpringState { value: 0.0, velocity: 0.0 }, 1.0, &stiff, 5.0);
        assert!(stepped.state.value.is_finite());
        assert!(stepped.state.value.abs() < 1e6);
    }
}
