// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timeline sampling: a sequence of eased `{from, to, duration}` segments.

use alloc::vec::Vec;

/// An easing curve, evaluated on `t ∈ [0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// `f(t) = t`.
    Linear,
    /// `f(t) = t²`.
    EaseIn,
    /// `f(t) = 1 - (1 - t)²`.
    EaseOut,
    /// Quadratic ease-in-out, symmetric about `t = 0.5`.
    EaseInOut,
}

impl Easing {
    /// Apply the curve to a clamped `t`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// One segment of a timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Value at the start of this segment.
    pub from: f64,
    /// Value at the end of this segment.
    pub to: f64,
    /// Duration in milliseconds. May be zero (an instant jump).
    pub duration_ms: f64,
    /// Easing curve applied within this segment.
    pub easing: Easing,
}

/// A sequence of segments played back to back, optionally looping.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    segments: Vec<Segment>,
    total_ms: f64,
}

impl Timeline {
    /// Build a timeline from its segments, in playback order.
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        let total_ms = segments.iter().map(|s| s.duration_ms).sum();
        Self { segments, total_ms }
    }

    /// Total duration across all segments.
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ms
    }

    /// Sample the value at `elapsed_ms`.
    ///
    /// A degenerate timeline (zero total duration, or a single segment with
    /// zero duration at the sampled position) resolves to its final value
    /// immediately. A non-finite `elapsed_ms` resolves to the initial value
    /// of the first segment (or `0.0` if there are no segments).
    #[must_use]
    pub fn sample(&self, elapsed_ms: f64, looping: bool) -> f64 {
        if !elapsed_ms.is_finite() {
            return self.segments.first().map_or(0.0, |s| s.from);
        }
        let Some(last) = self.segments.last() else { return 0.0 };
        if self.total_ms <= 0.0 {
            return last.to;
        }

        let mut t = if looping { elapsed_ms.rem_euclid(self.total_ms) } else { elapsed_ms.clamp(0.0, self.total_ms) };
        if !looping && elapsed_ms >= self.total_ms {
            return last.to;
        }

        for segment in &self.segments {
            if segment.duration_ms <= 0.0 {
                if t <= 0.0 {
                    return segment.to;
                }
                continue;
            }
            if t < segment.duration_ms {
                let local = segment.easing.apply(t / segment.duration_ms);
                return segment.from + (segment.to - segment.from) * local;
            }
            t -= segment.duration_ms;
        }
        last.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn linear_segment_interpolates() {
        let tl = Timeline::new(vec![Segment { from: 0.0, to: 10.0, duration_ms: 100.0, easing: Easing::Linear }]);
        assert_eq!(tl.sample(0.0, false), 0.0);
        assert_eq!(tl.sample(50.0, false), 5.0);
        assert_eq!(tl.sample(100.0, false), 10.0);
    }

    #[test]
    fn past_end_clamps_to_final_value_when_not_looping() {
        let tl = Timeline::new(vec![Segment { from: 0.0, to: 10.0, duration_ms: 100.0, easing: Easing::Linear }]);
        assert_eq!(tl.sample(500.0, false), 10.0);
    }

    #[test]
    fn looping_wraps_elapsed_modulo_total() {
        let tl = Timeline::new(vec![Segment { from: 0.0, to: 10.0, duration_ms: 100.0, easing: Easing::Linear }]);
        assert_eq!(tl.sample(150.0, true), tl.sample(50.0, true));
    }

    #[test]
    fn zero_duration_segment_resolves_immediately() {
        let tl = Timeline::new(vec![Segment { from: 0.0, to: 10.0, duration_ms: 0.0, easing: Easing::Linear }]);
        assert_eq!(tl.sample(0.0, false), 10.0);
    }

    #[test]
    fn non_finite_elapsed_resolves_to_initial_value() {
        let tl = Timeline::new(vec![Segment { from: 3.0, to: 10.0, duration_ms: 100.0, easing: Easing::Linear }]);
        assert_eq!(tl.sample(f64::NAN, false), 3.0);
        assert_eq!(tl.sample(f64::INFINITY, false), 3.0);
    }

    #[test]
    fn multi_segment_plays_back_to_back() {
        let tl = Timeline::new(vec![
            Segment { from: 0.0, to: 10.0, duration_ms: 100.0, easing: Easing::Linear },
            Segment { from: 10.0, to: 0.0, duration_ms: 100.0, easing: Easing::Linear },
        ]);
        assert_eq!(tl.sample(100.0, false), 10.0);
        assert_eq!(tl.sample(150.0, false), 5.0);
        assert_eq!(tl.total_ms(), 200.0);
    }
}
