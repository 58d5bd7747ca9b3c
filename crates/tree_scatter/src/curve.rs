//! Probability curves mapping a layer weight to a placement probability.
//!
//! [`ProbabilityCurve`] is implemented by the keyframe [`Curve`] and by any
//! `Fn(f32) -> f32`, so tests and callers can pass closures directly.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maps an interpolated layer weight in [0, 1] to an acceptance probability.
pub trait ProbabilityCurve {
    fn evaluate(&self, weight: f32) -> f32;
}

impl<F> ProbabilityCurve for F
where
    F: Fn(f32) -> f32,
{
    #[inline]
    fn evaluate(&self, weight: f32) -> f32 {
        self(weight)
    }
}

/// A control point of a [`Curve`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    /// Slope arriving at this key from the left.
    pub in_tangent: f32,
    /// Slope leaving this key to the right.
    pub out_tangent: f32,
}

impl Keyframe {
    /// A key with both tangents set to zero.
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    pub fn with_tangents(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// Keyframe curve with cubic Hermite segments.
///
/// Evaluation clamps outside the key range to the first/last value. An infinite
/// tangent on either side of a segment turns it into a step holding the left value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>"))]
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    /// Create a curve from keys in any order.
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Straight line from `(t0, v0)` to `(t1, v1)`.
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        let slope = if t1 != t0 { (v1 - v0) / (t1 - t0) } else { 0.0 };
        Self::new(vec![
            Keyframe::with_tangents(t0, v0, slope, slope),
            Keyframe::with_tangents(t1, v1, slope, slope),
        ])
    }

    /// Flat curve returning `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![Keyframe::new(0.0, value), Keyframe::new(1.0, value)])
    }

    /// S-shaped curve from `(t0, v0)` to `(t1, v1)` with flat ends.
    pub fn ease_in_out(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        Self::new(vec![Keyframe::new(t0, v0), Keyframe::new(t1, v1)])
    }

    /// Piecewise linear curve through `points` (`(time, value)` pairs).
    pub fn from_points(points: &[(f32, f32)]) -> Self {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let slope = |a: (f32, f32), b: (f32, f32)| {
            if b.0 != a.0 {
                (b.1 - a.1) / (b.0 - a.0)
            } else {
                0.0
            }
        };

        let keys = (0..sorted.len())
            .map(|i| {
                let (t, v) = sorted[i];
                let in_tangent = if i > 0 {
                    slope(sorted[i - 1], sorted[i])
                } else {
                    0.0
                };
                let out_tangent = if i + 1 < sorted.len() {
                    slope(sorted[i], sorted[i + 1])
                } else {
                    0.0
                };
                Keyframe::with_tangents(t, v, in_tangent, out_tangent)
            })
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Adds a key, keeping keys sorted by time. Returns the key's index.
    pub fn add_key(&mut self, key: Keyframe) -> usize {
        let idx = self.keys.partition_point(|k| k.time <= key.time);
        self.keys.insert(idx, key);
        idx
    }

    /// Evaluates the curve at `t`. A NaN `t` evaluates to the first key's value.
    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if self.keys.len() == 1 || t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // NaN key times can break the partition's monotonicity; keep a valid segment.
        let upper = self
            .keys
            .partition_point(|k| k.time <= t)
            .clamp(1, self.keys.len() - 1);
        let k0 = &self.keys[upper - 1];
        let k1 = &self.keys[upper];
        hermite(k0, k1, t)
    }
}

impl Default for Curve {
    /// Linear ramp from (0, 0) to (1, 1).
    fn default() -> Self {
        Self::linear(0.0, 0.0, 1.0, 1.0)
    }
}

impl From<Vec<Keyframe>> for Curve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<Curve> for Vec<Keyframe> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}

impl ProbabilityCurve for Curve {
    #[inline]
    fn evaluate(&self, weight: f32) -> f32 {
        Curve::evaluate(self, weight)
    }
}

fn hermite(k0: &Keyframe, k1: &Keyframe, t: f32) -> f32 {
    let dt = k1.time - k0.time;
    if dt <= 0.0 {
        return k0.value;
    }
    let m0 = k0.out_tangent;
    let m1 = k1.in_tangent;
    if !m0.is_finite() || !m1.is_finite() {
        return k0.value;
    }

    let s = (t - k0.time) / dt;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * k0.value + h10 * dt * m0 + h01 * k1.value + h11 * dt * m1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn default_is_identity_on_unit_interval() {
        let curve = Curve::default();
        for t in [0.0, 0.1, 0.25, 0.5, 0.9, 1.0] {
            assert!(approx(curve.evaluate(t), t), "t = {t}");
        }
    }

    #[test]
    fn clamps_outside_key_range() {
        let curve = Curve::linear(0.2, 0.1, 0.8, 0.9);
        assert_eq!(curve.evaluate(0.0), 0.1);
        assert_eq!(curve.evaluate(-3.0), 0.1);
        assert_eq!(curve.evaluate(1.0), 0.9);
    }

    #[test]
    fn empty_and_single_key_curves() {
        assert_eq!(Curve::new(Vec::new()).evaluate(0.5), 0.0);
        let single = Curve::new(vec![Keyframe::new(0.3, 0.6)]);
        assert_eq!(single.evaluate(0.0), 0.6);
        assert_eq!(single.evaluate(1.0), 0.6);
    }

    #[test]
    fn constant_curve_is_flat() {
        let curve = Curve::constant(0.4);
        for t in [0.0, 0.33, 0.5, 1.0] {
            assert!(approx(curve.evaluate(t), 0.4));
        }
    }

    #[test]
    fn ease_in_out_is_symmetric_smoothstep() {
        let curve = Curve::ease_in_out(0.0, 0.0, 1.0, 1.0);
        assert!(approx(curve.evaluate(0.5), 0.5));
        // 3t^2 - 2t^3 at t = 0.25
        assert!(approx(curve.evaluate(0.25), 0.15625));
        assert!(approx(curve.evaluate(0.75), 0.84375));
    }

    #[test]
    fn from_points_is_piecewise_linear() {
        let curve = Curve::from_points(&[(1.0, 1.0), (0.0, 0.0), (0.5, 0.0)]);
        assert_eq!(curve.keys().len(), 3);
        assert!(approx(curve.evaluate(0.25), 0.0));
        assert!(approx(curve.evaluate(0.75), 0.5));
        assert!(approx(curve.evaluate(0.9), 0.8));
    }

    #[test]
    fn infinite_tangent_steps() {
        let curve = Curve::new(vec![
            Keyframe::with_tangents(0.0, 0.0, 0.0, f32::INFINITY),
            Keyframe::with_tangents(0.5, 1.0, f32::INFINITY, 0.0),
        ]);
        assert_eq!(curve.evaluate(0.49), 0.0);
        assert_eq!(curve.evaluate(0.5), 1.0);
        assert_eq!(curve.evaluate(0.9), 1.0);
    }

    #[test]
    fn nan_input_returns_first_value() {
        assert_eq!(Curve::default().evaluate(f32::NAN), 0.0);
        let curve = Curve::from_points(&[(0.0, 0.2), (0.5, 0.9), (1.0, 0.4)]);
        assert_eq!(curve.evaluate(f32::NAN), 0.2);
        assert_eq!(curve.evaluate(-f32::NAN), 0.2);
    }

    #[test]
    fn nan_key_times_do_not_panic() {
        let curve = Curve::new(vec![
            Keyframe::new(-f32::NAN, 0.3),
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, 1.0),
        ]);
        for t in [-1.0, 0.0, 0.25, 0.5, 1.0, 2.0] {
            let _ = curve.evaluate(t);
        }
        let trailing = Curve::new(vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, 1.0),
            Keyframe::new(f32::NAN, 0.5),
        ]);
        for t in [-1.0, 0.0, 0.5, 1.0, 2.0] {
            let _ = trailing.evaluate(t);
        }
    }

    #[test]
    fn add_key_keeps_order() {
        let mut curve = Curve::linear(0.0, 0.0, 1.0, 1.0);
        let idx = curve.add_key(Keyframe::new(0.5, 0.0));
        assert_eq!(idx, 1);
        let times: Vec<f32> = curve.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn closures_are_probability_curves() {
        let half = |_: f32| 0.5_f32;
        assert_eq!(ProbabilityCurve::evaluate(&half, 0.9), 0.5);
        let squared = |w: f32| w * w;
        assert_eq!(squared.evaluate(0.5), 0.25);
    }
}
