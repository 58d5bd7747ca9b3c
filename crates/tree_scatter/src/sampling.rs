//! Random draws used by the tree sampler.
//!
//! All helpers take `&mut dyn Rng` and consume exactly one `next_u32` per draw,
//! so a seeded RNG reproduces the same scatter run draw for draw.
use glam::Vec2;
use rand::Rng;

/// Generate a random float in the range [0, 1].
#[inline]
pub fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform float in `[min, max]`. Returns `min` when the range is empty or inverted.
#[inline]
pub fn rand_range_inclusive(rng: &mut dyn Rng, min: f32, max: f32) -> f32 {
    let t = rand01(rng);
    if max <= min {
        return min;
    }
    (min + t * (max - min)).clamp(min, max)
}

/// Uniform float in `[min, max)`. Returns `min` when the range is empty or inverted.
#[inline]
pub fn rand_range(rng: &mut dyn Rng, min: f32, max: f32) -> f32 {
    let t = rand01(rng);
    if max <= min {
        return min;
    }
    // rand01 may round up to exactly 1.0 in f32.
    (min + t * (max - min)).clamp(min, next_down(max).max(min))
}

/// Uniform index in `[0, count)`. Returns 0 for `count == 0`.
///
/// Scales the raw 32-bit draw in integer math, so every index is reachable for
/// counts up to 2^32.
#[inline]
pub fn rand_index(rng: &mut dyn Rng, count: usize) -> usize {
    let draw = rng.next_u32() as u128;
    if count == 0 {
        return 0;
    }
    ((draw * count as u128) >> 32) as usize
}

/// Draws a continuous grid coordinate uniformly in `[0, width-1) x [0, height-1)`.
///
/// A dimension with a single cell yields coordinate 0 on that axis.
#[inline]
pub fn uniform_grid_point(rng: &mut dyn Rng, width: usize, height: usize) -> Vec2 {
    let max_x = width.saturating_sub(1) as f32;
    let max_y = height.saturating_sub(1) as f32;
    let x = rand_range(rng, 0.0, max_x);
    let y = rand_range(rng, 0.0, max_y);
    Vec2::new(x, y)
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// ensuring bounds are strictly inside a domain. Handles edge cases
/// safely including very small positive values and zero.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    pub(crate) struct FixedRng {
        pub value: u32,
    }

    impl rand::TryRng for FixedRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Ok(self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_values_in_range() {
        for value in [0, 1, 100, u32::MAX / 2, u32::MAX - 1, u32::MAX] {
            let mut rng = FixedRng { value };
            let result = rand01(&mut rng);
            assert!(
                (0.0..=1.0).contains(&result),
                "rand01({value}) = {result} is out of range [0,1]"
            );
        }
    }

    #[test]
    fn rand_range_excludes_upper_bound_even_at_max_draw() {
        let mut rng = FixedRng { value: u32::MAX };
        let v = rand_range(&mut rng, 0.0, std::f32::consts::TAU);
        assert!(v < std::f32::consts::TAU);
        assert!(v >= 0.0);
    }

    #[test]
    fn rand_range_collapses_empty_range_to_min() {
        let mut rng = FixedRng { value: u32::MAX / 2 };
        assert_eq!(rand_range(&mut rng, 0.0, 0.0), 0.0);
        assert_eq!(rand_range(&mut rng, 2.0, 1.0), 2.0);
        assert_eq!(rand_range_inclusive(&mut rng, 1.5, 1.5), 1.5);
    }

    #[test]
    fn rand_range_inclusive_reaches_upper_bound() {
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(rand_range_inclusive(&mut rng, 0.5, 2.0), 2.0);
    }

    #[test]
    fn rand_index_stays_below_count() {
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(rand_index(&mut rng, 3), 2);
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand_index(&mut rng, 3), 0);
        assert_eq!(rand_index(&mut rng, 0), 0);
    }

    #[test]
    fn rand_index_resolves_counts_beyond_f32_precision() {
        // 2^25 + 3 has no exact f32 representation.
        let count = (1usize << 25) + 3;
        let mut rng = FixedRng { value: 1 << 31 };
        assert_eq!(rand_index(&mut rng, count), (1 << 24) + 1);
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(rand_index(&mut rng, count), count - 1);
    }

    #[test]
    fn uniform_grid_point_respects_half_open_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let p = uniform_grid_point(&mut rng, 5, 3);
            assert!(p.x >= 0.0 && p.x < 4.0);
            assert!(p.y >= 0.0 && p.y < 2.0);
        }
    }

    #[test]
    fn uniform_grid_point_single_cell_axis_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = uniform_grid_point(&mut rng, 1, 4);
        assert_eq!(p.x, 0.0);
        assert!(p.y < 3.0);
    }

    #[test]
    fn next_down_handles_edge_cases() {
        assert!(next_down(1.0) < 1.0);
        assert_eq!(next_down(0.0), -f32::MIN_POSITIVE);
        assert!(next_down(-1.0) < -1.0);
        assert_eq!(next_down(f32::INFINITY), f32::MAX);
        assert_eq!(next_down(f32::NEG_INFINITY), f32::NEG_INFINITY);
        assert!(next_down(f32::NAN).is_nan());
    }
}
