//! Tree placement records produced by the sampler.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque white, the tint and lightmap color of every generated tree.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// A tree accepted by the sampler.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct TreePlacement {
    /// Normalized terrain position. `x` comes from the grid row coordinate, `z` from the
    /// grid column coordinate, `y` is always 0.
    pub position: Vec3,
    /// Rotation around the up axis in radians, in [0, 2π).
    pub rotation: f32,
    pub height_scale: f32,
    pub width_scale: f32,
    /// Index into the host's tree prototype list.
    pub prototype_index: usize,
    pub color: [u8; 4],
    pub lightmap_color: [u8; 4],
}

impl TreePlacement {
    /// Builds a placement from the continuous grid coordinate it was accepted at.
    ///
    /// Position axes are swapped relative to grid indexing: `position.x = y / (height - 1)`
    /// and `position.z = x / (width - 1)`. A zero extent normalizes to 0.
    pub fn from_grid_point(
        grid_x: f32,
        grid_y: f32,
        grid_size: (usize, usize),
        rotation: f32,
        height_scale: f32,
        width_scale: f32,
        prototype_index: usize,
    ) -> Self {
        let (w, h) = grid_size;
        let position = Vec3::new(
            inverse_lerp(0.0, h.saturating_sub(1) as f32, grid_y),
            0.0,
            inverse_lerp(0.0, w.saturating_sub(1) as f32, grid_x),
        );
        Self {
            position,
            rotation,
            height_scale,
            width_scale,
            prototype_index,
            color: WHITE,
            lightmap_color: WHITE,
        }
    }
}

#[inline]
fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_axes_are_swapped_into_position() {
        let p = TreePlacement::from_grid_point(2.0, 1.0, (5, 3), 0.0, 1.0, 1.0, 0);
        // x (column) / (5 - 1) lands in z, y (row) / (3 - 1) lands in x.
        assert_eq!(p.position, Vec3::new(0.5, 0.0, 0.5));

        let p = TreePlacement::from_grid_point(1.0, 0.0, (5, 3), 0.0, 1.0, 1.0, 0);
        assert_eq!(p.position, Vec3::new(0.0, 0.0, 0.25));
    }

    #[test]
    fn single_cell_axis_normalizes_to_zero() {
        let p = TreePlacement::from_grid_point(0.0, 0.0, (1, 1), 0.0, 1.0, 1.0, 0);
        assert_eq!(p.position, Vec3::ZERO);
    }

    #[test]
    fn tint_is_white() {
        let p = TreePlacement::from_grid_point(0.0, 0.0, (2, 2), 1.0, 0.5, 0.7, 3);
        assert_eq!(p.color, WHITE);
        assert_eq!(p.lightmap_color, WHITE);
        assert_eq!(p.prototype_index, 3);
    }
}
