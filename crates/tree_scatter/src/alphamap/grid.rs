//! Single-layer weight grid and bilinear sampling.
use super::WeightField;
use crate::error::{Error, Result};

/// Owned single-layer grid of weights, stored row-major (`data[y * width + x]`).
#[derive(Clone, Debug, PartialEq)]
pub struct WeightGrid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl WeightGrid {
    /// Create a grid from row-major data. Fails if `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::InvalidConfig(format!(
                "weight grid data has {} values, expected {}x{}={}",
                data.len(),
                width,
                height,
                width * height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Create a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Bilinearly interpolated value at continuous cell coordinates `(x, y)`.
    #[inline]
    pub fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        sample_bilinear(self, x, y)
    }
}

impl WeightField for WeightGrid {
    #[inline]
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn value(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Bilinearly interpolates `field` at continuous cell coordinates `(x, y)`.
///
/// The lower neighbor is `floor(x)`, `floor(y)`; the "+1" neighbor is clamped to the
/// last column/row, never wrapped. Coordinates below zero or past the last cell clamp
/// to the edge. Returns `0.0` for an empty field.
pub fn sample_bilinear<F: WeightField + ?Sized>(field: &F, x: f32, y: f32) -> f32 {
    let (w, h) = field.size();
    if w == 0 || h == 0 {
        return 0.0;
    }

    let max_x = (w - 1) as f32;
    let max_y = (h - 1) as f32;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let v00 = field.value(x0, y0);
    let v10 = field.value(x1, y0);
    let v01 = field.value(x0, y1);
    let v11 = field.value(x1, y1);

    let vx0 = lerp(v00, v10, fx);
    let vx1 = lerp(v01, v11, fx);
    lerp(vx0, vx1, fy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> WeightGrid {
        // 3x2:
        // y=0: 0.0 0.5 1.0
        // y=1: 0.2 0.4 0.6
        WeightGrid::new(3, 2, vec![0.0, 0.5, 1.0, 0.2, 0.4, 0.6]).unwrap()
    }

    #[test]
    fn new_rejects_mismatched_length() {
        let err = WeightGrid::new(2, 2, vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn exact_vertices_return_stored_values() {
        let grid = sample_grid();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                assert_eq!(
                    grid.sample_bilinear(x as f32, y as f32),
                    grid.value(x, y),
                    "vertex ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn midpoints_average_neighbors() {
        let grid = sample_grid();
        assert!((grid.sample_bilinear(0.5, 0.0) - 0.25).abs() < 1e-6);
        assert!((grid.sample_bilinear(0.0, 0.5) - 0.1).abs() < 1e-6);
        // (0.0 + 0.5 + 0.2 + 0.4) / 4
        assert!((grid.sample_bilinear(0.5, 0.5) - 0.275).abs() < 1e-6);
    }

    #[test]
    fn plus_one_neighbor_clamps_at_last_row_and_column() {
        let grid = sample_grid();
        assert_eq!(grid.sample_bilinear(2.0, 1.0), 0.6);
        assert!((grid.sample_bilinear(2.0, 0.5) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn single_cell_grid_is_constant() {
        let grid = WeightGrid::filled(1, 1, 0.7);
        assert_eq!(grid.sample_bilinear(0.0, 0.0), 0.7);
        assert_eq!(grid.sample_bilinear(0.3, 0.9), 0.7);
    }

    #[test]
    fn empty_grid_samples_zero() {
        let grid = WeightGrid::filled(0, 4, 1.0);
        assert!(grid.is_empty());
        assert_eq!(grid.sample_bilinear(0.0, 0.0), 0.0);
    }

    #[test]
    fn from_fn_is_row_major() {
        let grid = WeightGrid::from_fn(3, 2, |x, y| (y * 3 + x) as f32);
        assert_eq!(grid.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(grid.get(2, 1), Some(5.0));
        assert_eq!(grid.get(3, 0), None);
    }
}
