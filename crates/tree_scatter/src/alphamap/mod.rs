//! Weight grids and multi-layer alphamaps read by the tree sampler.
//!
//! An alphamap stores one blend weight per cell and terrain layer. The sampler reads a
//! single layer through the [`WeightField`] trait, either as an owned [`WeightGrid`]
//! or as a borrowed [`AlphamapLayer`] view.
pub mod grid;
pub mod layers;

pub use grid::{sample_bilinear, WeightGrid};
pub use layers::{Alphamap, AlphamapLayer};

/// Read-only 2D scalar field addressed by integer cell coordinates.
pub trait WeightField {
    /// Returns `(width, height)` in cells.
    fn size(&self) -> (usize, usize);

    /// Returns the value at cell `(x, y)`. Callers keep `x < width` and `y < height`.
    fn value(&self, x: usize, y: usize) -> f32;

    /// Returns `true` if either dimension is zero.
    fn is_empty(&self) -> bool {
        let (w, h) = self.size();
        w == 0 || h == 0
    }
}

impl<T: WeightField + ?Sized> WeightField for &T {
    #[inline]
    fn size(&self) -> (usize, usize) {
        (**self).size()
    }

    #[inline]
    fn value(&self, x: usize, y: usize) -> f32 {
        (**self).value(x, y)
    }
}
