//! Multi-layer alphamap storage and per-layer views.
use super::{WeightField, WeightGrid};
use crate::error::{Error, Result};

/// Terrain alphamap with `layers` blend weights per cell.
///
/// Values are interleaved per cell: `data[((y * width) + x) * layers + layer]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Alphamap {
    width: usize,
    height: usize,
    layers: usize,
    data: Vec<f32>,
}

impl Alphamap {
    /// Create an alphamap from interleaved data.
    pub fn new(width: usize, height: usize, layers: usize, data: Vec<f32>) -> Result<Self> {
        let expected = width * height * layers;
        if data.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "alphamap data has {} values, expected {}x{}x{}={}",
                data.len(),
                width,
                height,
                layers,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            layers,
            data,
        })
    }

    /// Create an alphamap from one row-major buffer per layer.
    pub fn from_layers(width: usize, height: usize, layers: Vec<Vec<f32>>) -> Result<Self> {
        let cells = width * height;
        if let Some((i, l)) = layers.iter().enumerate().find(|(_, l)| l.len() != cells) {
            return Err(Error::InvalidConfig(format!(
                "alphamap layer {} has {} values, expected {}",
                i,
                l.len(),
                cells
            )));
        }

        let count = layers.len();
        let mut data = Vec::with_capacity(cells * count);
        for cell in 0..cells {
            for layer in &layers {
                data.push(layer[cell]);
            }
        }
        Ok(Self {
            width,
            height,
            layers: count,
            data,
        })
    }

    /// Create a four-layer alphamap from 8-bit RGBA splatmap pixels (R, G, B, A = layers 0..4).
    pub fn from_rgba8(width: usize, height: usize, pixels: &[u8]) -> Result<Self> {
        if pixels.len() != width * height * 4 {
            return Err(Error::InvalidConfig(format!(
                "splatmap has {} bytes, expected {}x{}x4",
                pixels.len(),
                width,
                height
            )));
        }
        let data = pixels.iter().map(|b| *b as f32 / 255.0).collect();
        Ok(Self {
            width,
            height,
            layers: 4,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of terrain layers.
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Weight of `layer` at cell `(x, y)`, or `None` when any index is out of bounds.
    pub fn get(&self, x: usize, y: usize, layer: usize) -> Option<f32> {
        if x >= self.width || y >= self.height || layer >= self.layers {
            return None;
        }
        self.data
            .get((y * self.width + x) * self.layers + layer)
            .copied()
    }

    /// Borrowed view of a single layer.
    pub fn layer(&self, index: usize) -> Result<AlphamapLayer<'_>> {
        if index >= self.layers {
            return Err(Error::InvalidLayer {
                index,
                layers: self.layers,
            });
        }
        Ok(AlphamapLayer {
            alphamap: self,
            index,
        })
    }

    /// Owned copy of a single layer.
    pub fn layer_grid(&self, index: usize) -> Result<WeightGrid> {
        let view = self.layer(index)?;
        Ok(WeightGrid::from_fn(self.width, self.height, |x, y| {
            view.value(x, y)
        }))
    }
}

/// One layer of an [`Alphamap`], sampled in place.
#[derive(Clone, Copy, Debug)]
pub struct AlphamapLayer<'a> {
    alphamap: &'a Alphamap,
    index: usize,
}

impl AlphamapLayer<'_> {
    /// Index of this layer in its alphamap.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl WeightField for AlphamapLayer<'_> {
    #[inline]
    fn size(&self) -> (usize, usize) {
        (self.alphamap.width, self.alphamap.height)
    }

    #[inline]
    fn value(&self, x: usize, y: usize) -> f32 {
        let a = self.alphamap;
        a.data[(y * a.width + x) * a.layers + self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphamap::sample_bilinear;

    fn two_layer() -> Alphamap {
        Alphamap::from_layers(
            2,
            2,
            vec![vec![1.0, 0.0, 0.0, 1.0], vec![0.0, 1.0, 1.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn from_layers_interleaves_per_cell() {
        let map = two_layer();
        assert_eq!(map.layers(), 2);
        assert_eq!(map.get(1, 0, 0), Some(0.0));
        assert_eq!(map.get(1, 0, 1), Some(1.0));
        assert_eq!(map.get(1, 1, 0), Some(1.0));
        assert_eq!(map.get(2, 0, 0), None);
        assert_eq!(map.get(0, 0, 2), None);
    }

    #[test]
    fn from_layers_rejects_short_layer() {
        let err = Alphamap::from_layers(2, 2, vec![vec![0.0; 4], vec![0.0; 3]]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn layer_out_of_range_is_invalid_layer() {
        let map = two_layer();
        let err = map.layer(2).unwrap_err();
        assert!(matches!(err, Error::InvalidLayer { index: 2, layers: 2 }));
    }

    #[test]
    fn layer_view_matches_owned_grid() {
        let map = two_layer();
        let view = map.layer(1).unwrap();
        let grid = map.layer_grid(1).unwrap();
        assert_eq!(view.size(), grid.size());
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(view.value(x, y), grid.value(x, y));
        }
        assert_eq!(sample_bilinear(&view, 0.5, 0.5), 0.5);
    }

    #[test]
    fn rgba8_splatmap_maps_channels_to_layers() {
        let pixels = [255, 0, 51, 102, 0, 255, 0, 0];
        let map = Alphamap::from_rgba8(2, 1, &pixels).unwrap();
        assert_eq!(map.layers(), 4);
        assert_eq!(map.get(0, 0, 0), Some(1.0));
        assert_eq!(map.get(0, 0, 2), Some(0.2));
        assert_eq!(map.get(1, 0, 1), Some(1.0));
        assert!(Alphamap::from_rgba8(2, 2, &pixels).is_err());
    }
}
