use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tree_scatter::prelude::{TreePlacement, WeightField};

/// Installs a fmt subscriber honoring `RUST_LOG` (default `info`). Safe to call twice.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// How to draw a scatter result on top of its weight layer.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Output size in pixels.
    pub image_size: (u32, u32),
    /// Color at layer weight 0.
    pub ground: [u8; 3],
    /// Color at layer weight 1.
    pub painted: [u8; 3],
    /// One color per prototype index, cycled.
    pub prototype_colors: Vec<[u8; 3]>,
    /// Dot radius in pixels at height scale 1.
    pub base_radius: f32,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            ground: [196, 176, 140],
            painted: [120, 170, 90],
            prototype_colors: vec![[20, 80, 30], [40, 110, 50], [90, 60, 30], [10, 50, 60]],
            base_radius: 3.0,
        }
    }

    pub fn with_ground(mut self, ground: [u8; 3], painted: [u8; 3]) -> Self {
        self.ground = ground;
        self.painted = painted;
        self
    }

    pub fn with_prototype_colors(mut self, colors: Vec<[u8; 3]>) -> Self {
        self.prototype_colors = colors;
        self
    }

    pub fn with_base_radius(mut self, radius: f32) -> Self {
        self.base_radius = radius;
        self
    }

    fn prototype_color(&self, index: usize) -> [u8; 3] {
        if self.prototype_colors.is_empty() {
            return [0, 0, 0];
        }
        self.prototype_colors[index % self.prototype_colors.len()]
    }
}

/// Renders `layer` as a ground tint and each placement as a dot, then saves a PNG.
///
/// Image columns follow `position.z` and rows follow `position.x`, matching the grid's
/// own column/row layout.
pub fn render_placements_to_png<F: WeightField>(
    layer: &F,
    placements: &[TreePlacement],
    config: &RenderConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (iw, ih) = config.image_size;
    anyhow::ensure!(iw > 0 && ih > 0, "image size must be > 0");
    let mut img = RgbImage::new(iw, ih);

    let (gw, gh) = layer.size();
    for py in 0..ih {
        for px in 0..iw {
            let weight = if gw == 0 || gh == 0 {
                0.0
            } else {
                let gx = px as f32 / (iw.max(2) - 1) as f32 * (gw - 1) as f32;
                let gy = py as f32 / (ih.max(2) - 1) as f32 * (gh - 1) as f32;
                tree_scatter::alphamap::sample_bilinear(layer, gx, gy).clamp(0.0, 1.0)
            };
            img.put_pixel(px, py, Rgb(mix(config.ground, config.painted, weight)));
        }
    }

    for p in placements {
        let cx = p.position.z * (iw - 1) as f32;
        let cy = p.position.x * (ih - 1) as f32;
        let radius = (config.base_radius * p.height_scale).max(1.0);
        stamp_disc(&mut img, cx, cy, radius, config.prototype_color(p.prototype_index));
    }

    let out_path = out_path.as_ref();
    img.save(out_path)?;
    info!("Wrote {} trees to {}.", placements.len(), out_path.display());
    Ok(())
}

fn mix(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let ch = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    [ch(0), ch(1), ch(2)]
}

fn stamp_disc(img: &mut RgbImage, cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
    let (w, h) = img.dimensions();
    let r2 = radius * radius;
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(w.saturating_sub(1));
    let y1 = ((cy + radius).ceil() as u32).min(h.saturating_sub(1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x, y, Rgb(color));
            }
        }
    }
}
