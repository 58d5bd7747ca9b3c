use std::path::Path;

use image::RgbaImage;
use tree_scatter::prelude::Alphamap;

/// Builds a four-layer splatmap (sand, grass, forest floor, rock) whose weights sum to 1.
///
/// Forest floor forms two soft blobs, rock a ridge along one edge, grass the rolling
/// remainder, and sand fills what is left.
pub fn synthetic_splatmap(size: usize) -> anyhow::Result<Alphamap> {
    anyhow::ensure!(size >= 2, "splatmap size must be >= 2");
    let n = (size - 1) as f32;
    let mut layers = vec![Vec::with_capacity(size * size); 4];

    for y in 0..size {
        for x in 0..size {
            let u = x as f32 / n;
            let v = y as f32 / n;

            let blob = |cx: f32, cy: f32, r: f32| {
                let d = ((u - cx).powi(2) + (v - cy).powi(2)).sqrt() / r;
                (1.0 - d * d).clamp(0.0, 1.0)
            };
            let forest = blob(0.3, 0.35, 0.28).max(blob(0.7, 0.7, 0.22));
            let rock = ((u - 0.85) / 0.15).clamp(0.0, 1.0) * (1.0 - forest);
            let waves = 0.5 + 0.5 * (u * 9.0).sin() * (v * 7.0).cos();
            let grass = (waves * (1.0 - forest - rock)).clamp(0.0, 1.0);
            let sand = (1.0 - forest - rock - grass).max(0.0);

            layers[0].push(sand);
            layers[1].push(grass);
            layers[2].push(forest);
            layers[3].push(rock);
        }
    }

    Ok(Alphamap::from_layers(size, size, layers)?)
}

/// Writes a four-layer alphamap as an RGBA PNG (layer 0 in R through layer 3 in A).
pub fn save_alphamap_png(alphamap: &Alphamap, path: impl AsRef<Path>) -> anyhow::Result<()> {
    anyhow::ensure!(
        alphamap.layers() == 4,
        "only four-layer alphamaps map onto RGBA, got {}",
        alphamap.layers()
    );
    let width = u32::try_from(alphamap.width())?;
    let height = u32::try_from(alphamap.height())?;
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let mut px = [0u8; 4];
        for (layer, out) in px.iter_mut().enumerate() {
            let w = alphamap
                .get(x as usize, y as usize, layer)
                .unwrap_or(0.0)
                .clamp(0.0, 1.0);
            *out = (w * 255.0).round() as u8;
        }
        image::Rgba(px)
    });
    img.save(path)?;
    Ok(())
}

/// Loads an RGBA PNG splatmap as a four-layer alphamap.
pub fn load_png_alphamap(path: impl AsRef<Path>) -> anyhow::Result<Alphamap> {
    let img = image::open(path.as_ref())?.to_rgba8();
    let (w, h) = img.dimensions();
    Ok(Alphamap::from_rgba8(
        w as usize,
        h as usize,
        img.as_raw(),
    )?)
}
