use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_scatter::prelude::*;
use tree_scatter_examples::{
    init_tracing, load_png_alphamap, render_placements_to_png, save_alphamap_png,
    synthetic_splatmap, RenderConfig,
};

const GRASS_LAYER: usize = 1;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Use the PNG given on the command line, or write a synthetic one first.
    let path = match std::env::args().nth(1) {
        Some(p) => PathBuf::from(p),
        None => {
            let p = PathBuf::from("trees-splatmap.png");
            save_alphamap_png(&synthetic_splatmap(256)?, &p)?;
            p
        }
    };

    let alphamap = load_png_alphamap(&path)?;
    tracing::info!(
        "loaded {}x{} splatmap with {} layers from {}",
        alphamap.width(),
        alphamap.height(),
        alphamap.layers(),
        path.display()
    );

    let mut terrain =
        TerrainSnapshot::new(alphamap).with_prototypes(vec![TreePrototype::new("shrub")]);

    // Scattered shrubs on grass: squared weight keeps them away from thin grass.
    let curve = |w: f32| w * w;
    let settings = ScatterSettings::new(1_500)
        .with_height_range(0.4, 0.9)
        .with_width_range(0.6, 1.1);

    let mut rng = StdRng::seed_from_u64(11);
    place_trees_by_texture(&mut terrain, GRASS_LAYER, &curve, &settings, &mut rng)?;

    let layer = terrain.alphamap().layer(GRASS_LAYER)?;
    render_placements_to_png(
        &layer,
        terrain.tree_instances(),
        &RenderConfig::new((1000, 1000)).with_prototype_colors(vec![[60, 90, 20]]),
        "trees-splatmap-png.png",
    )?;
    Ok(())
}
