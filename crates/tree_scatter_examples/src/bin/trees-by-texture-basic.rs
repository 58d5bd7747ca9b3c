use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_scatter::prelude::*;
use tree_scatter_examples::{init_tracing, render_placements_to_png, synthetic_splatmap, RenderConfig};

const FOREST_LAYER: usize = 2;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A 4-layer splatmap standing in for a painted terrain.
    let alphamap = synthetic_splatmap(256)?;
    let mut terrain = TerrainSnapshot::new(alphamap).with_prototypes(vec![
        TreePrototype::new("pine"),
        TreePrototype::new("fir"),
        TreePrototype::new("birch"),
    ]);

    // Trees appear with probability equal to the forest floor weight.
    let curve = Curve::default();
    let settings = ScatterSettings::new(3_000).with_height_range(0.7, 1.4);

    let mut rng = StdRng::seed_from_u64(42);
    let result = place_trees_by_texture(&mut terrain, FOREST_LAYER, &curve, &settings, &mut rng)?;
    tracing::info!(
        "acceptance rate {:.1}% ({} rejected)",
        result.acceptance_rate() * 100.0,
        result.rejected
    );

    let layer = terrain.alphamap().layer(FOREST_LAYER)?;
    render_placements_to_png(
        &layer,
        terrain.tree_instances(),
        &RenderConfig::new((1000, 1000)),
        "trees-by-texture-basic.png",
    )?;
    Ok(())
}
