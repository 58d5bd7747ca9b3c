use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_scatter::prelude::*;
use tree_scatter_examples::{init_tracing, render_placements_to_png, synthetic_splatmap, RenderConfig};

const FOREST_LAYER: usize = 2;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let alphamap = synthetic_splatmap(256)?;
    let layer = alphamap.layer(FOREST_LAYER)?;

    let curves = [
        ("linear", Curve::default()),
        // Smooth falloff: sparse at the forest edge, dense in the core.
        ("ease-in-out", Curve::ease_in_out(0.0, 0.0, 1.0, 1.0)),
        // Hard edge: nothing below 0.5 weight, always above 0.55.
        (
            "threshold",
            Curve::from_points(&[(0.0, 0.0), (0.5, 0.0), (0.55, 1.0), (1.0, 1.0)]),
        ),
    ];

    let mut scatterer = TreeScatterer::try_new(
        ScatterSettings::new(2_000)
            .with_height_range(0.8, 1.2)
            .with_prototype_count(2),
    )?;

    for (name, curve) in &curves {
        // Same seed for every curve so only the curve differs.
        let mut rng = StdRng::seed_from_u64(7);
        let result = scatterer.run(&layer, curve, &mut rng);
        tracing::info!(
            "{name}: {} trees in {} attempts",
            result.placements.len(),
            result.attempts
        );
        render_placements_to_png(
            &layer,
            &result.placements,
            &RenderConfig::new((800, 800)).with_base_radius(2.5),
            format!("trees-curve-{name}.png"),
        )?;
    }
    Ok(())
}
