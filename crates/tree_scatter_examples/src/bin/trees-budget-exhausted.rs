use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_scatter::prelude::*;
use tree_scatter_examples::{init_tracing, synthetic_splatmap};

const ROCK_LAYER: usize = 3;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let alphamap = synthetic_splatmap(128)?;
    let layer = alphamap.layer(ROCK_LAYER)?;

    // Only heavily painted rock accepts trees, so most candidates are rejected
    // and the attempt cap ends the run early.
    let curve = Curve::from_points(&[(0.0, 0.0), (0.95, 0.0), (1.0, 0.01)]);
    let settings = ScatterSettings::new(5_000).with_budget(
        SamplingBudget::attempts(200_000).with_max_duration(Duration::from_secs(2)),
    );

    let mut sink = FnSink::new(|event| {
        if let ScatterEvent::BudgetExhausted {
            limit,
            placed,
            attempts,
        } = event
        {
            tracing::warn!("stopped by {limit:?} after {attempts} attempts with {placed} trees");
        }
    });

    let mut rng = StdRng::seed_from_u64(3);
    let result = scatter_trees_with_events(&layer, &curve, &settings, &mut rng, &mut sink);

    match result.into_complete() {
        Ok(trees) => tracing::info!("placed all {} trees", trees.len()),
        Err(err) => tracing::warn!("partial run: {err}"),
    }
    Ok(())
}
