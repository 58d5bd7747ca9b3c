//! Host terrain adapter and the place-trees-by-texture operation.
//!
//! [`TreeTerrain`] is the only surface the crate needs from a host engine: the alphamap
//! layers to read, how many tree prototypes exist, and somewhere to write the trees.
//! [`TerrainSnapshot`] is an in-memory implementation for tools and tests.
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alphamap::{Alphamap, WeightField, WeightGrid};
use crate::curve::ProbabilityCurve;
use crate::error::{Error, Result};
use crate::scatter::events::EventSink;
use crate::scatter::placement::TreePlacement;
use crate::scatter::runner::{scatter_trees_with_events, RunResult};
use crate::scatter::settings::ScatterSettings;

/// Terrain data owned by a host engine.
pub trait TreeTerrain {
    /// Number of alphamap (texture) layers.
    fn alphamap_layers(&self) -> usize;

    /// Copy of one alphamap layer, or `None` if `index` is out of range.
    fn alphamap_layer(&self, index: usize) -> Option<WeightGrid>;

    /// Number of tree prototypes placements may reference.
    fn tree_prototype_count(&self) -> usize;

    /// Tree instances currently on the terrain.
    fn tree_instances(&self) -> &[TreePlacement];

    /// Replaces all tree instances on the terrain.
    fn set_tree_instances(&mut self, instances: Vec<TreePlacement>);
}

/// A tree asset a placement can reference by index.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreePrototype {
    pub name: String,
}

impl TreePrototype {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// In-memory terrain: an alphamap, a prototype list and the placed trees.
#[derive(Clone, Debug)]
pub struct TerrainSnapshot {
    alphamap: Alphamap,
    prototypes: Vec<TreePrototype>,
    trees: Vec<TreePlacement>,
}

impl TerrainSnapshot {
    pub fn new(alphamap: Alphamap) -> Self {
        Self {
            alphamap,
            prototypes: Vec::new(),
            trees: Vec::new(),
        }
    }

    pub fn with_prototypes(mut self, prototypes: Vec<TreePrototype>) -> Self {
        self.prototypes = prototypes;
        self
    }

    pub fn add_prototype(&mut self, prototype: TreePrototype) -> &mut Self {
        self.prototypes.push(prototype);
        self
    }

    pub fn alphamap(&self) -> &Alphamap {
        &self.alphamap
    }

    pub fn prototypes(&self) -> &[TreePrototype] {
        &self.prototypes
    }
}

impl TreeTerrain for TerrainSnapshot {
    fn alphamap_layers(&self) -> usize {
        self.alphamap.layers()
    }

    fn alphamap_layer(&self, index: usize) -> Option<WeightGrid> {
        self.alphamap.layer_grid(index).ok()
    }

    fn tree_prototype_count(&self) -> usize {
        self.prototypes.len()
    }

    fn tree_instances(&self) -> &[TreePlacement] {
        &self.trees
    }

    fn set_tree_instances(&mut self, instances: Vec<TreePlacement>) {
        self.trees = instances;
    }
}

pub fn place_trees_by_texture<T, C, R>(
    terrain: &mut T,
    layer_index: usize,
    curve: &C,
    settings: &ScatterSettings,
    rng: &mut R,
) -> Result<RunResult>
where
    T: TreeTerrain + ?Sized,
    C: ProbabilityCurve + ?Sized,
    R: Rng,
{
    place_trees_by_texture_with_events(terrain, layer_index, curve, settings, rng, &mut ())
}

/// Scatters trees over `terrain` by the weight of alphamap layer `layer_index`.
///
/// The prototype count comes from the terrain and overrides `settings.prototype_count`.
/// The placements replace every existing tree instance, also when the budget ran out
/// before the target count; check [`RunResult::status`] for that case.
pub fn place_trees_by_texture_with_events<T, C, R>(
    terrain: &mut T,
    layer_index: usize,
    curve: &C,
    settings: &ScatterSettings,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<RunResult>
where
    T: TreeTerrain + ?Sized,
    C: ProbabilityCurve + ?Sized,
    R: Rng,
{
    let layers = terrain.alphamap_layers();
    let invalid_layer = Error::InvalidLayer {
        index: layer_index,
        layers,
    };
    if layer_index >= layers {
        return Err(invalid_layer);
    }

    let prototype_count = terrain.tree_prototype_count();
    if prototype_count == 0 {
        return Err(Error::NoPrototypes);
    }
    let settings = settings.clone().with_prototype_count(prototype_count);
    settings.validate()?;

    let grid = terrain.alphamap_layer(layer_index).ok_or(invalid_layer)?;
    if grid.is_empty() {
        return Err(Error::EmptyGrid);
    }

    let result = scatter_trees_with_events(&grid, curve, &settings, rng, sink);
    terrain.set_tree_instances(result.placements.clone());

    info!(
        "Completed generation of {} trees in {} tries.",
        terrain.tree_instances().len(),
        result.attempts
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::curve::Curve;
    use crate::scatter::runner::RunStatus;
    use crate::scatter::settings::SamplingBudget;

    fn terrain(prototypes: usize) -> TerrainSnapshot {
        // Layer 0 is painted everywhere, layer 1 nowhere.
        let cells = 8 * 8;
        let alphamap = Alphamap::from_layers(8, 8, vec![vec![1.0; cells], vec![0.0; cells]])
            .expect("valid alphamap");
        TerrainSnapshot::new(alphamap).with_prototypes(
            (0..prototypes)
                .map(|i| TreePrototype::new(format!("tree_{i}")))
                .collect(),
        )
    }

    #[test]
    fn writes_placements_back_to_terrain() {
        let mut t = terrain(2);
        let mut rng = StdRng::seed_from_u64(1);
        let result = place_trees_by_texture(
            &mut t,
            0,
            &Curve::default(),
            &ScatterSettings::new(40),
            &mut rng,
        )
        .unwrap();
        assert!(result.is_complete());
        assert_eq!(t.tree_instances().len(), 40);
        assert_eq!(t.tree_instances(), result.placements.as_slice());
    }

    #[test]
    fn prototype_count_comes_from_terrain() {
        let mut t = terrain(5);
        let mut rng = StdRng::seed_from_u64(2);
        let settings = ScatterSettings::new(300).with_prototype_count(1);
        place_trees_by_texture(&mut t, 0, &Curve::default(), &settings, &mut rng).unwrap();
        let max = t.tree_instances().iter().map(|p| p.prototype_index).max();
        assert_eq!(max, Some(4));
    }

    #[test]
    fn rejects_out_of_range_layer() {
        let mut t = terrain(1);
        let mut rng = StdRng::seed_from_u64(3);
        let err = place_trees_by_texture(
            &mut t,
            2,
            &Curve::default(),
            &ScatterSettings::new(1),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidLayer { index: 2, layers: 2 }));
    }

    #[test]
    fn rejects_terrain_without_prototypes() {
        let mut t = terrain(0);
        let mut rng = StdRng::seed_from_u64(4);
        let err = place_trees_by_texture(
            &mut t,
            0,
            &Curve::default(),
            &ScatterSettings::new(1),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoPrototypes));
    }

    #[test]
    fn unpainted_layer_exhausts_budget_and_clears_trees() {
        let mut t = terrain(1);
        let mut rng = StdRng::seed_from_u64(5);
        place_trees_by_texture(
            &mut t,
            0,
            &Curve::default(),
            &ScatterSettings::new(10),
            &mut rng,
        )
        .unwrap();
        assert_eq!(t.tree_instances().len(), 10);

        let settings = ScatterSettings::new(10).with_budget(SamplingBudget::attempts(1_000));
        let result =
            place_trees_by_texture(&mut t, 1, &Curve::default(), &settings, &mut rng).unwrap();
        assert_eq!(
            result.status,
            RunStatus::BudgetExhausted {
                limit: crate::scatter::settings::BudgetLimit::Attempts
            }
        );
        assert!(t.tree_instances().is_empty());
    }
}
