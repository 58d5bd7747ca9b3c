//! Bevy plugin for tree_scatter providing the settings asset, message types, and systems
//! that run scatter jobs on the async compute pool.
#![forbid(unsafe_code)]

use std::sync::Arc;

#[cfg(feature = "ron")]
pub use assets::TreeScatterAssetLoader;
pub use assets::TreeScatterAsset;
use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};
pub use events::{ChannelSink, TreeScatterBus, TreeScatterBusConfig, TreeScatterMessage};
use rand::rngs::StdRng;
use rand::SeedableRng;
pub use textures::alphamap_from_image;
use tree_scatter::error::Error as ScatterError;
use tree_scatter::prelude::{scatter_trees_with_events, Alphamap, RunResult, WeightField};

mod assets;
mod events;
mod textures;

/// Convenient re-exports for common types. Import with `use bevy_tree_scatter::prelude::*;`.
///
/// `tree_scatter`'s `Curve` and `Result` are left out since `bevy::prelude` exports
/// items with the same names.
pub mod prelude {
    pub use tree_scatter::prelude::{
        Alphamap, BudgetLimit, Keyframe, RunResult, RunStatus, SamplingBudget, ScaleRange,
        ScatterEvent, ScatterEventKind, ScatterSettings, TreePlacement,
    };

    pub use crate::assets::TreeScatterAsset;
    #[cfg(feature = "ron")]
    pub use crate::assets::TreeScatterAssetLoader;
    pub use crate::events::{
        ChannelSink, TreeScatterBus, TreeScatterBusConfig, TreeScatterMessage,
    };
    pub use crate::textures::alphamap_from_image;
    pub use crate::{TreeScatterFailed, TreeScatterFinished, TreeScatterPlugin, TreeScatterRequest};
}

/// Bevy plugin providing the settings asset, resources, message types, and systems.
pub struct TreeScatterPlugin;

/// A request to scatter trees over one alphamap with settings from an asset.
#[non_exhaustive]
#[derive(EntityEvent)]
pub struct TreeScatterRequest {
    /// Entity used to track the request.
    pub entity: Entity,
    /// Handle to the scatter settings asset.
    pub settings: Handle<TreeScatterAsset>,
    /// Splatmap whose layer `TreeScatterAsset::layer_index` drives placement.
    pub alphamap: Arc<Alphamap>,
    /// Number of tree prototypes placements may reference.
    pub prototype_count: usize,
    /// RNG seed for deterministic scattering.
    pub seed: u64,
}

impl TreeScatterRequest {
    pub fn new(
        entity: Entity,
        settings: Handle<TreeScatterAsset>,
        alphamap: Arc<Alphamap>,
        prototype_count: usize,
        seed: u64,
    ) -> Self {
        Self {
            entity,
            settings,
            alphamap,
            prototype_count,
            seed,
        }
    }
}

/// Component holding an async scatter job task.
/// This is added to the request entity when a job is spawned.
#[derive(Component)]
struct TreeScatterJob {
    task: Option<Task<Result<RunResult, ScatterError>>>,
}

/// [`EntityEvent`] triggered when a scatter run has finished, completed or not.
#[non_exhaustive]
#[derive(EntityEvent, Clone)]
pub struct TreeScatterFinished {
    /// Entity associated with the original request.
    pub entity: Entity,
    /// Result produced by the scatter run.
    pub result: RunResult,
}

/// [`EntityEvent`] triggered when a request could not be run.
#[non_exhaustive]
#[derive(EntityEvent, Clone)]
pub struct TreeScatterFailed {
    /// Entity associated with the original request.
    pub entity: Entity,
    /// Why the run was rejected.
    pub reason: String,
}

impl Plugin for TreeScatterPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<TreeScatterMessage>()
            .init_asset::<TreeScatterAsset>()
            .init_resource::<TreeScatterBusConfig>()
            .init_resource::<TreeScatterBus>()
            .add_systems(Update, poll_scatter_jobs)
            .add_systems(Update, drain_scatter_messages)
            .add_observer(spawn_scatter_job);

        #[cfg(feature = "ron")]
        app.init_asset_loader::<TreeScatterAssetLoader>();
    }
}

fn spawn_scatter_job(
    request: On<TreeScatterRequest>,
    mut commands: Commands,
    bus: Res<TreeScatterBus>,
    bus_config: Res<TreeScatterBusConfig>,
    assets: Res<Assets<TreeScatterAsset>>,
) {
    let entity = request.entity;

    let Some(asset) = assets.get(&request.settings) else {
        error!("TreeScatterAsset not loaded yet: {:?}", request.settings);
        commands.trigger(TreeScatterFailed {
            entity,
            reason: "settings asset not loaded".to_string(),
        });
        return;
    };

    // Prepare data for the task
    let asset = asset.clone();
    let alphamap = request.alphamap.clone();
    let prototype_count = request.prototype_count;
    let seed = request.seed;
    let sink = ChannelSink {
        request: entity,
        tx: bus.sender().clone(),
        kinds: bus_config.kinds.clone(),
    };

    let task = AsyncComputeTaskPool::get().spawn(async move {
        run_request(&asset, &alphamap, prototype_count, seed, sink)
    });

    commands
        .entity(entity)
        .insert(TreeScatterJob { task: Some(task) });
}

fn run_request(
    asset: &TreeScatterAsset,
    alphamap: &Alphamap,
    prototype_count: usize,
    seed: u64,
    mut sink: ChannelSink,
) -> Result<RunResult, ScatterError> {
    let settings = asset
        .settings
        .clone()
        .with_prototype_count(prototype_count);
    settings.validate()?;

    let layer = alphamap.layer(asset.layer_index)?;
    if layer.is_empty() {
        return Err(ScatterError::EmptyGrid);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(scatter_trees_with_events(
        &layer,
        &asset.curve,
        &settings,
        &mut rng,
        &mut sink,
    ))
}

fn poll_scatter_jobs(mut commands: Commands, mut job_query: Query<(Entity, &mut TreeScatterJob)>) {
    for (entity, mut job) in job_query.iter_mut() {
        if let Some(task) = job.task.take() {
            if task.is_finished() {
                // Remove job component when done.
                commands.entity(entity).remove::<TreeScatterJob>();

                match block_on(task) {
                    Ok(result) => commands.trigger(TreeScatterFinished { entity, result }),
                    Err(err) => {
                        warn!("Tree scatter request {:?} rejected: {}", entity, err);
                        commands.trigger(TreeScatterFailed {
                            entity,
                            reason: err.to_string(),
                        });
                    }
                }
            } else {
                job.task = Some(task);
            }
        }
    }
}

fn drain_scatter_messages(
    bus: Res<TreeScatterBus>,
    mut messages: ResMut<Messages<TreeScatterMessage>>,
) {
    while let Ok(message) = bus.receiver().try_recv() {
        messages.write(message);
    }
}
