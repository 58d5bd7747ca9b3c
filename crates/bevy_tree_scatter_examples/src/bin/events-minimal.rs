use std::sync::Arc;

use bevy::prelude::*;
use bevy_tree_scatter::prelude::*;

#[derive(Default, Resource)]
struct SettingsHandle(Handle<TreeScatterAsset>);

fn main() {
    App::new()
        .init_resource::<SettingsHandle>()
        // Forward every candidate too; fine for a small run.
        .insert_resource(TreeScatterBusConfig::only(&[
            ScatterEventKind::RunStarted,
            ScatterEventKind::CandidateEvaluated,
            ScatterEventKind::PlacementMade,
            ScatterEventKind::BudgetExhausted,
            ScatterEventKind::Warning,
            ScatterEventKind::RunFinished,
        ]))
        .add_plugins(DefaultPlugins)
        .add_plugins(TreeScatterPlugin)
        .add_systems(Startup, load_assets)
        .add_systems(Update, trigger_request)
        .add_systems(Update, on_scatter_message)
        .run();
}

/// Loads the scatter settings asset on startup.
fn load_assets(mut handle: ResMut<SettingsHandle>, asset_server: Res<AssetServer>) {
    handle.0 = asset_server.load("forest.trees");
}

/// Triggers a scatter request over a small gradient once the asset is loaded.
fn trigger_request(
    mut commands: Commands,
    mut once: Local<bool>,
    handle: Res<SettingsHandle>,
    assets: Res<Assets<TreeScatterAsset>>,
) {
    if *once || assets.get(&handle.0).is_none() {
        return;
    }
    *once = true;

    // Three layers over 8x8 cells; only layer 2 (the one the asset reads) ramps up.
    let cells = 8 * 8;
    let ramp: Vec<f32> = (0..cells).map(|i| (i % 8) as f32 / 7.0).collect();
    let alphamap = match Alphamap::from_layers(8, 8, vec![vec![0.0; cells], vec![0.0; cells], ramp])
    {
        Ok(map) => map,
        Err(err) => {
            error!("Could not build alphamap: {err}");
            return;
        }
    };

    let entity = commands.spawn_empty().id();
    commands.trigger(TreeScatterRequest::new(
        entity,
        handle.0.clone(),
        Arc::new(alphamap),
        2,
        7,
    ));
}

fn on_scatter_message(mut reader: MessageReader<TreeScatterMessage>) {
    for msg in reader.read() {
        let entity = msg.request_entity;

        match &msg.event {
            ScatterEvent::RunStarted {
                settings,
                grid_size,
            } => {
                info!(
                    "Run started for {:?}: {} trees over {}x{} cells",
                    entity, settings.target_count, grid_size.0, grid_size.1
                );
            }
            ScatterEvent::CandidateEvaluated {
                attempt,
                grid_position,
                weight,
                probability,
                accepted,
            } => {
                debug!(
                    "Candidate #{attempt} at ({:.2},{:.2}): weight={weight:.3} p={probability:.3} accepted={accepted}",
                    grid_position.x, grid_position.y
                );
            }
            ScatterEvent::PlacementMade { index, placement } => {
                if index % 250 == 0 {
                    info!(
                        "Tree #{index}: ({:.3},{:.3}) prototype={}",
                        placement.position.x, placement.position.z, placement.prototype_index
                    );
                }
            }
            ScatterEvent::BudgetExhausted {
                limit,
                placed,
                attempts,
            } => {
                warn!("Budget ({limit:?}) exhausted after {attempts} tries with {placed} trees");
            }
            ScatterEvent::RunFinished { result } => {
                info!(
                    "Run finished for {:?}: placed={} attempts={} rejected={}",
                    entity,
                    result.placements.len(),
                    result.attempts,
                    result.rejected
                );
            }
            ScatterEvent::Warning { context, message } => {
                warn!("Warning '{}': {}", context, message);
            }
            _ => {}
        }
    }
}
