use std::sync::Arc;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy_tree_scatter::prelude::*;

#[derive(Resource, Default)]
struct SettingsHandle(Handle<TreeScatterAsset>);

fn main() {
    App::new()
        .init_resource::<SettingsHandle>()
        .add_plugins(DefaultPlugins)
        .add_plugins(TreeScatterPlugin)
        .add_systems(Startup, load_settings)
        .add_systems(Update, trigger_request)
        .add_observer(log_finished)
        .add_observer(log_failed)
        .run();
}

/// Loads the scatter settings asset on startup.
fn load_settings(mut handle: ResMut<SettingsHandle>, assets: Res<AssetServer>) {
    handle.0 = assets.load("forest.trees");
}

/// Paints an RGBA splatmap: open ground in R, a ring of scrub in G and a round
/// forest patch in B.
fn demo_splatmap_image(size: u32) -> Image {
    let n = size.max(2) as f32 - 1.0;
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 / n - 0.5;
            let dy = y as f32 / n - 0.5;
            let d = (dx * dx + dy * dy).sqrt();
            let forest = (1.0 - d / 0.35).clamp(0.0, 1.0);
            let scrub = (1.0 - (d - 0.4).abs() / 0.1).clamp(0.0, 1.0) * (1.0 - forest);
            let ground = (1.0 - forest - scrub).max(0.0);
            for w in [ground, scrub, forest, 0.0] {
                data.push((w * 255.0).round() as u8);
            }
        }
    }
    Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8Unorm,
        RenderAssetUsages::default(),
    )
}

/// Triggers a scatter request once the settings asset is loaded.
fn trigger_request(
    mut commands: Commands,
    mut once: Local<bool>,
    handle: Res<SettingsHandle>,
    assets: Res<Assets<TreeScatterAsset>>,
) {
    // Only run once.
    if *once {
        return;
    }
    // Wait until the asset is loaded.
    if assets.get(&handle.0).is_none() {
        return;
    }
    *once = true;

    let Some(alphamap) = alphamap_from_image(&demo_splatmap_image(256)) else {
        error!("Demo splatmap has an unsupported format");
        return;
    };

    // Spawn an entity to track the request.
    // In real applications this would be the terrain entity.
    let entity = commands.spawn_empty().id();

    // Three tree prototypes, fixed seed for a repeatable forest.
    commands.trigger(TreeScatterRequest::new(
        entity,
        handle.0.clone(),
        Arc::new(alphamap),
        3,
        42,
    ));
}

/// Observes the `EntityEvent` when a scatter run has finished.
fn log_finished(finished: On<TreeScatterFinished>, mut commands: Commands) {
    let result = &finished.result;
    info!(
        "Completed generation of {} trees in {} tries ({:?}).",
        result.placements.len(),
        result.attempts,
        result.status
    );
    if let Some(first) = result.placements.first() {
        info!(
            "First tree: position=({:.3}, {:.3}) prototype={} height={:.2}",
            first.position.x, first.position.z, first.prototype_index, first.height_scale
        );
    }

    commands.entity(finished.entity).despawn();
}

fn log_failed(failed: On<TreeScatterFailed>, mut commands: Commands) {
    warn!("Tree scatter failed: {}", failed.reason);
    commands.entity(failed.entity).despawn();
}
