//! Main aquarium plugin that ties all systems together.

use bevy::prelude::*;

use crate::loading::ImageLoadPlugin;
use crate::reload::ConfigReloadPlugin;
use crate::runner::{ActiveConfig, HostConfig, RunnerPlugin};

/// Main plugin for the aquarium window.
///
/// Sets up a window sized to the scene, points the asset server at the
/// sprite directory, and adds the loading, runner and reload plugins.
/// `HostConfig` and `ActiveConfig` may be inserted beforehand; missing ones
/// are resolved here.
pub struct AquariumPlugin;

impl Plugin for AquariumPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<HostConfig>() {
            app.init_resource::<HostConfig>();
        }
        let host = app.world().resource::<HostConfig>().clone();
        if !app.world().contains_resource::<ActiveConfig>() {
            let config = host.resolve().unwrap_or_else(|e| {
                tracing::warn!("Invalid configuration ({}), using defaults", e);
                Default::default()
            });
            app.insert_resource(ActiveConfig(config));
        }
        let scene = &app.world().resource::<ActiveConfig>().0.scene;
        let (width, height) = (scene.width as f32, scene.height as f32);

        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Aquarium".into(),
                        resolution: (width, height).into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: host.assets_dir.to_string_lossy().into_owned(),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()), // Pixel-perfect sprites
        )
        .add_plugins((ImageLoadPlugin, RunnerPlugin, ConfigReloadPlugin));
    }
}
