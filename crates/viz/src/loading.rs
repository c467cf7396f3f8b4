//! Two-phase image loading.
//!
//! Every manifest image is requested from the asset server up front. The host
//! stays in [`HostPhase::Loading`] until each request has either loaded or
//! failed, or until the load timeout passes. Only then is the
//! [`SpriteLibrary`] built and the run started, so the population never
//! refers to an image that is still in flight.

use aquarium_core::{AssetManifest, ImageCatalog, LoadedDimensions};
use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::render::render_resource::TextureFormat;
use std::collections::HashMap;

use crate::canvas::SpritePixels;
use crate::runner::{ActiveConfig, HostConfig};

/// Plugin for requesting and awaiting sprite images.
pub struct ImageLoadPlugin;

impl Plugin for ImageLoadPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<HostPhase>()
            .add_systems(OnEnter(HostPhase::Loading), request_images)
            .add_systems(
                Update,
                poll_image_loads.run_if(in_state(HostPhase::Loading)),
            );
    }
}

/// Where the host is in its start-up.
#[derive(States, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HostPhase {
    /// Images requested, waiting for completions.
    #[default]
    Loading,
    /// Scene built and ticking.
    Running,
}

/// Handles still owned while loading.
#[derive(Resource)]
struct PendingImages {
    handles: Vec<(String, Handle<Image>)>,
    started: f32,
}

/// Decoded pixels and sizes of every image that finished loading.
#[derive(Resource, Debug, Clone, Default)]
pub struct SpriteLibrary {
    dimensions: LoadedDimensions,
    pixels: HashMap<String, SpritePixels>,
}

impl SpriteLibrary {
    pub fn insert(&mut self, name: impl Into<String>, pixels: SpritePixels) {
        let name = name.into();
        self.dimensions
            .insert(name.clone(), (pixels.width(), pixels.height()));
        self.pixels.insert(name, pixels);
    }

    pub fn dimensions(&self) -> &LoadedDimensions {
        &self.dimensions
    }

    pub fn pixels(&self, name: &str) -> Option<&SpritePixels> {
        self.pixels.get(name)
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Catalog of the manifest's images that are present in the library.
    pub fn catalog(&self, manifest: &AssetManifest) -> ImageCatalog {
        ImageCatalog::from_loaded(manifest, &self.dimensions)
    }
}

/// Converts a loaded Bevy image into RGBA8 rows.
pub fn sprite_pixels(image: &Image) -> Option<SpritePixels> {
    let data = match image.texture_descriptor.format {
        TextureFormat::Rgba8UnormSrgb | TextureFormat::Rgba8Unorm => image.data.clone(),
        _ => image.convert(TextureFormat::Rgba8UnormSrgb)?.data,
    };
    SpritePixels::from_rgba8(image.width(), image.height(), data)
}

fn request_images(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<ActiveConfig>,
    time: Res<Time>,
) {
    let handles: Vec<(String, Handle<Image>)> = config
        .0
        .assets
        .all_names()
        .into_iter()
        .map(|name| (name.to_string(), asset_server.load(name.to_string())))
        .collect();
    tracing::info!("Requested {} images", handles.len());
    commands.insert_resource(PendingImages {
        handles,
        started: time.elapsed_seconds(),
    });
}

fn poll_image_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    pending: Option<Res<PendingImages>>,
    host: Res<HostConfig>,
    time: Res<Time>,
    mut next: ResMut<NextState<HostPhase>>,
) {
    let Some(pending) = pending else {
        return;
    };
    let settled = pending
        .handles
        .iter()
        .filter(|(_, handle)| {
            matches!(
                asset_server.get_load_state(handle.id()),
                Some(LoadState::Loaded) | Some(LoadState::Failed(_))
            )
        })
        .count();
    let waited = time.elapsed_seconds() - pending.started;
    if settled < pending.handles.len() && waited < host.load_timeout {
        return;
    }
    if settled < pending.handles.len() {
        tracing::warn!(
            "Image loading timed out after {:.1}s with {} of {} settled",
            waited,
            settled,
            pending.handles.len()
        );
    }

    let mut library = SpriteLibrary::default();
    for (name, handle) in &pending.handles {
        match images.get(handle).and_then(sprite_pixels) {
            Some(pixels) => library.insert(name.as_str(), pixels),
            None => tracing::warn!("Image {} is unavailable and will not be used", name),
        }
    }
    tracing::info!(
        "Loaded {} of {} images",
        library.len(),
        pending.handles.len()
    );

    commands.insert_resource(library);
    commands.remove_resource::<PendingImages>();
    next.set(HostPhase::Running);
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquarium_core::Species;
    use bevy::render::render_asset::RenderAssetUsages;
    use bevy::render::render_resource::{Extent3d, TextureDimension};

    fn solid(width: u32, height: u32) -> SpritePixels {
        SpritePixels::from_rgba8(width, height, vec![255; (width * height * 4) as usize]).unwrap()
    }

    #[test]
    fn test_library_feeds_catalog() {
        let manifest = AssetManifest::default();
        let mut library = SpriteLibrary::default();
        library.insert("fish7.png", solid(32, 20));

        let catalog = library.catalog(&manifest);
        assert_eq!(catalog.images().len(), 1);
        assert_eq!(catalog.species_pool(Species::Drifter).len(), 1);
        assert!(catalog.species_pool(Species::Swimmer).is_empty());
        assert_eq!(library.dimensions().get("fish7.png"), Some(&(32, 20)));
    }

    #[test]
    fn test_sprite_pixels_from_rgba_image() {
        let image = Image::new_fill(
            Extent3d {
                width: 3,
                height: 2,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            &[10, 20, 30, 255],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::MAIN_WORLD,
        );
        let pixels = sprite_pixels(&image).unwrap();
        assert_eq!((pixels.width(), pixels.height()), (3, 2));
    }
}
