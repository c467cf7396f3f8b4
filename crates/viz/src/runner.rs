//! Aquarium runner: drives the animation loop from Bevy's update schedule.
//!
//! Bevy plays the frame host. Each `Update` delivers the pending frame
//! request, the scene paints into the [`PixelCanvas`], and the canvas is
//! copied into the texture shown by a full-window sprite.

use aquarium_core::{
    AnimationLoop, AquariumConfig, AquariumError, AquariumScene, FrameHost, FrameRequest,
    DEFAULT_CONFIG_PATH,
};
use aquarium_frame::Rgba;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;
use std::path::PathBuf;

use crate::canvas::PixelCanvas;
use crate::loading::{HostPhase, SpriteLibrary};

/// Ticks between window title refreshes.
const TITLE_INTERVAL: u64 = 30;

/// Plugin for running the scene once images are ready.
pub struct RunnerPlugin;

impl Plugin for RunnerPlugin {
    fn build(&self, app: &mut App) {
        // HostConfig should be inserted by main.rs before adding this plugin
        if !app.world().contains_resource::<HostConfig>() {
            app.init_resource::<HostConfig>();
        }

        app.add_systems(OnEnter(HostPhase::Running), start_run)
            .add_systems(
                Update,
                (advance_run, update_title)
                    .chain()
                    .run_if(in_state(HostPhase::Running)),
            )
            .add_systems(Last, stop_on_exit);
    }
}

/// Host settings from the command line.
#[derive(Resource, Debug, Clone)]
pub struct HostConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub count: Option<usize>,
    pub seed: Option<u64>,
    /// Tuning file, watched for changes while running.
    pub config_path: PathBuf,
    /// When set, a missing or invalid tuning file is an error.
    pub config_explicit: bool,
    /// Root directory for sprite images.
    pub assets_dir: PathBuf,
    /// Seconds to wait for images before starting with what loaded.
    pub load_timeout: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            count: None,
            seed: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            config_explicit: false,
            assets_dir: PathBuf::from("assets"),
            load_timeout: 10.0,
        }
    }
}

impl HostConfig {
    /// Reads the tuning file and applies command line overrides.
    pub fn resolve(&self) -> Result<AquariumConfig, AquariumError> {
        let mut config = if self.config_explicit {
            AquariumConfig::from_file(&self.config_path)?
        } else {
            AquariumConfig::load_or_default(&self.config_path)
        };
        if let Some(width) = self.width {
            config.scene.width = width;
        }
        if let Some(height) = self.height {
            config.scene.height = height;
        }
        if let Some(count) = self.count {
            config.scene.count = count;
        }
        if let Some(seed) = self.seed {
            config.scene.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Configuration the current run was built from.
#[derive(Resource, Debug, Clone)]
pub struct ActiveConfig(pub AquariumConfig);

/// Frame host fed by Bevy's update loop: a scheduled request is delivered on
/// the next `Update`.
#[derive(Debug, Default)]
pub struct UpdateHost {
    next_id: u64,
    scheduled: Option<FrameRequest>,
}

impl UpdateHost {
    pub fn take_scheduled(&mut self) -> Option<FrameRequest> {
        self.scheduled.take()
    }

    pub fn scheduled(&self) -> Option<FrameRequest> {
        self.scheduled
    }
}

impl FrameHost for UpdateHost {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.scheduled = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.scheduled == Some(request) {
            self.scheduled = None;
        }
    }
}

/// Marker for the sprite showing the canvas.
#[derive(Component)]
pub struct AquariumSprite;

/// The live run: loop, host, canvas and the texture it is uploaded to.
#[derive(Resource)]
pub struct AquariumRun {
    animation: AnimationLoop,
    host: UpdateHost,
    canvas: PixelCanvas,
    texture: Handle<Image>,
}

impl AquariumRun {
    /// Builds the scene from `config` and the loaded sprites, then starts it.
    pub fn new(
        config: AquariumConfig,
        library: &SpriteLibrary,
        texture: Handle<Image>,
    ) -> Result<Self, AquariumError> {
        let (width, height) = (config.scene.width, config.scene.height);
        let mut canvas =
            PixelCanvas::new(width, height).ok_or(AquariumError::Canvas { width, height })?;
        let catalog = library.catalog(&config.assets);
        for image in catalog.images() {
            if let Some(pixels) = library.pixels(&image.name) {
                canvas.insert_image(image.id, pixels.clone());
            }
        }

        let mut host = UpdateHost::default();
        let mut animation = AnimationLoop::new(AquariumScene::new(config, catalog));
        animation.start(&mut host);
        Ok(Self {
            animation,
            host,
            canvas,
            texture,
        })
    }

    /// Delivers the scheduled frame, if any. Returns whether a tick ran.
    pub fn advance(&mut self) -> bool {
        let Some(request) = self.host.take_scheduled() else {
            return false;
        };
        self.canvas.clear(Rgba::BLACK);
        self.animation.on_frame(&mut self.host, request, &mut self.canvas)
    }

    /// Stops the loop, logging the final stats. Idempotent.
    pub fn stop(&mut self) {
        if let Some(scene) = self.animation.scene() {
            match serde_json::to_string(&scene.stats()) {
                Ok(json) => tracing::info!("Final stats: {}", json),
                Err(e) => tracing::warn!("Could not encode stats: {}", e),
            }
        }
        self.animation.stop(&mut self.host);
    }

    /// Tears the current run down and starts a fresh one from `config`,
    /// keeping the same texture. On error the current run keeps going.
    pub fn rebuild(&mut self, config: AquariumConfig, library: &SpriteLibrary) -> Result<(), AquariumError> {
        let next = Self::new(config, library, self.texture.clone())?;
        self.stop();
        *self = next;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    pub fn scene(&self) -> Option<&AquariumScene> {
        self.animation.scene()
    }

    pub fn host(&self) -> &UpdateHost {
        &self.host
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn texture(&self) -> &Handle<Image> {
        &self.texture
    }
}

/// Blank RGBA texture the canvas is copied into.
pub fn canvas_texture(width: u32, height: u32) -> Image {
    Image::new_fill(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

fn start_run(
    mut commands: Commands,
    config: Res<ActiveConfig>,
    library: Res<SpriteLibrary>,
    mut images: ResMut<Assets<Image>>,
    mut exit: EventWriter<AppExit>,
) {
    let scene = &config.0.scene;
    let texture = images.add(canvas_texture(scene.width, scene.height));
    commands.spawn(Camera2dBundle::default());
    commands.spawn((
        SpriteBundle {
            texture: texture.clone(),
            ..default()
        },
        AquariumSprite,
    ));
    match AquariumRun::new(config.0.clone(), &library, texture) {
        Ok(run) => commands.insert_resource(run),
        Err(e) => {
            tracing::error!("Could not start the aquarium: {}", e);
            exit.send(AppExit::error());
        }
    }
}

fn advance_run(run: Option<ResMut<AquariumRun>>, mut images: ResMut<Assets<Image>>) {
    let Some(mut run) = run else {
        return;
    };
    if !run.advance() {
        return;
    }
    if let Some(image) = images.get_mut(&run.texture) {
        run.canvas.write_rgba8(&mut image.data);
    }
}

fn update_title(
    run: Option<Res<AquariumRun>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Some(scene) = run.as_ref().and_then(|r| r.scene()) else {
        return;
    };
    if scene.tick() % TITLE_INTERVAL != 0 {
        return;
    }
    if let Ok(mut window) = windows.get_single_mut() {
        window.title = format!("Aquarium | {}", scene.stats());
    }
}

fn stop_on_exit(mut exits: EventReader<AppExit>, run: Option<ResMut<AquariumRun>>) {
    if exits.read().next().is_none() {
        return;
    }
    if let Some(mut run) = run {
        run.stop();
    }
}
