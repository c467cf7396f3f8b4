//! Aquarium simulation core: creature population, motion laws, ambient
//! particles and the layered compositor, drawing through [`DrawSurface`].

pub mod assets;
pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod scene;
pub mod schedule;
pub mod setup;
pub mod surface;
pub mod systems;

pub use assets::{AssetManifest, ImageCatalog, LoadedDimensions, SpriteImage};
pub use components::{Agent, Facing, SceneSize, Species};
pub use config::{AquariumConfig, DEFAULT_CONFIG_PATH};
pub use error::{AquariumError, AssetError, ConfigError};
pub use output::{RecordingSurface, SceneStats};
pub use scene::AquariumScene;
pub use schedule::{AnimationLoop, FrameHost, FrameRequest, ManualHost};
pub use surface::DrawSurface;
