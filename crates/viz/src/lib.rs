//! Windowed aquarium host: Bevy app, image loading, software canvas.

pub mod canvas;
pub mod loading;
pub mod plugin;
pub mod reload;
pub mod runner;

pub use canvas::{PixelCanvas, SpritePixels};
pub use loading::{HostPhase, SpriteLibrary};
pub use plugin::AquariumPlugin;
pub use runner::{ActiveConfig, AquariumRun, HostConfig};
