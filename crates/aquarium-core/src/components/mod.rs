//! Entity data for one aquarium run.

pub mod agent;
pub mod ambient;
pub mod scenery;

pub use agent::{Agent, Facing, Species};
pub use ambient::{AmbientParticle, BubbleEmitter, EmitterState};
pub use scenery::{Decor, DecorKind, DecorLayer, SandBlemish, Weed};

/// Canvas dimensions in pixels, as supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSize {
    pub width: f32,
    pub height: f32,
}

impl SceneSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Height of the sand bed.
    pub fn sand_height(&self, sand_ratio: f32) -> f32 {
        self.height * sand_ratio
    }

    /// Y coordinate of the sand surface.
    pub fn sand_top(&self, sand_ratio: f32) -> f32 {
        self.height - self.sand_height(sand_ratio)
    }
}
