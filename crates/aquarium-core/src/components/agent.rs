//! Creature agents.

use aquarium_frame::{ImageId, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assets::SpriteImage;
use crate::config::AquariumConfig;

/// Motion and rendering behavior, fixed for the life of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Cruises sideways across the tank, wrapping at the edges.
    Swimmer,
    /// Wanders on a Lissajous path around its anchor.
    Drifter,
    /// Creeps along the sand bed.
    Crawler,
    /// Jellyfish-like pulsing drifter.
    Pulsator,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Swimmer,
        Species::Drifter,
        Species::Crawler,
        Species::Pulsator,
    ];

    /// Visual width as a fraction of scene height.
    pub fn size_ratio(self, config: &AquariumConfig) -> f32 {
        match self {
            Species::Swimmer => config.swimmer.size_ratio,
            Species::Drifter => config.drifter.size_ratio,
            Species::Crawler => config.crawler.size_ratio,
            Species::Pulsator => config.pulsator.size_ratio,
        }
    }

    /// Whether neighbors push this species up and down as well as sideways.
    pub fn avoids_vertically(self) -> bool {
        match self {
            Species::Crawler => false,
            Species::Swimmer | Species::Drifter | Species::Pulsator => true,
        }
    }

    /// Drawn facing the viewer, ignoring `Facing`.
    pub fn is_frontal(self) -> bool {
        match self {
            Species::Drifter | Species::Pulsator => true,
            Species::Swimmer | Species::Crawler => false,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Swimmer => write!(f, "swimmer"),
            Species::Drifter => write!(f, "drifter"),
            Species::Crawler => write!(f, "crawler"),
            Species::Pulsator => write!(f, "pulsator"),
        }
    }
}

/// Lateral facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// One simulated creature.
///
/// Species, facing, image and aspect ratio are set at spawn and only readable
/// afterwards. Position is recomputed every tick from the anchor plus the
/// motion law's offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    species: Species,
    facing: Facing,
    image: ImageId,
    aspect_ratio: f32,
    /// Current position.
    pub position: Point,
    /// Rest point the motion law oscillates around.
    pub anchor: Point,
    /// Linear speed for swimmers and crawlers, angular rate for drifters.
    pub speed: f32,
    /// Vertical oscillation phase.
    pub phase: f32,
    /// Horizontal oscillation phase.
    pub phase_x: f32,
    /// Wander amplitude; zero for species that do not drift.
    pub drift_radius: f32,
    /// Smoothed horizontal avoidance.
    pub lateral_offset: f32,
    /// Smoothed vertical avoidance (pulsators also accumulate propulsion here).
    pub vertical_offset: f32,
    /// Bell contraction in `0..=1`, pulsators only.
    pub pulse: f32,
}

impl Agent {
    /// Creates an agent resting at `anchor` drawn with `image`.
    pub fn new(species: Species, facing: Facing, image: &SpriteImage, anchor: Point) -> Self {
        Self {
            species,
            facing,
            image: image.id,
            aspect_ratio: image.aspect_ratio(),
            position: anchor,
            anchor,
            speed: 0.0,
            phase: 0.0,
            phase_x: 0.0,
            drift_radius: 0.0,
            lateral_offset: 0.0,
            vertical_offset: 0.0,
            pulse: 0.0,
        }
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn image(&self) -> ImageId {
        self.image
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Drawn width and height in pixels for a scene of `scene_height`.
    pub fn visual_size(&self, config: &AquariumConfig, scene_height: f32) -> (f32, f32) {
        let width = self.species.size_ratio(config) * scene_height;
        (width, width / self.aspect_ratio.max(0.01))
    }
}
