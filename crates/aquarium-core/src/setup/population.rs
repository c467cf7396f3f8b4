//! Agent Spawning
//!
//! Species are drawn by independent weighted sampling from the ratio table,
//! so realized proportions carry sampling noise and only converge on the
//! table as the count grows.

use aquarium_frame::Point;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::TAU;

use crate::assets::ImageCatalog;
use crate::components::{Agent, Facing, SceneSize, Species};
use crate::config::{AquariumConfig, SpeciesRatios};

/// Weighted species sampler. Each species is drawn with probability
/// proportional to its ratio (`{A:2, B:1}` picks A two times in three).
#[derive(Debug, Clone)]
pub struct SpeciesPicker {
    species: Vec<Species>,
    index: WeightedIndex<u64>,
}

impl SpeciesPicker {
    /// Builds a sampler over the species that have loaded images and a
    /// positive weight. `None` when there are none.
    pub fn new(ratios: &SpeciesRatios, catalog: &ImageCatalog) -> Option<Self> {
        let species: Vec<Species> = Species::ALL
            .iter()
            .copied()
            .filter(|s| ratios.weight(*s) > 0 && !catalog.species_pool(*s).is_empty())
            .collect();
        // Widened so four u32 weights can never overflow the running total.
        let index = WeightedIndex::new(species.iter().map(|s| u64::from(ratios.weight(*s)))).ok()?;
        Some(Self { species, index })
    }

    /// Species the picker can return, in `Species::ALL` order.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn pick(&self, rng: &mut SmallRng) -> Species {
        self.species[self.index.sample(rng)]
    }
}

/// Spawns `count` agents. Each draw picks a species by weight and an image
/// uniformly from that species' pool.
pub fn spawn_population(
    count: usize,
    config: &AquariumConfig,
    catalog: &ImageCatalog,
    size: SceneSize,
    rng: &mut SmallRng,
) -> Vec<Agent> {
    let Some(picker) = SpeciesPicker::new(&config.species, catalog) else {
        if count > 0 {
            tracing::warn!("No spawnable species, population stays empty");
        }
        return Vec::new();
    };

    let mut agents = Vec::with_capacity(count);
    for _ in 0..count {
        let species = picker.pick(rng);
        let Some(image) = catalog
            .species_pool(species)
            .choose(rng)
            .and_then(|id| catalog.get(*id))
        else {
            continue;
        };
        let facing = if rng.gen_bool(0.5) {
            Facing::Right
        } else {
            Facing::Left
        };
        let anchor = spawn_anchor(species, config, size, rng);
        let mut agent = Agent::new(species, facing, image, anchor);
        init_motion(&mut agent, config, rng);
        agents.push(agent);
    }

    tracing::info!("Spawned {} agents", agents.len());
    agents
}

/// Species-biased resting point.
fn spawn_anchor(species: Species, config: &AquariumConfig, size: SceneSize, rng: &mut SmallRng) -> Point {
    let x = rng.gen::<f32>() * size.width;
    let y = match species {
        Species::Swimmer => rng.gen::<f32>() * size.height * config.swimmer.anchor_band,
        Species::Drifter => {
            size.height * lerp(config.drifter.anchor_top, config.drifter.anchor_bottom, rng.gen())
        }
        Species::Crawler => {
            let sand_top = size.sand_top(config.environment.sand_ratio);
            let bed = size.sand_height(config.environment.sand_ratio);
            sand_top + rng.gen::<f32>() * bed * config.crawler.bed_band
        }
        Species::Pulsator => {
            size.height * lerp(config.pulsator.anchor_top, config.pulsator.anchor_bottom, rng.gen())
        }
    };
    Point::new(x, y)
}

/// Speed, phases and drift radius for a freshly spawned agent.
fn init_motion(agent: &mut Agent, config: &AquariumConfig, rng: &mut SmallRng) {
    agent.phase = rng.gen::<f32>() * TAU;
    agent.phase_x = rng.gen::<f32>() * TAU;

    match agent.species() {
        Species::Swimmer => {
            agent.speed = lerp(config.swimmer.min_speed, config.swimmer.max_speed, rng.gen());
        }
        Species::Drifter => {
            agent.speed = lerp(config.drifter.min_speed, config.drifter.max_speed, rng.gen());
            agent.drift_radius = config.drifter.radius_base * (1.0 + rng.gen::<f32>());
        }
        Species::Crawler => {
            let jitter = config.crawler.speed_jitter * (rng.gen::<f32>() * 2.0 - 1.0);
            agent.speed = config.crawler.speed * (1.0 + jitter);
        }
        Species::Pulsator => {
            agent.speed = config.pulsator.pulse_rate;
            agent.drift_radius = config.pulsator.drift_radius;
        }
    }
}

pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
