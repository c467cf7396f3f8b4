//! Ambient particle pools. Sizes are fixed at setup; particles are recycled
//! rather than reallocated.

use aquarium_frame::Point;
use rand::rngs::SmallRng;
use rand::Rng;
use std::f32::consts::TAU;

use crate::components::{AmbientParticle, SceneSize};
use crate::config::AquariumConfig;

use super::population::lerp;

/// Steady bubble count: one per agent, never below the floor.
pub fn bubble_count(config: &AquariumConfig, agent_count: usize) -> usize {
    let per_agent = (agent_count as f32 * config.bubbles.per_agent).round() as usize;
    config.bubbles.min_count.max(per_agent)
}

/// Marine snow count: proportional to scene area, never below the floor.
pub fn snow_count(config: &AquariumConfig, size: SceneSize) -> usize {
    let area = (size.width * size.height).max(0.0);
    let by_area = (area / config.marine_snow.pixels_per_mote.max(1.0)) as usize;
    config.marine_snow.min_count.max(by_area)
}

/// Rising bubbles scattered over the whole height.
pub fn spawn_bubbles(
    config: &AquariumConfig,
    agent_count: usize,
    size: SceneSize,
    rng: &mut SmallRng,
) -> Vec<AmbientParticle> {
    let cfg = &config.bubbles;
    (0..bubble_count(config, agent_count))
        .map(|_| AmbientParticle {
            position: Point::new(rng.gen::<f32>() * size.width, rng.gen::<f32>() * size.height),
            radius: lerp(cfg.min_radius, cfg.max_radius, rng.gen()),
            speed: lerp(cfg.min_speed, cfg.max_speed, rng.gen()),
            phase: rng.gen::<f32>() * TAU,
            amplitude: cfg.shake,
        })
        .collect()
}

/// Slowly sinking motes.
pub fn spawn_snow(config: &AquariumConfig, size: SceneSize, rng: &mut SmallRng) -> Vec<AmbientParticle> {
    let cfg = &config.marine_snow;
    (0..snow_count(config, size))
        .map(|_| AmbientParticle {
            position: Point::new(rng.gen::<f32>() * size.width, rng.gen::<f32>() * size.height),
            radius: lerp(cfg.min_radius, cfg.max_radius, rng.gen()),
            speed: lerp(cfg.min_speed, cfg.max_speed, rng.gen()),
            phase: rng.gen::<f32>() * TAU,
            amplitude: rng.gen::<f32>() * cfg.max_sway,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_counts_have_floors() {
        let config = AquariumConfig::default();
        assert_eq!(bubble_count(&config, 0), 12);
        assert_eq!(bubble_count(&config, 40), 40);
        assert_eq!(snow_count(&config, SceneSize::new(100.0, 100.0)), 30);
        assert_eq!(snow_count(&config, SceneSize::new(1200.0, 400.0)), 60);
    }

    #[test]
    fn test_bubbles_start_inside_scene() {
        let config = AquariumConfig::default();
        let mut rng = SmallRng::seed_from_u64(4);
        let size = SceneSize::new(300.0, 200.0);
        for b in spawn_bubbles(&config, 5, size, &mut rng) {
            assert!(b.position.x >= 0.0 && b.position.x < 300.0);
            assert!(b.position.y >= 0.0 && b.position.y < 200.0);
            assert!(b.speed >= 0.2 && b.speed <= 0.4);
        }
    }
}
