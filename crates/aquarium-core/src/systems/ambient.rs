//! Ambient Particles
//!
//! Steady bubbles rise and marine snow sinks; both are recycled at the far
//! edge instead of being reallocated. Burst bubbles come from short-lived
//! emitters on the sand and outlive them: the field owns every released
//! bubble until it rises past the top.

use aquarium_frame::Point;
use rand::rngs::SmallRng;
use rand::Rng;
use std::f32::consts::TAU;

use crate::components::{AmbientParticle, BubbleEmitter, EmitterState, SceneSize};
use crate::config::{AquariumConfig, EmitterConfig};
use crate::setup::lerp;

/// Moves a bubble up one tick. A bubble already more than `margin` above the
/// top is instead recycled to `margin` below the bottom at a fresh x.
pub fn step_bubble(particle: &mut AmbientParticle, size: SceneSize, margin: f32, rng: &mut SmallRng) {
    if particle.position.y < -margin {
        particle.position = Point::new(rng.gen::<f32>() * size.width, size.height + margin);
    } else {
        particle.position.y -= particle.speed;
    }
}

/// Mirror of [`step_bubble`] for sinking motes.
pub fn step_snow(particle: &mut AmbientParticle, size: SceneSize, margin: f32, rng: &mut SmallRng) {
    if particle.position.y > size.height + margin {
        particle.position = Point::new(rng.gen::<f32>() * size.width, -margin);
    } else {
        particle.position.y += particle.speed;
    }
}

/// The set of live bubble emitters, the bubbles they released, and the time
/// the next emitter is due.
#[derive(Debug, Clone)]
pub struct EmitterField {
    emitters: Vec<BubbleEmitter>,
    bursts: Vec<AmbientParticle>,
    next_spawn_at: f32,
}

impl EmitterField {
    pub fn new(config: &EmitterConfig, rng: &mut SmallRng) -> Self {
        Self {
            emitters: Vec::new(),
            bursts: Vec::new(),
            next_spawn_at: lerp(config.min_gap, config.max_gap, rng.gen()),
        }
    }

    pub fn emitters(&self) -> &[BubbleEmitter] {
        &self.emitters
    }

    pub fn next_spawn_at(&self) -> f32 {
        self.next_spawn_at
    }

    pub fn active_count(&self) -> usize {
        self.emitters
            .iter()
            .filter(|e| e.state() == EmitterState::Active)
            .count()
    }

    /// Every burst bubble still in the water, including those whose emitter
    /// has been reaped.
    pub fn bubbles(&self) -> impl Iterator<Item = &AmbientParticle> {
        self.bursts.iter()
    }

    /// Advances lifecycles, reaps removed emitters, spawns a due emitter,
    /// releases burst bubbles and moves them.
    pub fn update(&mut self, time: f32, size: SceneSize, config: &AquariumConfig, rng: &mut SmallRng) {
        let cfg = &config.emitters;

        for emitter in &mut self.emitters {
            if let Some(state) = emitter.advance(time, cfg.grace_period) {
                tracing::debug!(
                    "Emitter at ({:.0}, {:.0}) is now {:?}",
                    emitter.origin.x,
                    emitter.origin.y,
                    state
                );
            }
        }
        self.emitters.retain(|e| e.state() != EmitterState::Removed);

        // At the cap the spawn stays due and fires once a slot frees up.
        if time >= self.next_spawn_at && self.active_count() < cfg.max_active {
            let sand_top = size.sand_top(config.environment.sand_ratio);
            let sand_height = size.sand_height(config.environment.sand_ratio);
            let origin = Point::new(
                rng.gen::<f32>() * size.width,
                sand_top + rng.gen::<f32>() * sand_height * 0.5,
            );
            let duration = lerp(cfg.min_duration, cfg.max_duration, rng.gen());
            self.emitters.push(BubbleEmitter::new(origin, time, duration));
            self.next_spawn_at = time + lerp(cfg.min_gap, cfg.max_gap, rng.gen());
            tracing::debug!("Spawned emitter for {:.2}s, next due at {:.2}", duration, self.next_spawn_at);
        }

        let bubbles = &config.bubbles;
        for emitter in &mut self.emitters {
            if emitter.state() != EmitterState::Active {
                continue;
            }
            emitter.ticks_since_release += 1;
            if emitter.ticks_since_release >= cfg.burst_every_ticks {
                emitter.ticks_since_release = 0;
                let jitter = (rng.gen::<f32>() - 0.5) * bubbles.shake * 2.0;
                self.bursts.push(AmbientParticle {
                    position: Point::new(emitter.origin.x + jitter, emitter.origin.y),
                    radius: lerp(bubbles.min_radius, bubbles.max_radius, rng.gen()),
                    // Burst bubbles rise faster than the steady pool.
                    speed: 2.0 * lerp(bubbles.min_speed, bubbles.max_speed, rng.gen()),
                    phase: rng.gen::<f32>() * TAU,
                    amplitude: bubbles.shake,
                });
            }
        }

        for bubble in &mut self.bursts {
            bubble.position.y -= bubble.speed;
        }
        self.bursts.retain(|b| b.position.y >= -bubbles.recycle_margin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn particle(x: f32, y: f32) -> AmbientParticle {
        AmbientParticle {
            position: Point::new(x, y),
            radius: 2.0,
            speed: 0.3,
            phase: 0.0,
            amplitude: 2.0,
        }
    }

    #[test]
    fn test_bubble_rises() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut b = particle(10.0, 100.0);
        step_bubble(&mut b, SceneSize::new(300.0, 200.0), 20.0, &mut rng);
        assert!((b.position.y - 99.7).abs() < 1e-4);
        assert_eq!(b.position.x, 10.0);
    }

    #[test]
    fn test_bubble_recycles_below_bottom() {
        let mut rng = SmallRng::seed_from_u64(1);
        let size = SceneSize::new(300.0, 200.0);
        for _ in 0..50 {
            let mut b = particle(10.0, -20.01);
            step_bubble(&mut b, size, 20.0, &mut rng);
            assert_eq!(b.position.y, 220.0);
            assert!(b.position.x >= 0.0 && b.position.x < 300.0);
        }
    }

    #[test]
    fn test_bubble_at_margin_keeps_moving() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut b = particle(10.0, -20.0);
        step_bubble(&mut b, SceneSize::new(300.0, 200.0), 20.0, &mut rng);
        assert!(b.position.y < -20.0);
    }

    #[test]
    fn test_snow_recycles_to_top() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = particle(10.0, 220.5);
        step_snow(&mut s, SceneSize::new(300.0, 200.0), 20.0, &mut rng);
        assert_eq!(s.position.y, -20.0);
    }

    #[test]
    fn test_emitters_spawn_and_reap() {
        let config = AquariumConfig::default();
        let size = SceneSize::new(400.0, 200.0);
        let mut rng = SmallRng::seed_from_u64(6);
        let mut field = EmitterField::new(&config.emitters, &mut rng);
        let first_due = field.next_spawn_at();
        assert!((2.0..=6.0).contains(&first_due));

        let mut time = 0.0;
        let mut saw_emitter = false;
        let mut saw_bubble = false;
        for _ in 0..20_000 {
            time += config.scene.time_step;
            field.update(time, size, &config, &mut rng);
            assert!(field.active_count() <= config.emitters.max_active);
            for emitter in field.emitters() {
                assert_ne!(emitter.state(), EmitterState::Removed);
                assert!(emitter.origin.y >= 160.0);
                if emitter.state() == EmitterState::Active {
                    assert!(emitter.elapsed(time) <= emitter.duration);
                }
            }
            saw_emitter |= !field.emitters().is_empty();
            saw_bubble |= field.bubbles().next().is_some();
        }
        assert!(saw_emitter);
        assert!(saw_bubble);
    }

    #[test]
    fn test_spawn_postponed_at_cap() {
        let mut config = AquariumConfig::default();
        config.emitters.max_active = 0;
        let size = SceneSize::new(400.0, 200.0);
        let mut rng = SmallRng::seed_from_u64(6);
        let mut field = EmitterField::new(&config.emitters, &mut rng);
        let due = field.next_spawn_at();

        field.update(due + 1.0, size, &config, &mut rng);
        assert!(field.emitters().is_empty());
        assert_eq!(field.next_spawn_at(), due);

        config.emitters.max_active = 1;
        field.update(due + 1.1, size, &config, &mut rng);
        assert_eq!(field.emitters().len(), 1);
        assert!(field.next_spawn_at() > due + 1.1);
    }

    #[test]
    fn test_burst_release_cadence() {
        let config = AquariumConfig::default();
        let size = SceneSize::new(400.0, 200.0);
        let mut rng = SmallRng::seed_from_u64(6);
        let mut field = EmitterField::new(&config.emitters, &mut rng);
        let due = field.next_spawn_at();

        field.update(due, size, &config, &mut rng);
        assert_eq!(field.emitters().len(), 1);
        // Spawn tick counts as the first of six.
        for _ in 0..4 {
            field.update(due, size, &config, &mut rng);
        }
        assert_eq!(field.bubbles().count(), 0);
        field.update(due, size, &config, &mut rng);
        assert_eq!(field.bubbles().count(), 1);
    }

    #[test]
    fn test_burst_bubbles_outlive_their_emitter() {
        let mut config = AquariumConfig::default();
        config.emitters.min_gap = 100.0;
        config.emitters.max_gap = 100.0;
        config.emitters.min_duration = 1.0;
        config.emitters.max_duration = 1.0;
        let size = SceneSize::new(800.0, 1200.0);
        let mut rng = SmallRng::seed_from_u64(6);
        let mut field = EmitterField::new(&config.emitters, &mut rng);

        let mut time = field.next_spawn_at();
        while time < 101.0 {
            field.update(time, size, &config, &mut rng);
            time += config.scene.time_step;
        }
        let released = field.bubbles().count();
        assert!(released > 0);

        // One tick past the grace period reaps the emitter mid-rise.
        let reaped_at = 101.0 + config.emitters.grace_period + 0.5;
        field.update(reaped_at, size, &config, &mut rng);
        assert!(field.emitters().is_empty());
        assert_eq!(field.bubbles().count(), released);
        assert!(field.bubbles().all(|b| b.position.y > size.height / 2.0));

        for _ in 0..10_000 {
            field.update(reaped_at, size, &config, &mut rng);
        }
        assert!(field.emitters().is_empty());
        assert_eq!(field.bubbles().count(), 0);
    }
}
