//! Ambient particles (bubbles, marine snow) and bubble emitters.

use aquarium_frame::Point;
use serde::{Deserialize, Serialize};

/// A non-interacting particle that is recycled at the far edge instead of
/// being destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientParticle {
    pub position: Point,
    pub radius: f32,
    /// Pixels per tick along the particle's travel direction.
    pub speed: f32,
    /// Sway phase offset.
    pub phase: f32,
    /// Sway amplitude in pixels; zero means the layer default applies.
    pub amplitude: f32,
}

/// Lifecycle of a bubble emitter. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterState {
    Active,
    Finished,
    Removed,
}

/// A time-bounded source of burst bubbles at a point on the sand.
#[derive(Debug, Clone)]
pub struct BubbleEmitter {
    pub origin: Point,
    pub start_time: f32,
    pub duration: f32,
    state: EmitterState,
    /// Ticks since the last release.
    pub ticks_since_release: u32,
}

impl BubbleEmitter {
    pub fn new(origin: Point, start_time: f32, duration: f32) -> Self {
        Self {
            origin,
            start_time,
            duration,
            state: EmitterState::Active,
            ticks_since_release: 0,
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state != EmitterState::Active
    }

    pub fn elapsed(&self, time: f32) -> f32 {
        time - self.start_time
    }

    /// Re-evaluates the lifecycle at `time`. Returns the new state when it
    /// changed.
    pub fn advance(&mut self, time: f32, grace_period: f32) -> Option<EmitterState> {
        let elapsed = self.elapsed(time);
        let target = if elapsed > self.duration + grace_period {
            EmitterState::Removed
        } else if elapsed > self.duration {
            EmitterState::Finished
        } else {
            EmitterState::Active
        };

        if target > self.state {
            self.state = target;
            Some(target)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitter_lifecycle_boundaries() {
        let mut emitter = BubbleEmitter::new(Point::new(5.0, 180.0), 10.0, 2.0);
        assert_eq!(emitter.advance(12.0, 8.0), None);
        assert_eq!(emitter.state(), EmitterState::Active);

        assert_eq!(emitter.advance(12.01, 8.0), Some(EmitterState::Finished));
        assert!(emitter.is_finished());

        assert_eq!(emitter.advance(20.0, 8.0), None);
        assert_eq!(emitter.advance(20.01, 8.0), Some(EmitterState::Removed));
    }

    #[test]
    fn test_emitter_never_moves_backward() {
        let mut emitter = BubbleEmitter::new(Point::default(), 0.0, 1.0);
        emitter.advance(100.0, 1.0);
        assert_eq!(emitter.state(), EmitterState::Removed);
        assert_eq!(emitter.advance(0.5, 1.0), None);
        assert_eq!(emitter.state(), EmitterState::Removed);
    }

    #[test]
    fn test_emitter_can_skip_straight_to_removed() {
        let mut emitter = BubbleEmitter::new(Point::default(), 0.0, 1.0);
        assert_eq!(emitter.advance(5.0, 1.0), Some(EmitterState::Removed));
    }
}
