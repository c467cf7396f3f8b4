//! Per-tick simulation systems.
//!
//! System execution order within a tick (driven by `AquariumScene`):
//! 1. Day/night cycle (read-only, feeds the environment layers)
//! 2. Marine snow and bubble updates
//! 3. Emitter lifecycle
//! 4. Proximity avoidance, then motion, per agent

pub mod ambient;
pub mod avoidance;
pub mod day_night;
pub mod motion;

pub use ambient::{step_bubble, step_snow, EmitterField};
pub use avoidance::{avoidance_force, avoidance_forces, AvoidanceForce};
pub use day_night::{day_night_cycle, ocean_stops, ray_opacity};
pub use motion::{pulse_alpha, pulse_scale, update_agent, wrap_horizontal, MotionContext};
