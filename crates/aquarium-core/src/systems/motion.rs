//! Motion Model
//!
//! One motion law per species, selected by an exhaustive match. Positions are
//! recomputed from the anchor each tick, except the horizontal position of
//! swimmers and crawlers, which advances and (for swimmers) wraps.

use aquarium_frame::Point;

use crate::components::{Agent, SceneSize, Species};
use crate::config::{AquariumConfig, PulsatorConfig};

use super::avoidance::{smooth_offsets, AvoidanceForce};

/// Inputs shared by every agent update in a tick.
#[derive(Debug, Clone, Copy)]
pub struct MotionContext<'a> {
    pub time: f32,
    pub size: SceneSize,
    pub config: &'a AquariumConfig,
}

/// Applies `force` and the species' motion law to `agent`.
///
/// Returns `false` and leaves the agent untouched when the result is not
/// finite; the caller skips that agent for the tick.
pub fn update_agent(agent: &mut Agent, force: AvoidanceForce, ctx: &MotionContext) -> bool {
    let mut next = agent.clone();
    match next.species() {
        Species::Swimmer => update_swimmer(&mut next, force, ctx),
        Species::Drifter => update_drifter(&mut next, force, ctx),
        Species::Crawler => update_crawler(&mut next, force, ctx),
        Species::Pulsator => update_pulsator(&mut next, force, ctx),
    }

    if !next.position.is_finite() || !next.lateral_offset.is_finite() || !next.vertical_offset.is_finite() {
        tracing::trace!("Skipping {} with non-finite motion", next.species());
        return false;
    }
    *agent = next;
    true
}

/// Horizontal advance shared by swimmers and crawlers.
///
/// Computes `x + (speed + lateral * damping * dir) * dir`, which nets to
/// `speed * dir + lateral * damping`. The plain `(speed + lateral * damping)
/// * dir` form would flip the push for left-facing agents, so the lateral
/// offset is treated as a world-space push and always moves the agent the
/// way its neighbour shoved it.
fn advance_x(agent: &Agent, damping: f32) -> f32 {
    let dir = agent.facing().sign();
    agent.position.x + (agent.speed + agent.lateral_offset * damping * dir) * dir
}

fn update_swimmer(agent: &mut Agent, force: AvoidanceForce, ctx: &MotionContext) {
    let cfg = &ctx.config.swimmer;
    smooth_offsets(agent, force, ctx.config.avoidance.friction);

    let x = advance_x(agent, cfg.avoidance_damping);
    let amplitude = cfg.wave_amplitude * ctx.size.height;
    let y = agent.anchor.y + (ctx.time + agent.phase).sin() * amplitude + agent.vertical_offset;

    let (width, _) = agent.visual_size(ctx.config, ctx.size.height);
    let x = wrap_horizontal(x, ctx.size.width, width).unwrap_or(x);
    agent.position = Point::new(x, y);
}

fn update_drifter(agent: &mut Agent, force: AvoidanceForce, ctx: &MotionContext) {
    smooth_offsets(agent, force, ctx.config.avoidance.friction);

    let t = ctx.time * agent.speed;
    let r = agent.drift_radius;
    agent.position = Point::new(
        agent.anchor.x + (t + agent.phase_x).sin() * r + agent.lateral_offset,
        agent.anchor.y + (t + agent.phase).cos() * r * 0.4 + agent.vertical_offset,
    );
}

fn update_crawler(agent: &mut Agent, force: AvoidanceForce, ctx: &MotionContext) {
    let cfg = &ctx.config.crawler;
    smooth_offsets(agent, force, ctx.config.avoidance.friction);

    let x = advance_x(agent, ctx.config.swimmer.avoidance_damping);
    let y = agent.anchor.y + (ctx.time * cfg.wiggle_rate + agent.phase).sin() * cfg.wiggle;

    let x = if cfg.wrap {
        let (width, _) = agent.visual_size(ctx.config, ctx.size.height);
        wrap_horizontal(x, ctx.size.width, width).unwrap_or(x)
    } else {
        x
    };
    agent.position = Point::new(x, y);
}

fn update_pulsator(agent: &mut Agent, force: AvoidanceForce, ctx: &MotionContext) {
    let cfg = &ctx.config.pulsator;
    agent.lateral_offset = agent.lateral_offset * ctx.config.avoidance.friction + force.x;

    let pulse = (ctx.time * agent.speed + agent.phase).sin().powi(2);
    agent.pulse = pulse;

    let impulse = if pulse > cfg.stroke_threshold {
        cfg.stroke_impulse
    } else {
        cfg.buoyancy
    };
    agent.vertical_offset = (agent.vertical_offset + impulse + force.y) * cfg.drag;

    agent.position = Point::new(
        agent.anchor.x
            + (ctx.time * cfg.drift_rate + agent.phase_x).sin() * agent.drift_radius
            + agent.lateral_offset,
        agent.anchor.y + agent.vertical_offset,
    );
}

/// Teleports `x` to the opposite side once it passes `margin` beyond an
/// edge. Returns `None` when no wrap is needed.
pub fn wrap_horizontal(x: f32, width: f32, margin: f32) -> Option<f32> {
    if x > width + margin {
        Some(-margin)
    } else if x < -margin {
        Some(width + margin)
    } else {
        None
    }
}

/// Width and height scale for a pulse value: narrow and tall while the bell
/// closes, wide and flat while it opens.
pub fn pulse_scale(pulse: f32, cfg: &PulsatorConfig) -> (f32, f32) {
    let pulse = pulse.clamp(0.0, 1.0);
    (1.0 - pulse * cfg.width_squeeze, 1.0 + pulse * cfg.height_stretch)
}

/// Opacity for a pulse value; the open bell is the most opaque.
pub fn pulse_alpha(pulse: f32, cfg: &PulsatorConfig) -> f32 {
    cfg.base_alpha + (1.0 - pulse.clamp(0.0, 1.0)) * cfg.alpha_range
}
