//! Proximity Avoidance
//!
//! Separation-only repulsion between creatures. Every agent is compared with
//! every other agent (O(n²)); populations are a few dozen at most.

use aquarium_frame::Point;

use crate::components::Agent;
use crate::config::AquariumConfig;

/// Repulsion accumulated for one agent this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AvoidanceForce {
    pub x: f32,
    pub y: f32,
}

/// Side of `other` relative to `me`: -1 when `me` should move toward
/// negative coordinates. Coincident positions fall back to population order,
/// so two agents on the same spot still separate.
fn side(me: f32, other: f32, me_index: usize, other_index: usize) -> f32 {
    if me < other {
        -1.0
    } else if me > other {
        1.0
    } else if me_index < other_index {
        -1.0
    } else {
        1.0
    }
}

/// Force on `agents[index]` from every neighbor inside its personal space.
pub fn avoidance_force(
    agents: &[Agent],
    positions: &[Point],
    index: usize,
    config: &AquariumConfig,
    scene_height: f32,
) -> AvoidanceForce {
    let mut force = AvoidanceForce::default();
    let (Some(me), Some(&pos)) = (agents.get(index), positions.get(index)) else {
        return force;
    };

    let (width, _) = me.visual_size(config, scene_height);
    let threshold = width * config.avoidance.personal_space;
    let vertical = me.species().avoids_vertically();

    for (j, &other) in positions.iter().enumerate() {
        if j == index {
            continue;
        }
        let distance = pos.distance(other);
        if distance >= threshold {
            continue;
        }
        let push = (threshold - distance) * config.avoidance.factor;
        force.x += side(pos.x, other.x, index, j) * push;
        if vertical {
            force.y += side(pos.y, other.y, index, j) * push;
        }
    }
    force
}

/// Forces for the whole population, all computed from the same positions so
/// the result does not depend on update order.
pub fn avoidance_forces(agents: &[Agent], config: &AquariumConfig, scene_height: f32) -> Vec<AvoidanceForce> {
    let positions: Vec<Point> = agents.iter().map(|a| a.position).collect();
    (0..agents.len())
        .map(|i| avoidance_force(agents, &positions, i, config, scene_height))
        .collect()
}

/// Exponential smoothing of the offset accumulators:
/// `offset = offset * friction + force`.
pub fn smooth_offsets(agent: &mut Agent, force: AvoidanceForce, friction: f32) {
    agent.lateral_offset = agent.lateral_offset * friction + force.x;
    if agent.species().avoids_vertically() {
        agent.vertical_offset = agent.vertical_offset * friction + force.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteImage;
    use crate::components::{Facing, Species};
    use aquarium_frame::ImageId;

    fn agent(species: Species, x: f32, y: f32) -> Agent {
        let image = SpriteImage {
            id: ImageId(0),
            name: "a.png".into(),
            width: 100,
            height: 100,
        };
        Agent::new(species, Facing::Right, &image, Point::new(x, y))
    }

    #[test]
    fn test_coincident_agents_get_opposite_forces() {
        let config = AquariumConfig::default();
        let agents = vec![agent(Species::Swimmer, 50.0, 50.0), agent(Species::Swimmer, 50.0, 50.0)];
        let forces = avoidance_forces(&agents, &config, 200.0);

        // threshold = 50 * 1.1 = 55, push = 55 * 0.03
        let push = 55.0 * 0.03;
        assert!((forces[0].x + push).abs() < 1e-4);
        assert!((forces[1].x - push).abs() < 1e-4);
        assert!(forces[0].y < 0.0 && forces[1].y > 0.0);
    }

    #[test]
    fn test_force_points_away_from_neighbor() {
        let config = AquariumConfig::default();
        let agents = vec![agent(Species::Swimmer, 40.0, 50.0), agent(Species::Swimmer, 60.0, 50.0)];
        let forces = avoidance_forces(&agents, &config, 200.0);
        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
        // Same height: the tie-break still pushes them apart vertically.
        assert!(forces[0].y < 0.0 && forces[1].y > 0.0);
        let push = (55.0 - 20.0) * 0.03;
        assert!((forces[1].x - push).abs() < 1e-4);
    }

    #[test]
    fn test_no_force_outside_personal_space() {
        let config = AquariumConfig::default();
        let agents = vec![agent(Species::Swimmer, 0.0, 0.0), agent(Species::Swimmer, 500.0, 0.0)];
        let forces = avoidance_forces(&agents, &config, 200.0);
        assert_eq!(forces[0], AvoidanceForce::default());
        assert_eq!(forces[1], AvoidanceForce::default());
    }

    #[test]
    fn test_crawlers_have_no_vertical_force() {
        let config = AquariumConfig::default();
        let agents = vec![agent(Species::Crawler, 10.0, 10.0), agent(Species::Crawler, 12.0, 14.0)];
        let forces = avoidance_forces(&agents, &config, 200.0);
        assert_eq!(forces[0].y, 0.0);
        assert!(forces[0].x < 0.0);
    }

    #[test]
    fn test_smoothing_decays_offset() {
        let mut a = agent(Species::Drifter, 0.0, 0.0);
        a.lateral_offset = 10.0;
        a.vertical_offset = 10.0;
        smooth_offsets(&mut a, AvoidanceForce::default(), 0.96);
        assert!((a.lateral_offset - 9.6).abs() < 1e-5);
        assert!((a.vertical_offset - 9.6).abs() < 1e-5);

        let mut c = agent(Species::Crawler, 0.0, 0.0);
        smooth_offsets(&mut c, AvoidanceForce { x: 1.0, y: 1.0 }, 0.96);
        assert_eq!(c.lateral_offset, 1.0);
        assert_eq!(c.vertical_offset, 0.0);
    }
}
