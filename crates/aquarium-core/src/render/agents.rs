//! Creature sprites.

use aquarium_frame::{Rect, Shadow};

use crate::components::{Agent, Facing, Species};
use crate::config::AquariumConfig;
use crate::surface::DrawSurface;
use crate::systems::{pulse_alpha, pulse_scale};

/// Glow is off below this night amount.
const MIN_GLOW: f32 = 0.05;

/// Draws one agent centered on its position. Side-view species are mirrored
/// when facing left; frontal species ignore facing. Pulsators are stretched
/// and faded by their pulse and glow at night.
pub fn draw_agent<S: DrawSurface + ?Sized>(
    surface: &mut S,
    agent: &Agent,
    config: &AquariumConfig,
    scene_height: f32,
    cycle: f32,
) {
    if !agent.position.is_finite() {
        return;
    }
    let (width, height) = agent.visual_size(config, scene_height);
    let dest = Rect::centered(width, height);

    surface.save();
    surface.translate(agent.position.x, agent.position.y);
    match agent.species() {
        Species::Swimmer | Species::Crawler => {
            if agent.facing() == Facing::Left {
                surface.scale(-1.0, 1.0);
            }
        }
        Species::Drifter => {}
        Species::Pulsator => {
            let cfg = &config.pulsator;
            let (sx, sy) = pulse_scale(agent.pulse, cfg);
            surface.scale(sx, sy);
            surface.set_global_alpha(pulse_alpha(agent.pulse, cfg));
            if cycle > MIN_GLOW {
                surface.set_shadow(Some(Shadow::new(cfg.glow_blur * cycle, config.palette.glow)));
            }
        }
    }
    surface.draw_image(agent.image(), dest);
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteImage;
    use crate::output::RecordingSurface;
    use aquarium_frame::{DrawCommand, ImageId, Point};

    fn agent(species: Species, facing: Facing) -> Agent {
        let image = SpriteImage {
            id: ImageId(2),
            name: "fish.png".into(),
            width: 160,
            height: 100,
        };
        Agent::new(species, facing, &image, Point::new(40.0, 60.0))
    }

    #[test]
    fn test_left_facing_swimmer_is_mirrored() {
        let config = AquariumConfig::default();
        let mut surface = RecordingSurface::new();
        draw_agent(&mut surface, &agent(Species::Swimmer, Facing::Left), &config, 200.0, 0.0);
        assert!(surface.commands().contains(&DrawCommand::Scale { x: -1.0, y: 1.0 }));
        assert!(surface.commands().contains(&DrawCommand::DrawImage {
            image: ImageId(2),
            dest: Rect::centered(50.0, 31.25),
        }));
    }

    #[test]
    fn test_frontal_species_ignore_facing() {
        let config = AquariumConfig::default();
        let mut surface = RecordingSurface::new();
        draw_agent(&mut surface, &agent(Species::Drifter, Facing::Left), &config, 200.0, 0.0);
        assert!(!surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Scale { .. })));
    }

    #[test]
    fn test_pulsator_glows_only_at_night() {
        let config = AquariumConfig::default();
        let jelly = agent(Species::Pulsator, Facing::Right);

        let mut day = RecordingSurface::new();
        draw_agent(&mut day, &jelly, &config, 200.0, 0.0);
        assert!(!day.commands().iter().any(|c| matches!(c, DrawCommand::Shadow { .. })));

        let mut night = RecordingSurface::new();
        draw_agent(&mut night, &jelly, &config, 200.0, 1.0);
        assert!(night.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Shadow { shadow: Some(s) } if s.blur == 12.0
        )));
    }

    #[test]
    fn test_draw_is_balanced() {
        let config = AquariumConfig::default();
        let mut surface = RecordingSurface::new();
        draw_agent(&mut surface, &agent(Species::Pulsator, Facing::Left), &config, 200.0, 0.5);
        let saves = surface.commands().iter().filter(|c| **c == DrawCommand::Save).count();
        let restores = surface.commands().iter().filter(|c| **c == DrawCommand::Restore).count();
        assert_eq!(saves, 1);
        assert_eq!(restores, 1);
    }
}
