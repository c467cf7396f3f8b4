//! Behavioral properties of a running scene.

use aquarium_core::components::{Facing, Species};
use aquarium_core::config::SpeciesRatios;
use aquarium_core::systems::{
    avoidance_forces, day_night_cycle, pulse_scale, ray_opacity, update_agent, MotionContext,
};
use aquarium_core::{
    Agent, AnimationLoop, AquariumConfig, AquariumScene, ImageCatalog, ManualHost,
    RecordingSurface, SceneSize, SpriteImage,
};
use aquarium_frame::{DrawCommand, ImageId, Layer, Point};

fn scene(config: AquariumConfig) -> AquariumScene {
    let catalog = ImageCatalog::placeholder(&config.assets);
    AquariumScene::new(config, catalog)
}

fn run(scene: &mut AquariumScene, ticks: usize) -> RecordingSurface {
    let mut surface = RecordingSurface::new();
    for _ in 0..ticks {
        surface.clear();
        scene.render_frame(&mut surface);
    }
    surface
}

#[test]
fn test_facing_never_changes() {
    let mut config = AquariumConfig::default();
    config.scene.count = 30;
    let mut scene = scene(config);
    let before: Vec<Facing> = scene.agents().iter().map(|a| a.facing()).collect();
    run(&mut scene, 2000);
    let after: Vec<Facing> = scene.agents().iter().map(|a| a.facing()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_swimmers_wrap_instead_of_clamping() {
    let margin = 0.25 * 200.0;
    for seed in 0..6 {
        let mut config = AquariumConfig::default();
        config.scene.count = 1;
        config.scene.seed = seed;
        config.scene.width = 300;
        config.species = SpeciesRatios::only(Species::Swimmer);
        // A fast swimmer crosses the narrow scene many times.
        config.swimmer.min_speed = 3.0;
        config.swimmer.max_speed = 3.0;
        let mut scene = scene(config);

        let mut previous = scene.agents()[0].position.x;
        let mut wraps = 0;
        let mut surface = RecordingSurface::new();
        for _ in 0..2000 {
            surface.clear();
            scene.render_frame(&mut surface);
            let agent = &scene.agents()[0];
            let x = agent.position.x;
            assert!(x >= -margin - 1e-3 && x <= 300.0 + margin + 1e-3);
            if (x - previous).abs() > 100.0 {
                wraps += 1;
                let expected = match agent.facing() {
                    Facing::Right => -margin,
                    Facing::Left => 300.0 + margin,
                };
                assert!((x - expected).abs() < 1e-3);
            }
            previous = x;
        }
        assert!(wraps > 0);
    }
}

#[test]
fn test_drifters_stay_near_anchor() {
    let mut config = AquariumConfig::default();
    config.scene.count = 12;
    config.species = SpeciesRatios::only(Species::Drifter);
    let mut scene = scene(config);
    let mut surface = RecordingSurface::new();
    for _ in 0..3000 {
        surface.clear();
        scene.render_frame(&mut surface);
        for agent in scene.agents() {
            let dx = agent.position.x - agent.lateral_offset - agent.anchor.x;
            let dy = agent.position.y - agent.vertical_offset - agent.anchor.y;
            assert!(dx.abs() <= agent.drift_radius + 1e-3);
            assert!(dy.abs() <= agent.drift_radius * 0.4 + 1e-3);
        }
    }
}

#[test]
fn test_pulse_and_scale_bounds() {
    let mut config = AquariumConfig::default();
    config.scene.count = 6;
    config.species = SpeciesRatios::only(Species::Pulsator);
    let pulsator = config.pulsator.clone();
    let mut scene = scene(config);
    let mut surface = RecordingSurface::new();
    for _ in 0..2000 {
        surface.clear();
        scene.render_frame(&mut surface);
        for agent in scene.agents() {
            assert!((0.0..=1.0).contains(&agent.pulse));
            let (sx, sy) = pulse_scale(agent.pulse, &pulsator);
            assert!(sx >= 0.85 - 1e-5 && sx <= 1.0);
            assert!(sy >= 1.0 && sy <= 1.25 + 1e-5);
        }
    }
}

#[test]
fn test_ambient_particles_recycle() {
    let mut config = AquariumConfig::default();
    config.scene.count = 0;
    config.bubbles.min_speed = 5.0;
    config.bubbles.max_speed = 5.0;
    let mut scene = scene(config);
    let mut surface = RecordingSurface::new();
    let height = 200.0;

    let mut previous: Vec<f32> = scene.bubbles().iter().map(|b| b.position.y).collect();
    let mut recycled = 0;
    for _ in 0..500 {
        surface.clear();
        scene.render_frame(&mut surface);
        for (bubble, prev) in scene.bubbles().iter().zip(previous.iter_mut()) {
            if *prev < -20.0 {
                assert_eq!(bubble.position.y, height + 20.0);
                assert!(bubble.position.x >= 0.0 && bubble.position.x < 1200.0);
                recycled += 1;
            }
            *prev = bubble.position.y;
        }
    }
    assert!(recycled > 0);
}

#[test]
fn test_empty_population_still_draws_ambient_layers() {
    let mut config = AquariumConfig::default();
    config.scene.count = 0;
    let mut scene = scene(config);
    let mut surface = run(&mut scene, 50);
    assert!(scene.agents().is_empty());

    let frame = surface.take_frame(scene.tick(), scene.time());
    assert!(frame.layer_commands(Layer::Agents).is_empty());
    assert!(!frame.layer_commands(Layer::Bubbles).is_empty());
    assert!(!frame.layer_commands(Layer::MarineSnow).is_empty());
    assert!(!frame.layer_commands(Layer::Vegetation).is_empty());
}

#[test]
fn test_single_species_table_always_spawns_it() {
    for seed in 0..25 {
        let mut config = AquariumConfig::default();
        config.scene.count = 1;
        config.scene.seed = seed;
        config.species = SpeciesRatios::only(Species::Drifter);
        let scene = scene(config);
        assert_eq!(scene.agents().len(), 1);
        assert_eq!(scene.agents()[0].species(), Species::Drifter);
    }
}

#[test]
fn test_coincident_agents_separate() {
    let config = AquariumConfig::default();
    let image = SpriteImage {
        id: ImageId(0),
        name: "fish1.png".into(),
        width: 160,
        height: 100,
    };
    let anchor = Point::new(300.0, 80.0);
    let mut agents = vec![
        Agent::new(Species::Drifter, Facing::Right, &image, anchor),
        Agent::new(Species::Drifter, Facing::Right, &image, anchor),
    ];
    let ctx = MotionContext {
        time: 0.0,
        size: SceneSize::new(1200.0, 200.0),
        config: &config,
    };

    let forces = avoidance_forces(&agents, &config, 200.0);
    for (agent, force) in agents.iter_mut().zip(forces) {
        assert!(update_agent(agent, force, &ctx));
    }
    let (a, b) = (agents[0].lateral_offset, agents[1].lateral_offset);
    assert!(a != 0.0 && b != 0.0);
    assert!(a.signum() != b.signum());
}

#[test]
fn test_rays_invisible_at_full_night() {
    assert_eq!(ray_opacity(0.05, 1.0), 0.0);

    let mut config = AquariumConfig::default();
    config.scene.count = 3;
    config.environment.day_length = 2.0 * config.scene.time_step * 100.0;
    let mut scene = scene(config);
    // Midnight lands exactly on tick 100.
    let mut surface = run(&mut scene, 100);
    assert!((day_night_cycle(scene.time(), scene.config().environment.day_length) - 1.0).abs() < 1e-3);
    let frame = surface.take_frame(scene.tick(), scene.time());
    assert!(frame.layer_commands(Layer::LightRays).is_empty());
}

#[test]
fn test_layers_draw_in_fixed_order() {
    let mut config = AquariumConfig::default();
    config.scene.count = 8;
    let mut scene = scene(config);
    let mut surface = run(&mut scene, 3);
    let frame = surface.take_frame(scene.tick(), scene.time());
    assert_eq!(frame.layers(), Layer::ORDER.to_vec());

    // Weeds are painted over every agent.
    let last_image = frame
        .commands
        .iter()
        .rposition(|c| matches!(c, DrawCommand::DrawImage { .. }))
        .unwrap();
    let vegetation = frame
        .commands
        .iter()
        .position(|c| *c == DrawCommand::BeginLayer { layer: Layer::Vegetation })
        .unwrap();
    assert!(last_image < vegetation);
}

#[test]
fn test_emitters_respect_lifecycle_over_a_run() {
    let mut config = AquariumConfig::default();
    config.scene.count = 0;
    let grace = config.emitters.grace_period;
    let mut scene = scene(config);
    let mut surface = RecordingSurface::new();
    let mut seen = 0;
    for _ in 0..10_000 {
        surface.clear();
        scene.render_frame(&mut surface);
        let time = scene.time();
        for emitter in scene.emitters().emitters() {
            let elapsed = emitter.elapsed(time);
            assert!(elapsed <= emitter.duration + grace);
            assert_eq!(emitter.is_finished(), elapsed > emitter.duration);
            seen += 1;
        }
    }
    assert!(seen > 0);
}

#[test]
fn test_stop_cancels_and_is_idempotent() {
    let mut host = ManualHost::new();
    let mut animation = AnimationLoop::new(scene(AquariumConfig::default()));
    let mut surface = RecordingSurface::new();
    animation.start(&mut host);
    host.run(&mut animation, &mut surface, 10);

    animation.stop(&mut host);
    animation.stop(&mut host);
    assert!(host.queued().is_empty());
    assert_eq!(host.cancelled().len(), 1);
    assert_eq!(host.run(&mut animation, &mut surface, 10), 0);
}
