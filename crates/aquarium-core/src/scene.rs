//! Scene Compositor
//!
//! One `AquariumScene` owns every piece of per-run state. Each call to
//! [`AquariumScene::render_frame`] is one tick: advance time by the fixed
//! step, then update and draw the layers in a fixed order.

use aquarium_frame::Layer;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::assets::ImageCatalog;
use crate::components::{
    Agent, AmbientParticle, Decor, DecorLayer, SandBlemish, SceneSize, Species, Weed,
};
use crate::config::AquariumConfig;
use crate::output::SceneStats;
use crate::render;
use crate::setup;
use crate::surface::DrawSurface;
use crate::systems::{self, day_night_cycle, EmitterField, MotionContext};

/// The simulation world for one run.
pub struct AquariumScene {
    config: AquariumConfig,
    catalog: ImageCatalog,
    size: SceneSize,
    rng: SmallRng,
    time: f32,
    tick: u64,
    agents: Vec<Agent>,
    bubbles: Vec<AmbientParticle>,
    snow: Vec<AmbientParticle>,
    emitters: EmitterField,
    decor: Vec<Decor>,
    weeds: Vec<Weed>,
    blemishes: Vec<SandBlemish>,
}

impl AquariumScene {
    /// Builds a complete scene from loaded images. The population is final
    /// from tick zero.
    pub fn new(config: AquariumConfig, catalog: ImageCatalog) -> Self {
        let size = SceneSize::new(config.scene.width as f32, config.scene.height as f32);
        let mut rng = SmallRng::seed_from_u64(config.scene.seed);

        let blemishes = setup::spawn_sand_blemishes(&config, size, &mut rng);
        let decor = setup::place_decor(&config, &catalog, size, &mut rng);
        let weeds = setup::spawn_weeds(&config, size, &mut rng);
        let agents = setup::spawn_population(config.scene.count, &config, &catalog, size, &mut rng);
        let bubbles = setup::spawn_bubbles(&config, agents.len(), size, &mut rng);
        let snow = setup::spawn_snow(&config, size, &mut rng);
        let emitters = EmitterField::new(&config.emitters, &mut rng);

        tracing::info!(
            "Scene {}x{} ready: {} agents, {} decor, {} weeds, {} bubbles, {} motes",
            config.scene.width,
            config.scene.height,
            agents.len(),
            decor.len(),
            weeds.len(),
            bubbles.len(),
            snow.len()
        );

        Self {
            config,
            catalog,
            size,
            rng,
            time: 0.0,
            tick: 0,
            agents,
            bubbles,
            snow,
            emitters,
            decor,
            weeds,
            blemishes,
        }
    }

    /// Runs one tick and draws it onto `surface`.
    pub fn render_frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) {
        self.time += self.config.scene.time_step;
        self.tick += 1;
        let cycle = self.cycle();

        for layer in Layer::ORDER {
            surface.begin_layer(layer);
            match layer {
                Layer::Ocean => render::draw_ocean(surface, self.size, cycle, &self.config.palette),
                Layer::LightRays => render::draw_light_rays(
                    surface,
                    self.size,
                    self.time,
                    cycle,
                    &self.config.environment,
                ),
                Layer::Sand => render::draw_sand(
                    surface,
                    self.size,
                    self.config.environment.sand_ratio,
                    &self.config.palette,
                    &self.blemishes,
                ),
                Layer::BackgroundDecor => {
                    render::draw_decor(surface, &self.decor, DecorLayer::Background)
                }
                Layer::MarineSnow => {
                    self.update_snow();
                    render::draw_snow(surface, &self.snow, self.time, self.config.palette.snow);
                }
                Layer::Bubbles => {
                    self.update_bubbles();
                    render::draw_bubbles(
                        surface,
                        self.bubbles.iter().chain(self.emitters.bubbles()),
                        self.time,
                        self.config.palette.bubble,
                    );
                }
                Layer::Agents => {
                    self.update_agents();
                    for agent in &self.agents {
                        render::draw_agent(surface, agent, &self.config, self.size.height, cycle);
                    }
                }
                Layer::ForegroundDecor => {
                    render::draw_decor(surface, &self.decor, DecorLayer::Foreground)
                }
                Layer::Vegetation => render::draw_weeds(
                    surface,
                    self.size,
                    self.time,
                    &self.weeds,
                    &self.config.weeds,
                    self.config.palette.weed,
                ),
            }
        }
    }

    fn update_snow(&mut self) {
        let margin = self.config.bubbles.recycle_margin;
        for mote in &mut self.snow {
            systems::step_snow(mote, self.size, margin, &mut self.rng);
        }
    }

    fn update_bubbles(&mut self) {
        let margin = self.config.bubbles.recycle_margin;
        for bubble in &mut self.bubbles {
            systems::step_bubble(bubble, self.size, margin, &mut self.rng);
        }
        self.emitters.update(self.time, self.size, &self.config, &mut self.rng);
    }

    /// Avoidance from a snapshot of this tick's starting positions, then each
    /// agent's motion law.
    fn update_agents(&mut self) {
        let forces = systems::avoidance_forces(&self.agents, &self.config, self.size.height);
        let ctx = MotionContext {
            time: self.time,
            size: self.size,
            config: &self.config,
        };
        let mut skipped = 0;
        for (agent, force) in self.agents.iter_mut().zip(forces) {
            if !systems::update_agent(agent, force, &ctx) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            tracing::debug!("Tick {}: skipped {} agents", self.tick, skipped);
        }
    }

    /// Night amount at the current time.
    pub fn cycle(&self) -> f32 {
        day_night_cycle(self.time, self.config.environment.day_length)
    }

    pub fn config(&self) -> &AquariumConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    pub fn size(&self) -> SceneSize {
        self.size
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn bubbles(&self) -> &[AmbientParticle] {
        &self.bubbles
    }

    pub fn marine_snow(&self) -> &[AmbientParticle] {
        &self.snow
    }

    pub fn emitters(&self) -> &EmitterField {
        &self.emitters
    }

    pub fn decor(&self) -> &[Decor] {
        &self.decor
    }

    pub fn weeds(&self) -> &[Weed] {
        &self.weeds
    }

    pub fn sand_blemishes(&self) -> &[SandBlemish] {
        &self.blemishes
    }

    pub fn stats(&self) -> SceneStats {
        let mut stats = SceneStats {
            tick: self.tick,
            time: self.time,
            agents: self.agents.len(),
            bubbles: self.bubbles.len(),
            burst_bubbles: self.emitters.bubbles().count(),
            emitters: self.emitters.emitters().len(),
            active_emitters: self.emitters.active_count(),
            marine_snow: self.snow.len(),
            decor: self.decor.len(),
            night: self.cycle(),
            ..Default::default()
        };
        for species in Species::ALL {
            let n = self.agents.iter().filter(|a| a.species() == species).count();
            if n > 0 {
                stats.species.insert(species, n);
            }
        }
        stats
    }
}
