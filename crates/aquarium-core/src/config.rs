//! Configuration System
//!
//! Loads tuning parameters from `aquarium.toml`. Every section is optional;
//! missing values fall back to the defaults below.

use aquarium_frame::Rgba;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::assets::AssetManifest;
use crate::components::Species;
use crate::error::ConfigError;

/// Default tuning file path
pub const DEFAULT_CONFIG_PATH: &str = "aquarium.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AquariumConfig {
    pub scene: SceneConfig,
    pub species: SpeciesRatios,
    pub swimmer: SwimmerConfig,
    pub drifter: DrifterConfig,
    pub crawler: CrawlerConfig,
    pub pulsator: PulsatorConfig,
    pub avoidance: AvoidanceConfig,
    pub environment: EnvironmentConfig,
    pub palette: PaletteConfig,
    pub bubbles: BubbleConfig,
    pub emitters: EmitterConfig,
    pub marine_snow: MarineSnowConfig,
    pub decor: DecorConfig,
    pub weeds: WeedConfig,
    pub sand: SandConfig,
    pub assets: AssetManifest,
}

impl AquariumConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from `path`, or use defaults if it is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load {:?}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.species.total() {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "species ratio table has no positive weight".into(),
                ))
            }
            None => {
                return Err(ConfigError::Invalid(
                    "species ratio weights overflow their total".into(),
                ))
            }
            Some(_) => {}
        }
        if self.scene.width == 0 || self.scene.height == 0 {
            return Err(ConfigError::Invalid("scene size must be non-zero".into()));
        }
        if !(self.scene.time_step > 0.0) {
            return Err(ConfigError::Invalid("scene.time_step must be positive".into()));
        }
        if !(self.avoidance.friction > 0.0 && self.avoidance.friction < 1.0) {
            return Err(ConfigError::Invalid(
                "avoidance.friction must be in (0, 1)".into(),
            ));
        }
        if !(self.pulsator.drag > 0.0 && self.pulsator.drag < 1.0) {
            return Err(ConfigError::Invalid("pulsator.drag must be in (0, 1)".into()));
        }
        if self.swimmer.min_speed > self.swimmer.max_speed
            || self.drifter.min_speed > self.drifter.max_speed
        {
            return Err(ConfigError::Invalid("min_speed exceeds max_speed".into()));
        }
        if !(self.environment.day_length > 0.0) {
            return Err(ConfigError::Invalid(
                "environment.day_length must be positive".into(),
            ));
        }
        if self.emitters.min_gap > self.emitters.max_gap
            || self.emitters.min_duration > self.emitters.max_duration
        {
            return Err(ConfigError::Invalid("emitter ranges are inverted".into()));
        }
        if self.emitters.burst_every_ticks == 0 {
            return Err(ConfigError::Invalid(
                "emitters.burst_every_ticks must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Host-supplied scene parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Number of creatures to spawn
    pub count: usize,
    /// Seed for every random draw of the run
    pub seed: u64,
    /// Simulated time added per tick
    pub time_step: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 200,
            count: 15,
            seed: 42,
            time_step: 0.008,
        }
    }
}

/// Weighted species ratio table used for spawning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesRatios {
    pub swimmer: u32,
    pub drifter: u32,
    pub crawler: u32,
    pub pulsator: u32,
}

impl Default for SpeciesRatios {
    fn default() -> Self {
        Self {
            swimmer: 6,
            drifter: 1,
            crawler: 3,
            pulsator: 1,
        }
    }
}

impl SpeciesRatios {
    /// Ratio table with every weight zero except `species`.
    pub fn only(species: Species) -> Self {
        let mut ratios = Self {
            swimmer: 0,
            drifter: 0,
            crawler: 0,
            pulsator: 0,
        };
        *ratios.weight_mut(species) = 1;
        ratios
    }

    pub fn weight(&self, species: Species) -> u32 {
        match species {
            Species::Swimmer => self.swimmer,
            Species::Drifter => self.drifter,
            Species::Crawler => self.crawler,
            Species::Pulsator => self.pulsator,
        }
    }

    fn weight_mut(&mut self, species: Species) -> &mut u32 {
        match species {
            Species::Swimmer => &mut self.swimmer,
            Species::Drifter => &mut self.drifter,
            Species::Crawler => &mut self.crawler,
            Species::Pulsator => &mut self.pulsator,
        }
    }

    /// Sum of all weights, `None` if it does not fit in a `u32`.
    pub fn total(&self) -> Option<u32> {
        Species::ALL
            .iter()
            .try_fold(0u32, |sum, s| sum.checked_add(self.weight(*s)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimmerConfig {
    pub min_speed: f32,
    pub max_speed: f32,
    /// Visual width as a fraction of scene height
    pub size_ratio: f32,
    /// Vertical wave amplitude as a fraction of scene height
    pub wave_amplitude: f32,
    /// Anchors are drawn uniformly from the top `anchor_band` of the height
    pub anchor_band: f32,
    /// Scale applied to the smoothed lateral avoidance before it moves x
    pub avoidance_damping: f32,
}

impl Default for SwimmerConfig {
    fn default() -> Self {
        Self {
            min_speed: 0.2,
            max_speed: 0.5,
            size_ratio: 0.25,
            wave_amplitude: 0.03,
            anchor_band: 0.6,
            avoidance_damping: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrifterConfig {
    /// Angular wander rate range
    pub min_speed: f32,
    pub max_speed: f32,
    pub size_ratio: f32,
    /// Drift radius is `radius_base * (1 + U[0,1))`
    pub radius_base: f32,
    pub anchor_top: f32,
    pub anchor_bottom: f32,
}

impl Default for DrifterConfig {
    fn default() -> Self {
        Self {
            min_speed: 0.05,
            max_speed: 0.15,
            size_ratio: 0.15,
            radius_base: 10.0,
            anchor_top: 0.2,
            anchor_bottom: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub speed: f32,
    /// Relative spread applied to `speed` at spawn
    pub speed_jitter: f32,
    pub size_ratio: f32,
    /// Wiggle amplitude in pixels
    pub wiggle: f32,
    pub wiggle_rate: f32,
    /// Anchors fall inside the top `bed_band` of the sand bed
    pub bed_band: f32,
    /// Whether crawlers wrap at the scene edges like swimmers
    pub wrap: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            speed: 0.1,
            speed_jitter: 0.2,
            size_ratio: 0.15,
            wiggle: 2.0,
            wiggle_rate: 20.0,
            bed_band: 0.3,
            wrap: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PulsatorConfig {
    pub pulse_rate: f32,
    /// Pulse above which the bell is closing hard enough to propel
    pub stroke_threshold: f32,
    /// Offset impulse during a stroke (negative is upward)
    pub stroke_impulse: f32,
    /// Offset drift outside a stroke
    pub buoyancy: f32,
    /// Water resistance multiplier applied to the offset each tick
    pub drag: f32,
    pub drift_rate: f32,
    pub drift_radius: f32,
    pub size_ratio: f32,
    /// Width scale is `1 - width_squeeze * pulse`
    pub width_squeeze: f32,
    /// Height scale is `1 + height_stretch * pulse`
    pub height_stretch: f32,
    pub base_alpha: f32,
    pub alpha_range: f32,
    /// Shadow blur at full night
    pub glow_blur: f32,
    pub anchor_top: f32,
    pub anchor_bottom: f32,
}

impl Default for PulsatorConfig {
    fn default() -> Self {
        Self {
            pulse_rate: 0.8,
            stroke_threshold: 0.85,
            stroke_impulse: -0.4,
            buoyancy: 0.05,
            drag: 0.97,
            drift_rate: 0.3,
            drift_radius: 20.0,
            size_ratio: 0.2,
            width_squeeze: 0.15,
            height_stretch: 0.25,
            base_alpha: 0.7,
            alpha_range: 0.2,
            glow_blur: 12.0,
            anchor_top: 0.15,
            anchor_bottom: 0.55,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoidanceConfig {
    /// Force per pixel of personal-space intrusion
    pub factor: f32,
    /// Personal-space threshold as a multiple of visual width
    pub personal_space: f32,
    /// Exponential smoothing factor for the offset accumulators
    pub friction: f32,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            factor: 0.03,
            personal_space: 1.1,
            friction: 0.96,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Fraction of the height covered by the sand bed
    pub sand_ratio: f32,
    /// Simulated time for one full day/night cycle
    pub day_length: f32,
    pub ray_count: usize,
    /// Ray opacity at noon
    pub ray_opacity: f32,
    pub ray_sway_rate: f32,
    pub ray_sway: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            sand_ratio: 0.2,
            day_length: 60.0,
            ray_count: 3,
            ray_opacity: 0.05,
            ray_sway_rate: 0.2,
            ray_sway: 0.02,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Ocean gradient at noon, stops at 0, 0.7 and 1
    pub ocean_day: [Rgba; 3],
    /// Ocean gradient at midnight
    pub ocean_night: [Rgba; 3],
    pub sand_top: Rgba,
    pub sand_bottom: Rgba,
    pub weed: Rgba,
    pub bubble: Rgba,
    pub snow: Rgba,
    pub glow: Rgba,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            ocean_day: [
                Rgba::from_rgba8(0x00, 0x5b, 0x8a, 1.0),
                Rgba::from_rgba8(0x00, 0x2a, 0x44, 1.0),
                Rgba::from_rgba8(0x00, 0x15, 0x24, 1.0),
            ],
            ocean_night: [
                Rgba::from_rgba8(0x06, 0x18, 0x2b, 1.0),
                Rgba::from_rgba8(0x02, 0x0c, 0x18, 1.0),
                Rgba::from_rgba8(0x00, 0x05, 0x0b, 1.0),
            ],
            sand_top: Rgba::from_rgba8(0xdc, 0xcc, 0xa3, 1.0),
            sand_bottom: Rgba::from_rgba8(0xa6, 0x98, 0x75, 1.0),
            weed: Rgba::from_rgba8(79, 119, 45, 0.85),
            bubble: Rgba::from_rgba8(255, 255, 255, 0.2),
            snow: Rgba::from_rgba8(230, 240, 255, 0.35),
            glow: Rgba::from_rgba8(150, 210, 255, 0.8),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    /// Floor on the steady bubble count
    pub min_count: usize,
    /// Steady bubbles per creature
    pub per_agent: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Horizontal shake amplitude in pixels
    pub shake: f32,
    /// Distance past an edge before a particle is recycled
    pub recycle_margin: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            min_count: 12,
            per_agent: 1.0,
            min_speed: 0.2,
            max_speed: 0.4,
            min_radius: 1.0,
            max_radius: 3.5,
            shake: 2.0,
            recycle_margin: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Simulated time between emitter spawns, drawn uniformly
    pub min_gap: f32,
    pub max_gap: f32,
    pub max_active: usize,
    pub min_duration: f32,
    pub max_duration: f32,
    /// While active, one bubble is released every this many ticks
    pub burst_every_ticks: u32,
    /// Time a finished emitter lingers before removal
    pub grace_period: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            min_gap: 2.0,
            max_gap: 6.0,
            max_active: 3,
            min_duration: 1.5,
            max_duration: 3.0,
            burst_every_ticks: 6,
            grace_period: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarineSnowConfig {
    pub min_count: usize,
    /// One mote per this many square pixels
    pub pixels_per_mote: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub max_sway: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for MarineSnowConfig {
    fn default() -> Self {
        Self {
            min_count: 30,
            pixels_per_mote: 8000.0,
            min_speed: 0.05,
            max_speed: 0.15,
            max_sway: 6.0,
            min_radius: 0.5,
            max_radius: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    pub count: usize,
    pub max_attempts: usize,
    /// Minimum horizontal gap as a fraction of scene width
    pub min_separation: f32,
    /// Base height as a fraction of scene height
    pub size_ratio: f32,
    pub foreground_depth: f32,
    /// Fraction of its height a fully-near piece sinks into the sand
    pub sink: f32,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self {
            count: 7,
            max_attempts: 10,
            min_separation: 0.08,
            size_ratio: 0.25,
            foreground_depth: 0.7,
            sink: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeedConfig {
    pub min_count: usize,
    /// One weed per this many pixels of width
    pub spacing: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub min_width: f32,
    pub max_width: f32,
    /// Tip displacement as a fraction of weed height
    pub sway: f32,
}

impl Default for WeedConfig {
    fn default() -> Self {
        Self {
            min_count: 6,
            spacing: 60.0,
            min_height: 0.3,
            max_height: 0.7,
            min_width: 0.02,
            max_width: 0.05,
            sway: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandConfig {
    pub min_blemishes: usize,
    /// One blemish per this many pixels of width
    pub spacing: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
}

impl Default for SandConfig {
    fn default() -> Self {
        Self {
            min_blemishes: 40,
            spacing: 8.0,
            min_opacity: 0.02,
            max_opacity: 0.08,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AquariumConfig::default();
        assert_eq!(config.scene.width, 1200);
        assert_eq!(config.scene.height, 200);
        assert_eq!(config.scene.count, 15);
        assert_eq!(config.species.total(), Some(11));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AquariumConfig::from_toml_str(
            r#"
            [scene]
            count = 40

            [species]
            pulsator = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.scene.count, 40);
        assert_eq!(config.scene.width, 1200);
        assert_eq!(config.species.pulsator, 0);
        assert_eq!(config.species.swimmer, 6);
        assert_eq!(config.avoidance.friction, 0.96);
    }

    #[test]
    fn test_palette_parses_hex() {
        let config = AquariumConfig::from_toml_str(
            r##"
            [palette]
            sand_top = "#ffffff"
            "##,
        )
        .unwrap();
        assert_eq!(config.palette.sand_top, Rgba::from_rgba8(255, 255, 255, 1.0));
    }

    #[test]
    fn test_rejects_zero_scene_size() {
        let mut config = AquariumConfig::default();
        config.scene.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_overflowing_ratio_total() {
        let mut config = AquariumConfig::default();
        config.species.swimmer = u32::MAX;
        assert_eq!(config.species.total(), None);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn test_rejects_empty_ratio_table() {
        let err = AquariumConfig::from_toml_str(
            r#"
            [species]
            swimmer = 0
            drifter = 0
            crawler = 0
            pulsator = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_friction() {
        let err = AquariumConfig::from_toml_str("[avoidance]\nfriction = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = AquariumConfig::from_toml_str("[scene\nwidth = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip_keeps_values() {
        let mut config = AquariumConfig::default();
        config.crawler.wrap = true;
        let text = config.to_toml().unwrap();
        let back = AquariumConfig::from_toml_str(&text).unwrap();
        assert!(back.crawler.wrap);
        assert_eq!(back.palette.ocean_day[0].to_hex(), "#005b8a");
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aquarium.toml");
        std::fs::write(&path, "[scene]\nheight = 480\n").unwrap();
        let config = AquariumConfig::from_file(&path).unwrap();
        assert_eq!(config.scene.height, 480);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AquariumConfig::load_or_default(dir.path().join("nope.toml"));
        assert_eq!(config.scene.count, 15);
    }

    #[test]
    fn test_species_only() {
        let ratios = SpeciesRatios::only(Species::Drifter);
        assert_eq!(ratios.total(), Some(1));
        assert_eq!(ratios.weight(Species::Drifter), 1);
    }
}
