//! Day/night cycle shared by the ocean gradient, light rays and glow.

use aquarium_frame::Rgba;
use std::f32::consts::TAU;

use crate::config::PaletteConfig;

/// Night amount in `0..=1`: 0 at noon (time 0), 1 at midnight.
pub fn day_night_cycle(time: f32, day_length: f32) -> f32 {
    if !(day_length > 0.0) {
        return 0.0;
    }
    (0.5 - 0.5 * (TAU * time / day_length).cos()).clamp(0.0, 1.0)
}

/// Ocean gradient stops blended between the day and night palettes.
pub fn ocean_stops(cycle: f32, palette: &PaletteConfig) -> [Rgba; 3] {
    let t = cycle.clamp(0.0, 1.0);
    [
        palette.ocean_day[0].lerp(palette.ocean_night[0], t),
        palette.ocean_day[1].lerp(palette.ocean_night[1], t),
        palette.ocean_day[2].lerp(palette.ocean_night[2], t),
    ]
}

/// `base * (1 - cycle)`: rays fade out completely at full night.
pub fn ray_opacity(base: f32, cycle: f32) -> f32 {
    base * (1.0 - cycle.clamp(0.0, 1.0))
}
