//! Ocean, light rays, sand bed and weeds.

use aquarium_frame::{CompositeMode, LinearGradient, Paint, Point, Rect, Rgba};

use crate::components::{SandBlemish, SceneSize, Weed};
use crate::config::{EnvironmentConfig, PaletteConfig, WeedConfig};
use crate::surface::DrawSurface;
use crate::systems::{ocean_stops, ray_opacity};

/// Rays fainter than this are not drawn at all.
const MIN_VISIBLE_OPACITY: f32 = 1e-3;

/// Vertical ocean gradient, blended toward the night palette by `cycle`.
pub fn draw_ocean<S: DrawSurface + ?Sized>(
    surface: &mut S,
    size: SceneSize,
    cycle: f32,
    palette: &PaletteConfig,
) {
    let [top, middle, bottom] = ocean_stops(cycle, palette);
    let gradient = LinearGradient::new(Point::new(0.0, 0.0), Point::new(0.0, size.height))
        .with_stop(0.0, top)
        .with_stop(0.7, middle)
        .with_stop(1.0, bottom);
    surface.set_fill(Paint::Linear(gradient));
    surface.fill_rect(Rect::new(0.0, 0.0, size.width, size.height));
}

/// Slanted translucent quads that sway slowly and fade out at night.
pub fn draw_light_rays<S: DrawSurface + ?Sized>(
    surface: &mut S,
    size: SceneSize,
    time: f32,
    cycle: f32,
    env: &EnvironmentConfig,
) {
    let opacity = ray_opacity(env.ray_opacity, cycle);
    if opacity < MIN_VISIBLE_OPACITY || env.ray_count == 0 {
        return;
    }

    let spacing = size.width / env.ray_count as f32;
    let top_half = spacing * 0.125;
    let bottom_half = spacing * 0.5;

    surface.save();
    for i in 0..env.ray_count {
        let lean = (time * env.ray_sway_rate + i as f32).sin() * env.ray_sway * size.width;
        let x = spacing * (i as f32 + 0.5);

        let gradient = LinearGradient::new(Point::new(x, 0.0), Point::new(x + lean, size.height))
            .with_stop(0.0, Rgba::WHITE.with_alpha(opacity))
            .with_stop(1.0, Rgba::WHITE.with_alpha(0.0));
        surface.set_fill(Paint::Linear(gradient));
        surface.begin_path();
        surface.move_to(Point::new(x - top_half, 0.0));
        surface.line_to(Point::new(x + top_half, 0.0));
        surface.line_to(Point::new(x + lean + bottom_half, size.height));
        surface.line_to(Point::new(x + lean - bottom_half, size.height));
        surface.close_path();
        surface.fill();
    }
    surface.restore();
}

/// Sand gradient plus darker blemishes multiplied into it.
pub fn draw_sand<S: DrawSurface + ?Sized>(
    surface: &mut S,
    size: SceneSize,
    sand_ratio: f32,
    palette: &PaletteConfig,
    blemishes: &[SandBlemish],
) {
    let sand_top = size.sand_top(sand_ratio);
    let gradient = LinearGradient::new(Point::new(0.0, sand_top), Point::new(0.0, size.height))
        .with_stop(0.0, palette.sand_top)
        .with_stop(1.0, palette.sand_bottom);
    surface.set_fill(Paint::Linear(gradient));
    surface.fill_rect(Rect::new(0.0, sand_top, size.width, size.sand_height(sand_ratio)));

    if blemishes.is_empty() {
        return;
    }
    surface.save();
    surface.set_composite(CompositeMode::Multiply);
    for blemish in blemishes {
        surface.set_fill(Paint::solid(Rgba::BLACK.with_alpha(blemish.opacity)));
        surface.begin_path();
        surface.ellipse(blemish.center, blemish.radius_x, blemish.radius_y);
        surface.fill();
    }
    surface.restore();
}

/// Weeds rooted on the bottom edge, each a pair of quadratic curves whose
/// tip sways with time.
pub fn draw_weeds<S: DrawSurface + ?Sized>(
    surface: &mut S,
    size: SceneSize,
    time: f32,
    weeds: &[Weed],
    cfg: &WeedConfig,
    color: Rgba,
) {
    if weeds.is_empty() {
        return;
    }
    let floor = size.height;

    surface.save();
    surface.set_fill(Paint::solid(color));
    for weed in weeds {
        let h = size.height * weed.height_ratio;
        let half_width = size.height * weed.width_ratio / 2.0;
        let sway = (time + weed.phase).sin() * h * cfg.sway;

        surface.begin_path();
        surface.move_to(Point::new(weed.x - half_width, floor));
        surface.quadratic_to(
            Point::new(weed.x + sway * 0.5, floor - h / 2.0),
            Point::new(weed.x + sway, floor - h),
        );
        surface.quadratic_to(
            Point::new(weed.x + sway * 0.5 + half_width, floor - h / 2.0),
            Point::new(weed.x + half_width, floor),
        );
        surface.close_path();
        surface.fill();
    }
    surface.restore();
}
