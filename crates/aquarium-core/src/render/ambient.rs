//! Marine snow and bubbles.

use aquarium_frame::{Paint, Point, Rgba};
use std::f32::consts::TAU;

use crate::components::AmbientParticle;
use crate::surface::DrawSurface;

/// Motes sway at half the rate bubbles shake.
const SNOW_SWAY_RATE: f32 = 0.5;

pub fn draw_snow<'a, S, I>(surface: &mut S, motes: I, time: f32, color: Rgba)
where
    S: DrawSurface + ?Sized,
    I: IntoIterator<Item = &'a AmbientParticle>,
{
    surface.save();
    surface.set_fill(Paint::solid(color));
    for mote in motes {
        let x = mote.position.x + (time * SNOW_SWAY_RATE + mote.phase).sin() * mote.amplitude;
        surface.begin_path();
        surface.arc(Point::new(x, mote.position.y), mote.radius, 0.0, TAU);
        surface.fill();
    }
    surface.restore();
}

/// Outlined circles with a horizontal shake.
pub fn draw_bubbles<'a, S, I>(surface: &mut S, bubbles: I, time: f32, color: Rgba)
where
    S: DrawSurface + ?Sized,
    I: IntoIterator<Item = &'a AmbientParticle>,
{
    surface.save();
    surface.set_stroke(Paint::solid(color), 1.0);
    for bubble in bubbles {
        let x = bubble.position.x + (time + bubble.phase).sin() * bubble.amplitude;
        surface.begin_path();
        surface.arc(Point::new(x, bubble.position.y), bubble.radius, 0.0, TAU);
        surface.stroke();
    }
    surface.restore();
}
