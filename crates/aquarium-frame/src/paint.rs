//! Paint and compositing state for fills and strokes.

use serde::{Deserialize, Serialize};

use crate::{Point, Rgba};

/// One color stop of a gradient; `offset` is in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// A linear gradient between two points in user space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    /// Stops sorted by offset.
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Builder-style stop insertion, keeping stops ordered.
    pub fn with_stop(mut self, offset: f32, color: Rgba) -> Self {
        self.stops.push(GradientStop::new(offset, color));
        self.stops
            .sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap_or(std::cmp::Ordering::Equal));
        self
    }

    /// Parameter of `p` projected onto the gradient axis, clamped to `0..=1`.
    pub fn parameter_at(&self, p: Point) -> f32 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f32::EPSILON {
            return 0.0;
        }
        (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len_sq).clamp(0.0, 1.0)
    }

    /// Color at gradient parameter `t`.
    pub fn color_at(&self, t: f32) -> Rgba {
        let Some(first) = self.stops.first() else {
            return Rgba::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        self.stops.last().map(|s| s.color).unwrap_or(first.color)
    }
}

/// Fill or stroke source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Paint {
    Solid { color: Rgba },
    Linear(LinearGradient),
}

impl Paint {
    pub fn solid(color: Rgba) -> Self {
        Paint::Solid { color }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::solid(Rgba::BLACK)
    }
}

/// How new pixels combine with what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    #[default]
    SourceOver,
    Multiply,
}

/// Blur/glow shadow applied to subsequent fills and blits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub blur: f32,
    pub color: Rgba,
}

impl Shadow {
    pub fn new(blur: f32, color: Rgba) -> Self {
        Self { blur, color }
    }
}
