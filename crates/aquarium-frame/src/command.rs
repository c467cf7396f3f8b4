//! Draw Commands
//!
//! Serializable record of the calls made against a drawing surface during one
//! frame. Used for headless runs, frame dumps, and compositor tests.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CompositeMode, Paint, Point, Rect, Shadow};

/// Identifier of a loaded image, unique within one asset catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(pub u32);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img_{:03}", self.0)
    }
}

/// The compositor's layers, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Ocean,
    LightRays,
    Sand,
    BackgroundDecor,
    MarineSnow,
    Bubbles,
    Agents,
    ForegroundDecor,
    Vegetation,
}

impl Layer {
    /// All layers in the order they are painted each tick.
    pub const ORDER: [Layer; 9] = [
        Layer::Ocean,
        Layer::LightRays,
        Layer::Sand,
        Layer::BackgroundDecor,
        Layer::MarineSnow,
        Layer::Bubbles,
        Layer::Agents,
        Layer::ForegroundDecor,
        Layer::Vegetation,
    ];
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Ocean => "ocean",
            Layer::LightRays => "light_rays",
            Layer::Sand => "sand",
            Layer::BackgroundDecor => "background_decor",
            Layer::MarineSnow => "marine_snow",
            Layer::Bubbles => "bubbles",
            Layer::Agents => "agents",
            Layer::ForegroundDecor => "foreground_decor",
            Layer::Vegetation => "vegetation",
        };
        write!(f, "{}", name)
    }
}

/// A single drawing-surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    BeginLayer { layer: Layer },
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Scale { x: f32, y: f32 },
    Rotate { radians: f32 },
    GlobalAlpha { alpha: f32 },
    Shadow { shadow: Option<Shadow> },
    Composite { mode: CompositeMode },
    FillPaint { paint: Paint },
    StrokePaint { paint: Paint, line_width: f32 },
    FillRect { rect: Rect },
    BeginPath,
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadraticTo { control: Point, to: Point },
    BezierTo { control1: Point, control2: Point, to: Point },
    Arc { center: Point, radius: f32, start: f32, end: f32 },
    Ellipse { center: Point, radius_x: f32, radius_y: f32 },
    ClosePath,
    Fill,
    Stroke,
    DrawImage { image: ImageId, dest: Rect },
}

/// Every command issued during one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub tick: u64,
    pub time: f32,
    pub commands: Vec<DrawCommand>,
}

impl FrameRecord {
    /// Layers in the order their markers appear.
    pub fn layers(&self) -> Vec<Layer> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::BeginLayer { layer } => Some(*layer),
                _ => None,
            })
            .collect()
    }

    /// Commands between the marker for `layer` and the next marker.
    pub fn layer_commands(&self, layer: Layer) -> &[DrawCommand] {
        let Some(start) = self
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::BeginLayer { layer: l } if *l == layer))
        else {
            return &[];
        };
        let rest = &self.commands[start + 1..];
        let len = rest
            .iter()
            .position(|c| matches!(c, DrawCommand::BeginLayer { .. }))
            .unwrap_or(rest.len());
        &rest[..len]
    }

    /// Number of image blits in the frame.
    pub fn image_draws(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawImage { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_slicing() {
        let frame = FrameRecord {
            tick: 1,
            time: 0.008,
            commands: vec![
                DrawCommand::BeginLayer { layer: Layer::Ocean },
                DrawCommand::FillRect { rect: Rect::new(0.0, 0.0, 10.0, 10.0) },
                DrawCommand::BeginLayer { layer: Layer::Agents },
                DrawCommand::DrawImage { image: ImageId(3), dest: Rect::centered(4.0, 2.0) },
                DrawCommand::Restore,
            ],
        };

        assert_eq!(frame.layers(), vec![Layer::Ocean, Layer::Agents]);
        assert_eq!(frame.layer_commands(Layer::Ocean).len(), 1);
        assert_eq!(frame.layer_commands(Layer::Agents).len(), 2);
        assert!(frame.layer_commands(Layer::Sand).is_empty());
        assert_eq!(frame.image_draws(), 1);
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_string(&DrawCommand::BeginLayer { layer: Layer::LightRays }).unwrap();
        assert_eq!(json, r#"{"op":"begin_layer","layer":"light_rays"}"#);
    }

    #[test]
    fn test_layer_order_is_sorted() {
        let mut sorted = Layer::ORDER;
        sorted.sort();
        assert_eq!(sorted, Layer::ORDER);
    }
}
