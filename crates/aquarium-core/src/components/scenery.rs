//! Static scenery: decor pieces, weeds, sand blemishes.

use aquarium_frame::{ImageId, Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorKind {
    Rock,
    Coral,
    Driftwood,
}

impl DecorKind {
    pub const ALL: [DecorKind; 3] = [DecorKind::Rock, DecorKind::Coral, DecorKind::Driftwood];
}

impl fmt::Display for DecorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecorKind::Rock => write!(f, "rock"),
            DecorKind::Coral => write!(f, "coral"),
            DecorKind::Driftwood => write!(f, "driftwood"),
        }
    }
}

/// Which side of the creatures a decor piece is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorLayer {
    Background,
    Foreground,
}

/// A static decor piece. `base` is the bottom-center of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Decor {
    pub kind: DecorKind,
    pub image: ImageId,
    pub base: Point,
    pub width: f32,
    pub height: f32,
    /// 0 is far, 1 is near.
    pub depth: f32,
    pub layer: DecorLayer,
}

impl Decor {
    /// Destination rectangle for the image blit.
    pub fn dest(&self) -> Rect {
        Rect::new(
            self.base.x - self.width / 2.0,
            self.base.y - self.height,
            self.width,
            self.height,
        )
    }
}

/// A swaying weed rooted at the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Weed {
    pub x: f32,
    /// Height as a fraction of scene height
    pub height_ratio: f32,
    /// Root width as a fraction of scene height
    pub width_ratio: f32,
    pub phase: f32,
}

/// A darker ellipse multiplied into the sand, fixed for the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SandBlemish {
    pub center: Point,
    pub radius_x: f32,
    pub radius_y: f32,
    pub opacity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decor_dest_sits_on_base() {
        let decor = Decor {
            kind: DecorKind::Rock,
            image: ImageId(0),
            base: Point::new(100.0, 180.0),
            width: 40.0,
            height: 30.0,
            depth: 0.5,
            layer: DecorLayer::Background,
        };
        let dest = decor.dest();
        assert_eq!(dest.x, 80.0);
        assert_eq!(dest.bottom(), 180.0);
    }
}
