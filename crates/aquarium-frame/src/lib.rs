//! Shared drawing types for the aquarium.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod color;
pub mod command;
pub mod geometry;
pub mod paint;

// Re-export color types
pub use color::{ParseColorError, Rgba};

// Re-export geometry types
pub use geometry::{Point, Rect};

// Re-export paint types
pub use paint::{CompositeMode, GradientStop, LinearGradient, Paint, Shadow};

// Re-export command types
pub use command::{DrawCommand, FrameRecord, ImageId, Layer};
