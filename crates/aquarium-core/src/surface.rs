//! Drawing Surface
//!
//! Immediate-mode 2D surface the compositor draws into. Hosts implement it
//! over a real canvas; [`crate::output::RecordingSurface`] implements it as a
//! command log.

use aquarium_frame::{CompositeMode, ImageId, Layer, Paint, Point, Rect, Shadow};

/// A canvas-style drawing context.
///
/// State set through `set_*`, the transform, and the current path follow
/// canvas semantics: `save`/`restore` push and pop everything except the
/// path.
pub trait DrawSurface {
    /// Marks the start of a compositor layer. Surfaces that do not care can
    /// ignore it.
    fn begin_layer(&mut self, _layer: Layer) {}

    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, x: f32, y: f32);
    fn scale(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);

    fn set_global_alpha(&mut self, alpha: f32);
    /// Blurred glow behind subsequent draws; `None` turns it off.
    fn set_shadow(&mut self, shadow: Option<Shadow>);
    fn set_composite(&mut self, mode: CompositeMode);
    fn set_fill(&mut self, paint: Paint);
    fn set_stroke(&mut self, paint: Paint, line_width: f32);

    fn fill_rect(&mut self, rect: Rect);

    fn begin_path(&mut self);
    fn move_to(&mut self, to: Point);
    fn line_to(&mut self, to: Point);
    fn quadratic_to(&mut self, control: Point, to: Point);
    fn bezier_to(&mut self, control1: Point, control2: Point, to: Point);
    /// Circular arc, angles in radians measured clockwise from +x.
    fn arc(&mut self, center: Point, radius: f32, start: f32, end: f32);
    /// Full axis-aligned ellipse as a closed subpath.
    fn ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    /// Blits a loaded image scaled into `dest`.
    fn draw_image(&mut self, image: ImageId, dest: Rect);
}
