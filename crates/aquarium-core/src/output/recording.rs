//! Command-log surface for headless runs and tests.

use aquarium_frame::{
    CompositeMode, DrawCommand, FrameRecord, ImageId, Layer, Paint, Point, Rect, Shadow,
};

use crate::surface::DrawSurface;

/// Records every surface call of a frame in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Drains the log into a frame record.
    pub fn take_frame(&mut self, tick: u64, time: f32) -> FrameRecord {
        FrameRecord {
            tick,
            time,
            commands: std::mem::take(&mut self.commands),
        }
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl DrawSurface for RecordingSurface {
    fn begin_layer(&mut self, layer: Layer) {
        self.push(DrawCommand::BeginLayer { layer });
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::Translate { x, y });
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::Scale { x, y });
    }

    fn rotate(&mut self, radians: f32) {
        self.push(DrawCommand::Rotate { radians });
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.push(DrawCommand::GlobalAlpha { alpha });
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.push(DrawCommand::Shadow { shadow });
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.push(DrawCommand::Composite { mode });
    }

    fn set_fill(&mut self, paint: Paint) {
        self.push(DrawCommand::FillPaint { paint });
    }

    fn set_stroke(&mut self, paint: Paint, line_width: f32) {
        self.push(DrawCommand::StrokePaint { paint, line_width });
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.push(DrawCommand::FillRect { rect });
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, to: Point) {
        self.push(DrawCommand::MoveTo { to });
    }

    fn line_to(&mut self, to: Point) {
        self.push(DrawCommand::LineTo { to });
    }

    fn quadratic_to(&mut self, control: Point, to: Point) {
        self.push(DrawCommand::QuadraticTo { control, to });
    }

    fn bezier_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.push(DrawCommand::BezierTo {
            control1,
            control2,
            to,
        });
    }

    fn arc(&mut self, center: Point, radius: f32, start: f32, end: f32) {
        self.push(DrawCommand::Arc {
            center,
            radius,
            start,
            end,
        });
    }

    fn ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32) {
        self.push(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
        });
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn draw_image(&mut self, image: ImageId, dest: Rect) {
        self.push(DrawCommand::DrawImage { image, dest });
    }
}
