//! Software canvas.
//!
//! [`DrawSurface`] over a `tiny_skia` pixmap. Path points are mapped to
//! device space as they are added, so a path built across transform changes
//! fills the way a browser canvas would. Shadows are the shape's coverage
//! blurred with `image::imageops::blur` and composited underneath.

use aquarium_core::DrawSurface;
use aquarium_frame::{CompositeMode, ImageId, Paint, Point, Rect, Rgba, Shadow};
use bevy::math::{Affine2, Vec2};
use image::{imageops, GrayImage};
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};
use tiny_skia as sk;

/// Decoded RGBA8 pixels of a loaded image.
#[derive(Debug, Clone)]
pub struct SpritePixels {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SpritePixels {
    /// Wraps tightly packed RGBA8 rows. Returns `None` when the buffer does
    /// not match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied copy for blitting.
    fn to_pixmap(&self) -> Option<sk::Pixmap> {
        let mut pixmap = sk::Pixmap::new(self.width, self.height)?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(self.data.chunks_exact(4)) {
            *dst = sk::ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Some(pixmap)
    }
}

#[derive(Debug, Clone)]
struct DrawState {
    transform: Affine2,
    alpha: f32,
    shadow: Option<Shadow>,
    composite: CompositeMode,
    fill: Paint,
    stroke: Paint,
    line_width: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            shadow: None,
            composite: CompositeMode::SourceOver,
            fill: Paint::default(),
            stroke: Paint::default(),
            line_width: 1.0,
        }
    }
}

/// One path verb with device-space points.
#[derive(Debug, Clone, Copy)]
enum PathOp {
    Move(Point),
    Line(Point),
    Quad(Point, Point),
    Cubic(Point, Point, Point),
    Close,
}

impl PathOp {
    fn is_finite(&self) -> bool {
        match self {
            PathOp::Move(p) | PathOp::Line(p) => p.is_finite(),
            PathOp::Quad(c, p) => c.is_finite() && p.is_finite(),
            PathOp::Cubic(c1, c2, p) => c1.is_finite() && c2.is_finite() && p.is_finite(),
            PathOp::Close => true,
        }
    }

    fn end(&self) -> Option<Point> {
        match *self {
            PathOp::Move(p) | PathOp::Line(p) | PathOp::Quad(_, p) | PathOp::Cubic(_, _, p) => Some(p),
            PathOp::Close => None,
        }
    }
}

/// An RGBA raster that the scene draws into.
pub struct PixelCanvas {
    pixmap: sk::Pixmap,
    state: DrawState,
    stack: Vec<DrawState>,
    path: Vec<PathOp>,
    current: Option<Point>,
    subpath_start: Option<Point>,
    images: HashMap<ImageId, sk::Pixmap>,
}

impl PixelCanvas {
    /// A transparent canvas. `None` for a zero or unallocatable size.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: sk::Pixmap::new(width, height)?,
            state: DrawState::default(),
            stack: Vec::new(),
            path: Vec::new(),
            current: None,
            subpath_start: None,
            images: HashMap::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Registers pixels for an image id. Blits of unknown ids are skipped.
    pub fn insert_image(&mut self, id: ImageId, sprite: SpritePixels) {
        match sprite.to_pixmap() {
            Some(pixmap) => {
                self.images.insert(id, pixmap);
            }
            None => tracing::warn!("Could not upload image {:?} to the canvas", id),
        }
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Fills the whole buffer and resets drawing state for a new frame.
    pub fn clear(&mut self, color: Rgba) {
        self.pixmap.fill(sk_color(color, 1.0));
        self.state = DrawState::default();
        self.stack.clear();
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::from_rgba8(c.red(), c.green(), c.blue(), c.alpha() as f32 / 255.0))
    }

    /// Writes the buffer as straight sRGB RGBA8 into `out`, which must hold
    /// `width * height * 4` bytes.
    pub fn write_rgba8(&self, out: &mut [u8]) {
        for (px, chunk) in self.pixmap.pixels().iter().zip(out.chunks_exact_mut(4)) {
            let c = px.demultiply();
            chunk.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = vec![0; self.pixmap.data().len()];
        self.write_rgba8(&mut out);
        out
    }

    fn device(&self, p: Point) -> Point {
        let v = self.state.transform.transform_point2(Vec2::new(p.x, p.y));
        Point::new(v.x, v.y)
    }

    /// Average linear scale, used for line widths and blur radii.
    fn scale_factor(&self) -> f32 {
        self.state.transform.matrix2.determinant().abs().sqrt()
    }

    fn push(&mut self, op: PathOp) {
        if !op.is_finite() {
            return;
        }
        match op {
            PathOp::Move(p) => {
                self.subpath_start = Some(p);
                self.current = Some(p);
            }
            PathOp::Close => self.current = self.subpath_start,
            _ => self.current = op.end(),
        }
        self.path.push(op);
    }

    fn build_path(&self) -> Option<sk::Path> {
        let mut builder = sk::PathBuilder::new();
        for op in &self.path {
            match *op {
                PathOp::Move(p) => builder.move_to(p.x, p.y),
                PathOp::Line(p) => builder.line_to(p.x, p.y),
                PathOp::Quad(c, p) => builder.quad_to(c.x, c.y, p.x, p.y),
                PathOp::Cubic(c1, c2, p) => builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                PathOp::Close => builder.close(),
            }
        }
        builder.finish()
    }

    /// Appends an elliptical arc in user space as cubic pieces.
    fn push_arc(&mut self, center: Point, radius_x: f32, radius_y: f32, start: f32, sweep: f32) {
        let first = self.device(Point::new(
            center.x + radius_x * start.cos(),
            center.y + radius_y * start.sin(),
        ));
        if self.current.is_some() {
            self.push(PathOp::Line(first));
        } else {
            self.push(PathOp::Move(first));
        }
        for [c1, c2, end] in arc_cubics(center, radius_x, radius_y, start, sweep) {
            let op = PathOp::Cubic(self.device(c1), self.device(c2), self.device(end));
            self.push(op);
        }
    }

    fn active_shadow(&self) -> Option<(Shadow, f32)> {
        let shadow = self.state.shadow?;
        if !(shadow.blur > 0.0 && shadow.color.a > 0.0) {
            return None;
        }
        Some((shadow, shadow.blur * self.scale_factor() / 2.0))
    }

    fn sk_paint(&self, paint: &Paint) -> sk::Paint<'static> {
        let alpha = self.state.alpha.clamp(0.0, 1.0);
        let shader = match paint {
            Paint::Solid { color } => sk::Shader::SolidColor(sk_color(*color, alpha)),
            Paint::Linear(gradient) => {
                let stops = gradient
                    .stops
                    .iter()
                    .map(|s| sk::GradientStop::new(s.offset, sk_color(s.color, alpha)))
                    .collect();
                // Gradients live in user space; paths are already in device space.
                sk::LinearGradient::new(
                    sk::Point::from_xy(gradient.start.x, gradient.start.y),
                    sk::Point::from_xy(gradient.end.x, gradient.end.y),
                    stops,
                    sk::SpreadMode::Pad,
                    sk_transform(&self.state.transform),
                )
                .unwrap_or_else(|| sk::Shader::SolidColor(sk_color(gradient.color_at(0.0), alpha)))
            }
        };
        sk::Paint {
            shader,
            blend_mode: sk_blend(self.state.composite),
            anti_alias: true,
            ..sk::Paint::default()
        }
    }

    /// Fills or strokes a device-space path, shadow first.
    fn paint_path(&mut self, path: &sk::Path, paint: &Paint, stroke: Option<&sk::Stroke>) {
        let blend_mode = sk_blend(self.state.composite);
        if let Some((shadow, sigma)) = self.active_shadow() {
            let spread = stroke.map_or(0.0, |s| s.width / 2.0);
            let b = path.bounds();
            let bounds = sk::Rect::from_ltrb(
                b.left() - spread,
                b.top() - spread,
                b.right() + spread,
                b.bottom() + spread,
            );
            if let Some(bounds) = bounds {
                let silhouette = sk::Paint::default();
                let opacity = self.state.alpha.clamp(0.0, 1.0);
                draw_shadow(&mut self.pixmap, shadow, sigma, opacity, blend_mode, bounds, |layer, offset| {
                    match stroke {
                        Some(stroke) => layer.stroke_path(path, &silhouette, stroke, offset, None),
                        None => layer.fill_path(path, &silhouette, sk::FillRule::Winding, offset, None),
                    }
                });
            }
        }

        let paint = self.sk_paint(paint);
        let identity = sk::Transform::identity();
        match stroke {
            Some(stroke) => self.pixmap.stroke_path(path, &paint, stroke, identity, None),
            None => self
                .pixmap
                .fill_path(path, &paint, sk::FillRule::Winding, identity, None),
        }
    }
}

impl DrawSurface for PixelCanvas {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Affine2::from_translation(Vec2::new(x, y));
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Affine2::from_scale(Vec2::new(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(radians);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.shadow = shadow;
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.state.composite = mode;
    }

    fn set_fill(&mut self, paint: Paint) {
        self.state.fill = paint;
    }

    fn set_stroke(&mut self, paint: Paint, line_width: f32) {
        self.state.stroke = paint;
        self.state.line_width = line_width;
    }

    fn fill_rect(&mut self, rect: Rect) {
        let corners = [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.x, rect.bottom()),
        ]
        .map(|p| self.device(p));
        if corners.iter().any(|p| !p.is_finite()) {
            return;
        }
        let mut builder = sk::PathBuilder::new();
        builder.move_to(corners[0].x, corners[0].y);
        for p in &corners[1..] {
            builder.line_to(p.x, p.y);
        }
        builder.close();
        if let Some(path) = builder.finish() {
            let paint = self.state.fill.clone();
            self.paint_path(&path, &paint, None);
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }

    fn move_to(&mut self, to: Point) {
        let p = self.device(to);
        self.push(PathOp::Move(p));
    }

    fn line_to(&mut self, to: Point) {
        let p = self.device(to);
        if self.current.is_some() {
            self.push(PathOp::Line(p));
        } else {
            self.push(PathOp::Move(p));
        }
    }

    fn quadratic_to(&mut self, control: Point, to: Point) {
        let (c, end) = (self.device(control), self.device(to));
        if self.current.is_none() {
            self.push(PathOp::Move(c));
        }
        self.push(PathOp::Quad(c, end));
    }

    fn bezier_to(&mut self, control1: Point, control2: Point, to: Point) {
        let (c1, c2, end) = (self.device(control1), self.device(control2), self.device(to));
        if self.current.is_none() {
            self.push(PathOp::Move(c1));
        }
        self.push(PathOp::Cubic(c1, c2, end));
    }

    fn arc(&mut self, center: Point, radius: f32, start: f32, end: f32) {
        let sweep = (end - start).clamp(-TAU, TAU);
        self.push_arc(center, radius, radius, start, sweep);
    }

    fn ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32) {
        self.current = None;
        self.push_arc(center, radius_x, radius_y, 0.0, TAU);
        self.push(PathOp::Close);
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            self.push(PathOp::Close);
        }
    }

    fn fill(&mut self) {
        if let Some(path) = self.build_path() {
            let paint = self.state.fill.clone();
            self.paint_path(&path, &paint, None);
        }
    }

    fn stroke(&mut self) {
        let width = self.state.line_width * self.scale_factor();
        if !width.is_finite() {
            return;
        }
        if let Some(path) = self.build_path() {
            let stroke = sk::Stroke {
                width: width.max(0.0),
                ..sk::Stroke::default()
            };
            let paint = self.state.stroke.clone();
            self.paint_path(&path, &paint, Some(&stroke));
        }
    }

    fn draw_image(&mut self, image: ImageId, dest: Rect) {
        if !(dest.width > 0.0 && dest.height > 0.0) {
            return;
        }
        let Some(sprite) = self.images.get(&image) else {
            return;
        };
        let (w, h) = (sprite.width() as f32, sprite.height() as f32);
        let placed = self.state.transform
            * Affine2::from_translation(Vec2::new(dest.x, dest.y))
            * Affine2::from_scale(Vec2::new(dest.width / w, dest.height / h));
        if !placed.is_finite() || placed.matrix2.determinant() == 0.0 {
            return;
        }
        let ts = sk_transform(&placed);
        let blend_mode = sk_blend(self.state.composite);
        let opacity = self.state.alpha.clamp(0.0, 1.0);

        if let Some((shadow, sigma)) = self.active_shadow() {
            if let Some(bounds) = device_bounds(&placed, w, h) {
                let silhouette = sk::PixmapPaint {
                    quality: sk::FilterQuality::Nearest,
                    ..sk::PixmapPaint::default()
                };
                draw_shadow(&mut self.pixmap, shadow, sigma, opacity, blend_mode, bounds, |layer, offset| {
                    layer.draw_pixmap(0, 0, sprite.as_ref(), &silhouette, ts.post_concat(offset), None)
                });
            }
        }

        let paint = sk::PixmapPaint {
            opacity,
            blend_mode,
            quality: sk::FilterQuality::Nearest,
        };
        self.pixmap.draw_pixmap(0, 0, sprite.as_ref(), &paint, ts, None);
    }
}

/// Renders a silhouette through `draw`, blurs its coverage and composites it
/// in `shadow.color` onto `target`. `bounds` is the unblurred device extent.
fn draw_shadow(
    target: &mut sk::Pixmap,
    shadow: Shadow,
    sigma: f32,
    opacity: f32,
    blend_mode: sk::BlendMode,
    bounds: sk::Rect,
    draw: impl FnOnce(&mut sk::Pixmap, sk::Transform),
) {
    let pad = (sigma * 3.0).ceil();
    let x0 = (bounds.left() - pad).floor().max(0.0);
    let y0 = (bounds.top() - pad).floor().max(0.0);
    let x1 = (bounds.right() + pad).ceil().min(target.width() as f32);
    let y1 = (bounds.bottom() + pad).ceil().min(target.height() as f32);
    if !(x1 > x0 && y1 > y0) {
        return;
    }
    let (width, height) = ((x1 - x0) as u32, (y1 - y0) as u32);
    let Some(mut layer) = sk::Pixmap::new(width, height) else {
        return;
    };
    draw(&mut layer, sk::Transform::from_translate(-x0, -y0));

    let coverage: Vec<u8> = layer.pixels().iter().map(|p| p.alpha()).collect();
    let Some(coverage) = GrayImage::from_raw(width, height, coverage) else {
        return;
    };
    let blurred = imageops::blur(&coverage, sigma);

    let strength = (shadow.color.a * opacity).clamp(0.0, 1.0);
    let (r, g, b) = (channel(shadow.color.r), channel(shadow.color.g), channel(shadow.color.b));
    for (px, a) in layer.pixels_mut().iter_mut().zip(blurred.as_raw()) {
        let a = (*a as f32 * strength).round() as u8;
        *px = sk::ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    let paint = sk::PixmapPaint {
        blend_mode,
        ..sk::PixmapPaint::default()
    };
    target.draw_pixmap(x0 as i32, y0 as i32, layer.as_ref(), &paint, sk::Transform::identity(), None);
}

/// Cubic pieces of an elliptical arc, at most a quarter turn each, as
/// `[control1, control2, end]` in user space.
fn arc_cubics(center: Point, radius_x: f32, radius_y: f32, start: f32, sweep: f32) -> Vec<[Point; 3]> {
    let pieces = ((sweep.abs() / FRAC_PI_2).ceil() as usize).clamp(1, 4);
    let step = sweep / pieces as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan();
    (0..pieces)
        .map(|i| {
            let (s0, c0) = (start + step * i as f32).sin_cos();
            let (s1, c1) = (start + step * (i + 1) as f32).sin_cos();
            [
                Point::new(center.x + radius_x * (c0 - k * s0), center.y + radius_y * (s0 + k * c0)),
                Point::new(center.x + radius_x * (c1 + k * s1), center.y + radius_y * (s1 - k * c1)),
                Point::new(center.x + radius_x * c1, center.y + radius_y * s1),
            ]
        })
        .collect()
}

fn device_bounds(transform: &Affine2, width: f32, height: f32) -> Option<sk::Rect> {
    let corners = [
        Vec2::ZERO,
        Vec2::new(width, 0.0),
        Vec2::new(width, height),
        Vec2::new(0.0, height),
    ]
    .map(|c| transform.transform_point2(c));
    let min = corners.iter().copied().reduce(Vec2::min)?;
    let max = corners.iter().copied().reduce(Vec2::max)?;
    sk::Rect::from_ltrb(min.x, min.y, max.x, max.y)
}

fn sk_transform(t: &Affine2) -> sk::Transform {
    let (m, o) = (t.matrix2, t.translation);
    sk::Transform::from_row(m.x_axis.x, m.x_axis.y, m.y_axis.x, m.y_axis.y, o.x, o.y)
}

fn sk_color(c: Rgba, alpha: f32) -> sk::Color {
    sk::Color::from_rgba(
        c.r.clamp(0.0, 1.0),
        c.g.clamp(0.0, 1.0),
        c.b.clamp(0.0, 1.0),
        (c.a * alpha).clamp(0.0, 1.0),
    )
    .unwrap_or(sk::Color::TRANSPARENT)
}

fn sk_blend(mode: CompositeMode) -> sk::BlendMode {
    match mode {
        CompositeMode::SourceOver => sk::BlendMode::SourceOver,
        CompositeMode::Multiply => sk::BlendMode::Multiply,
    }
}

fn channel(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
