//! Drawable shapes as ordered point lists in logical space.
//!
//! Every constructor validates its inputs and produces a non-empty point
//! list. Closed outlines (rectangle, polygon, triangle) repeat their first
//! point at the end; [`Shape::centroid`] ignores that closing copy.

use std::f64::consts::TAU;

use crate::types::color::Color;
use crate::types::vec2::Vec2;

pub const CIRCLE_SEGMENTS: usize = 64;
pub const ARROW_HEAD_LENGTH: f64 = 0.2;
pub const ARROW_HEAD_HALF_WIDTH: f64 = 0.1;
/// Half extent of the box that stands in for a text run's geometry.
pub const TEXT_BOX_HALF: f64 = 0.1;
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub content: String,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Line,
    Arrow,
    Polygon,
    Text(TextRun),
    Triangle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub points: Vec<Vec2>,
    pub color: Color,
    pub stroke_width: f64,
    /// 0 draws the outline only.
    pub fill_opacity: f64,
}

/// Maps a named font size to points.
pub fn named_font_size(name: &str) -> Option<f64> {
    Some(match name.to_ascii_lowercase().as_str() {
        "tiny"   => 8.0,
        "small"  => 12.0,
        "normal" => 16.0,
        "large"  => 20.0,
        "huge"   => 24.0,
        "title"  => 28.0,
        _ => return None,
    })
}

// ─── Construction ────────────────────────────────────────────────────────────

impl Shape {
    fn with_points(kind: ShapeKind, points: Vec<Vec2>) -> Self {
        Self { kind, points, color: Color::BLACK, stroke_width: DEFAULT_STROKE_WIDTH, fill_opacity: 0.0 }
    }

    pub fn circle(center: Vec2, radius: f64) -> Result<Self, String> {
        Ok(Self::with_points(ShapeKind::Circle, circle_points(center, radius)?))
    }

    pub fn rectangle(center: Vec2, width: f64, height: f64) -> Result<Self, String> {
        Ok(Self::with_points(ShapeKind::Rectangle, rectangle_points(center, width, height)?))
    }

    pub fn line(start: Vec2, end: Vec2) -> Self {
        Self::with_points(ShapeKind::Line, vec![start, end])
    }

    pub fn arrow(start: Vec2, end: Vec2) -> Self {
        Self::with_points(ShapeKind::Arrow, arrow_points(start, end))
    }

    pub fn polygon(vertices: &[Vec2]) -> Result<Self, String> {
        if vertices.len() < 3 {
            return Err(format!("polygon needs at least 3 vertices, got {}", vertices.len()));
        }
        let mut points = vertices.to_vec();
        points.push(vertices[0]);
        Ok(Self::with_points(ShapeKind::Polygon, points))
    }

    pub fn text(content: impl Into<String>, font_size: f64, position: Vec2) -> Result<Self, String> {
        if font_size <= 0.0 {
            return Err(format!("font size must be positive, got {font_size}"));
        }
        let run = TextRun { content: content.into(), font_size };
        let mut shape = Self::with_points(ShapeKind::Text(run), text_box(position));
        shape.fill_opacity = 1.0;
        Ok(shape)
    }

    pub fn triangle(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self::with_points(ShapeKind::Triangle, vec![a, b, c, a])
    }

    /// Apex on top, base of width `size` below; height equals `size`.
    pub fn isosceles_triangle(size: f64, center: Vec2) -> Result<Self, String> {
        positive("triangle size", size)?;
        let h = size / 2.0;
        Ok(Self::triangle(
            Vec2::new(center.x, center.y + h),
            Vec2::new(center.x - h, center.y - h),
            Vec2::new(center.x + h, center.y - h),
        ))
    }

    pub fn equilateral_triangle(side: f64, center: Vec2) -> Result<Self, String> {
        positive("triangle side", side)?;
        let h = side * 3f64.sqrt() / 2.0;
        Ok(Self::triangle(
            Vec2::new(center.x, center.y + h / 2.0),
            Vec2::new(center.x - side / 2.0, center.y - h / 2.0),
            Vec2::new(center.x + side / 2.0, center.y - h / 2.0),
        ))
    }

    /// Right angle at the lower-left corner.
    pub fn right_triangle(width: f64, height: f64, center: Vec2) -> Result<Self, String> {
        positive("triangle width", width)?;
        positive("triangle height", height)?;
        Ok(Self::triangle(
            Vec2::new(center.x - width / 2.0, center.y - height / 2.0),
            Vec2::new(center.x + width / 2.0, center.y - height / 2.0),
            Vec2::new(center.x - width / 2.0, center.y + height / 2.0),
        ))
    }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

impl Shape {
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Text(_) => "text",
            ShapeKind::Triangle => "triangle",
        }
    }

    /// Whether the outline joins its last point back to the first.
    pub fn is_closed(&self) -> bool {
        matches!(self.kind, ShapeKind::Circle | ShapeKind::Rectangle | ShapeKind::Polygon | ShapeKind::Triangle)
    }

    /// Mean of the distinct outline points.
    pub fn centroid(&self) -> Vec2 {
        let pts = self.distinct_points();
        if pts.is_empty() {
            return Vec2::ZERO;
        }
        let sum = pts.iter().fold(Vec2::ZERO, |acc, p| acc + *p);
        sum * (1.0 / pts.len() as f64)
    }

    fn distinct_points(&self) -> &[Vec2] {
        match self.points.as_slice() {
            [first, .., last] if self.is_closed() && first == last => &self.points[..self.points.len() - 1],
            pts => pts,
        }
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        (min, max)
    }

    /// Circle radius, measured from the centroid to the first point.
    pub fn radius(&self) -> Option<f64> {
        match self.kind {
            ShapeKind::Circle => self.points.first().map(|p| p.distance(self.centroid())),
            _ => None,
        }
    }

    pub fn text_run(&self) -> Option<&TextRun> {
        match &self.kind {
            ShapeKind::Text(run) => Some(run),
            _ => None,
        }
    }

    pub fn vertices(&self) -> Option<[Vec2; 3]> {
        match (&self.kind, self.points.as_slice()) {
            (ShapeKind::Triangle, [a, b, c, ..]) => Some([*a, *b, *c]),
            _ => None,
        }
    }
}

// ─── Transforms ──────────────────────────────────────────────────────────────

impl Shape {
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p = *p + delta;
        }
    }

    /// Translates so the centroid lands on `target`.
    pub fn move_to(&mut self, target: Vec2) {
        let delta = target - self.centroid();
        self.translate(delta);
    }

    pub fn scale(&mut self, factor: f64) {
        let pivot = self.centroid();
        for p in &mut self.points {
            *p = p.scale_about(pivot, factor);
        }
    }

    /// Counter-clockwise rotation about the centroid, in radians.
    pub fn rotate(&mut self, angle: f64) {
        let pivot = self.centroid();
        for p in &mut self.points {
            *p = p.rotate_about(pivot, angle);
        }
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.fill_opacity = opacity;
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), String> {
        if !matches!(self.kind, ShapeKind::Circle) {
            return Err(format!("{} has no radius", self.kind_name()));
        }
        self.points = circle_points(self.centroid(), radius)?;
        Ok(())
    }

    /// Regenerates an axis-aligned rectangle around the current center.
    pub fn set_rect_size(&mut self, width: f64, height: f64) -> Result<(), String> {
        if !matches!(self.kind, ShapeKind::Rectangle) {
            return Err(format!("{} has no width or height", self.kind_name()));
        }
        self.points = rectangle_points(self.centroid(), width, height)?;
        Ok(())
    }

    /// Current width and height of a rectangle's bounding box.
    pub fn rect_size(&self) -> Option<(f64, f64)> {
        match self.kind {
            ShapeKind::Rectangle => {
                let (min, max) = self.bounds();
                Some((max.x - min.x, max.y - min.y))
            }
            _ => None,
        }
    }

    pub fn set_font_size(&mut self, size: f64) -> Result<(), String> {
        positive("font size", size)?;
        match &mut self.kind {
            ShapeKind::Text(run) => { run.font_size = size; Ok(()) }
            _ => Err(format!("{} has no font size", self.kind_name())),
        }
    }

    pub fn set_vertex(&mut self, index: usize, p: Vec2) -> Result<(), String> {
        if !matches!(self.kind, ShapeKind::Triangle) || self.points.len() != 4 {
            return Err(format!("{} has no vertices", self.kind_name()));
        }
        if index > 2 {
            return Err(format!("vertex index {} out of range 1..3", index + 1));
        }
        self.points[index] = p;
        if index == 0 {
            self.points[3] = p;
        }
        Ok(())
    }

    pub fn set_vertices(&mut self, vertices: [Vec2; 3]) -> Result<(), String> {
        for (i, v) in vertices.into_iter().enumerate() {
            self.set_vertex(i, v)?;
        }
        Ok(())
    }
}

// ─── Geometry helpers ────────────────────────────────────────────────────────

fn positive(what: &str, value: f64) -> Result<(), String> {
    if value > 0.0 { Ok(()) } else { Err(format!("{what} must be positive, got {value}")) }
}

fn circle_points(center: Vec2, radius: f64) -> Result<Vec<Vec2>, String> {
    positive("radius", radius)?;
    Ok((0..CIRCLE_SEGMENTS)
        .map(|i| {
            let t = i as f64 / CIRCLE_SEGMENTS as f64 * TAU;
            Vec2::new(center.x + radius * t.cos(), center.y + radius * t.sin())
        })
        .collect())
}

/// Lower-left, lower-right, upper-right, upper-left, closed.
fn rectangle_points(center: Vec2, width: f64, height: f64) -> Result<Vec<Vec2>, String> {
    positive("width", width)?;
    positive("height", height)?;
    let (hw, hh) = (width / 2.0, height / 2.0);
    let ll = Vec2::new(center.x - hw, center.y - hh);
    Ok(vec![
        ll,
        Vec2::new(center.x + hw, center.y - hh),
        Vec2::new(center.x + hw, center.y + hh),
        Vec2::new(center.x - hw, center.y + hh),
        ll,
    ])
}

/// Shaft then head: start, end, head left, end, head right.
fn arrow_points(start: Vec2, end: Vec2) -> Vec<Vec2> {
    let dir = (end - start).normalized();
    if dir == Vec2::ZERO {
        return vec![start, end, end, end, end];
    }
    let base = end - dir * ARROW_HEAD_LENGTH;
    let side = dir.perp() * ARROW_HEAD_HALF_WIDTH;
    vec![start, end, base + side, end, base - side]
}

fn text_box(position: Vec2) -> Vec<Vec2> {
    let h = TEXT_BOX_HALF;
    vec![
        Vec2::new(position.x - h, position.y - h),
        Vec2::new(position.x + h, position.y - h),
        Vec2::new(position.x + h, position.y + h),
        Vec2::new(position.x - h, position.y + h),
    ]
}

// ─── Tests ───────────────────────────────────────────────────────────────────
