//! Logical ↔ screen mapping.
//!
//! Logical y increases upward and the logical origin sits at the canvas
//! center; screen y increases downward from the top-left corner.

use crate::types::shape::Shape;
use crate::types::vec2::Vec2;

/// Smallest scale auto-fit will produce, in pixels per unit.
pub const MIN_FIT_SCALE: f64 = 5.0;
/// Minimum logical range for content made only of text.
pub const TEXT_ONLY_RANGE: (f64, f64) = (8.0, 6.0);
/// Extra logical room added around fitted content.
pub const FIT_MARGIN: (f64, f64) = (4.0, 3.0);

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSystem {
    width: f64,
    height: f64,
    scale: f64,
    /// Logical point drawn at the canvas center.
    origin: Vec2,
    auto_fit: bool,
    fixed_scale: f64,
}

impl CoordinateSystem {
    pub fn new(width: f64, height: f64, fixed_scale: f64) -> Self {
        let fixed_scale = if fixed_scale > 0.0 { fixed_scale } else { 40.0 };
        Self { width, height, scale: fixed_scale, origin: Vec2::ZERO, auto_fit: false, fixed_scale }
    }

    pub fn width(&self) -> f64 { self.width }
    pub fn height(&self) -> f64 { self.height }
    pub fn scale(&self) -> f64 { self.scale }
    pub fn origin(&self) -> Vec2 { self.origin }
    pub fn auto_fit(&self) -> bool { self.auto_fit }

    pub fn set_auto_fit(&mut self, enabled: bool) {
        self.auto_fit = enabled;
    }

    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.width / 2.0 + (p.x - self.origin.x) * self.scale,
            self.height / 2.0 - (p.y - self.origin.y) * self.scale,
        )
    }

    pub fn to_logical(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x - self.width / 2.0) / self.scale + self.origin.x,
            (self.height / 2.0 - p.y) / self.scale + self.origin.y,
        )
    }

    /// Visible logical rectangle as `(min, max)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.to_logical(Vec2::new(0.0, self.height)), self.to_logical(Vec2::new(self.width, 0.0)))
    }

    /// Fixes the scale and disables auto-fit.
    pub fn set_fixed_scale(&mut self, pixels_per_unit: f64) -> Result<(), String> {
        if pixels_per_unit <= 0.0 {
            return Err(format!("scale must be positive, got {pixels_per_unit}"));
        }
        self.fixed_scale = pixels_per_unit;
        self.scale = pixels_per_unit;
        self.auto_fit = false;
        Ok(())
    }

    /// Shows exactly the given logical range; the tighter axis wins.
    pub fn set_logical_range(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<(), String> {
        let (w, h) = (x_max - x_min, y_max - y_min);
        if w <= 0.0 || h <= 0.0 {
            return Err(format!("empty logical range x {x_min}..{x_max}, y {y_min}..{y_max}"));
        }
        self.scale = (self.width / w).min(self.height / h);
        self.origin = Vec2::new((x_min + x_max) / 2.0, (y_min + y_max) / 2.0);
        Ok(())
    }

    /// Picks a scale that shows `content_w × content_h` logical units,
    /// damped so small scenes aren't blown up edge to edge.
    pub fn fit(&mut self, content_w: f64, content_h: f64) {
        if content_w <= 0.0 || content_h <= 0.0 {
            self.scale = self.fixed_scale;
            return;
        }
        let base = (self.width / content_w).min(self.height / content_h);
        let damping = if content_w < 10.0 && content_h < 10.0 {
            0.6
        } else if content_w < 20.0 && content_h < 20.0 {
            0.5
        } else {
            0.4
        };
        self.scale = (base * damping).max(MIN_FIT_SCALE);
    }

    /// Fits to the bounding box of `shapes`. Text contributes its anchor
    /// only, since its rendered extent is unknown here.
    pub fn fit_content<'a>(&mut self, shapes: impl IntoIterator<Item = &'a Shape>) {
        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut any = false;
        let mut text_only = true;

        for shape in shapes {
            any = true;
            let (lo, hi) = if shape.text_run().is_some() {
                let c = shape.centroid();
                (c, c)
            } else {
                text_only = false;
                shape.bounds()
            };
            min = Vec2::new(min.x.min(lo.x), min.y.min(lo.y));
            max = Vec2::new(max.x.max(hi.x), max.y.max(hi.y));
        }

        if !any {
            self.scale = self.fixed_scale;
            return;
        }

        let mut w = max.x - min.x;
        let mut h = max.y - min.y;
        if text_only {
            w = w.max(TEXT_ONLY_RANGE.0);
            h = h.max(TEXT_ONLY_RANGE.1);
        }
        self.fit(w + FIT_MARGIN.0, h + FIT_MARGIN.1);
        tracing::debug!(scale = self.scale, w, h, "auto-fit coordinate system");
    }
}
