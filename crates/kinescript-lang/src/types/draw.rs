use crate::scene::coords::CoordinateSystem;
use crate::types::color::Color;
use crate::types::shape::Shape;

/// Text payload carried by a draw command.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub content: String,
    pub font_size: f64,
    /// Screen-space anchor (the text center).
    pub anchor: (f64, f64),
}

/// One shape flattened into screen pixels (0,0 = top-left, y-down), ready
/// for any rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub points: Vec<(f64, f64)>,
    /// Join the last point back to the first.
    pub closed: bool,
    pub color: Color,
    pub stroke_width: f64,
    /// 0 = outline only, 1 = opaque fill.
    pub fill_opacity: f64,
    pub text: Option<TextDraw>,
}

impl DrawCommand {
    pub fn from_shape(shape: &Shape, coords: &CoordinateSystem) -> Self {
        let points = shape.points.iter()
            .map(|p| {
                let s = coords.to_screen(*p);
                (s.x, s.y)
            })
            .collect();

        let text = shape.text_run().map(|run| {
            let c = coords.to_screen(shape.centroid());
            TextDraw { content: run.content.clone(), font_size: run.font_size, anchor: (c.x, c.y) }
        });

        Self {
            points,
            closed: shape.is_closed(),
            color: shape.color,
            stroke_width: shape.stroke_width,
            fill_opacity: shape.fill_opacity,
            text,
        }
    }

    /// Screen-space bounding box as `(min, max)`, or `None` when empty.
    pub fn screen_bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |((x0, y0), (x1, y1)), &(x, y)| {
            ((x0.min(x), y0.min(y)), (x1.max(x), y1.max(y)))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::vec2::Vec2;

    #[test]
    fn flattens_to_screen_pixels() {
        let coords = CoordinateSystem::new(800.0, 600.0, 50.0);
        let r = Shape::rectangle(Vec2::ZERO, 2.0, 2.0).unwrap();
        let cmd = DrawCommand::from_shape(&r, &coords);
        assert!(cmd.closed);
        assert_eq!(cmd.points[0], (350.0, 350.0));
        assert_eq!(cmd.points[2], (450.0, 250.0));
        assert_eq!(cmd.screen_bounds(), Some(((350.0, 250.0), (450.0, 350.0))));
    }

    #[test]
    fn text_carries_anchor() {
        let coords = CoordinateSystem::new(800.0, 600.0, 50.0);
        let t = Shape::text("hello", 12.0, Vec2::new(1.0, 0.0)).unwrap();
        let cmd = DrawCommand::from_shape(&t, &coords);
        let text = cmd.text.unwrap();
        assert_eq!(text.content, "hello");
        assert_eq!(text.anchor, (450.0, 300.0));
    }

    #[test]
    fn arrow_is_an_open_path() {
        let coords = CoordinateSystem::new(100.0, 100.0, 10.0);
        let a = Shape::arrow(Vec2::ZERO, Vec2::new(1.0, 0.0));
        let cmd = DrawCommand::from_shape(&a, &coords);
        assert!(!cmd.closed);
        assert_eq!(cmd.points.len(), 5);
        assert_eq!(cmd.points[1], cmd.points[3]);
    }
}
