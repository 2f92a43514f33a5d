//! Scene state and the frame-stepping timeline driver.

pub mod coords;
pub mod surface;

use std::collections::HashMap;

use crate::animation::Animation;
use crate::types::color::Color;
use crate::types::draw::DrawCommand;
use crate::types::shape::Shape;

pub use coords::CoordinateSystem;
pub use surface::{Frame, RecordingSurface, Surface};

// ─── Object table ────────────────────────────────────────────────────────────

/// Stable handle to a shape in an [`ObjectTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(pub usize);

/// Named shapes in draw order. Redefining a name replaces the shape in
/// its existing slot, so handles stay valid.
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    entries: Vec<(String, Shape)>,
    index: HashMap<String, ShapeId>,
}

impl ObjectTable {
    pub fn insert(&mut self, name: impl Into<String>, shape: Shape) -> ShapeId {
        let name = name.into();
        if let Some(&id) = self.index.get(&name) {
            self.entries[id.0].1 = shape;
            return id;
        }
        let id = ShapeId(self.entries.len());
        self.index.insert(name.clone(), id);
        self.entries.push((name, shape));
        id
    }

    pub fn id(&self, name: &str) -> Option<ShapeId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.entries.get(id.0).map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.entries.get_mut(id.0).map(|(_, s)| s)
    }

    pub fn by_name(&self, name: &str) -> Option<&Shape> {
        self.id(name).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Shape)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.entries.iter().map(|(_, s)| s)
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Scene {
    pub name: String,
    pub background: Color,
    objects: ObjectTable,
    coords: CoordinateSystem,
    frame_rate: f64,
}

impl Scene {
    pub fn new(name: impl Into<String>, coords: CoordinateSystem, background: Color, frame_rate: f64) -> Self {
        Self {
            name: name.into(),
            background,
            objects: ObjectTable::default(),
            coords,
            frame_rate: if frame_rate > 0.0 { frame_rate } else { 30.0 },
        }
    }

    pub fn width(&self) -> f64 { self.coords.width() }
    pub fn height(&self) -> f64 { self.coords.height() }
    pub fn frame_rate(&self) -> f64 { self.frame_rate }

    pub fn objects(&self) -> &ObjectTable { &self.objects }
    pub fn objects_mut(&mut self) -> &mut ObjectTable { &mut self.objects }
    pub fn coords(&self) -> &CoordinateSystem { &self.coords }
    pub fn coords_mut(&mut self) -> &mut CoordinateSystem { &mut self.coords }

    /// Refits the coordinate system to the current shapes when auto-fit
    /// is on.
    pub fn refit(&mut self) {
        if self.coords.auto_fit() {
            self.coords.fit_content(self.objects.shapes());
        }
    }

    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        self.objects.shapes().map(|s| DrawCommand::from_shape(s, &self.coords)).collect()
    }

    /// Clears, draws every shape in order and presents one frame.
    pub fn render_frame<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(self.background);
        for cmd in self.draw_commands() {
            surface.draw(&cmd);
        }
        surface.present();
    }

    /// Number of frame intervals an animation of `duration` seconds spans.
    pub fn frame_count(&self, duration: f64) -> usize {
        (duration.max(0.0) * self.frame_rate).round() as usize
    }

    /// Steps `animation` to completion, one rendered frame per step.
    ///
    /// Frames `0..=n` are rendered with `n = round(duration · fps)`, so the
    /// first frame shows the start state and the last the end state. A
    /// zero-length animation renders its end state once. Returns the
    /// number of frames presented.
    pub fn play<S: Surface + ?Sized>(&mut self, animation: &mut Animation, surface: &mut S) -> usize {
        animation.reset();
        let total = self.frame_count(animation.duration());

        if total == 0 {
            animation.update(1.0, &mut self.objects);
            self.render_frame(surface);
            return 1;
        }

        for frame in 0..=total {
            let progress = (frame as f64 / total as f64).min(1.0);
            animation.update(progress, &mut self.objects);
            self.render_frame(surface);
        }
        total + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::vec2::Vec2;

    fn scene() -> Scene {
        Scene::new("t", CoordinateSystem::new(800.0, 600.0, 40.0), Color::WHITE, 30.0)
    }

    #[test]
    fn redefinition_replaces_in_place() {
        let mut objects = ObjectTable::default();
        let a = objects.insert("a", Shape::line(Vec2::ZERO, Vec2::new(1.0, 0.0)));
        objects.insert("b", Shape::line(Vec2::ZERO, Vec2::new(0.0, 1.0)));
        let a2 = objects.insert("a", Shape::circle(Vec2::ZERO, 1.0).unwrap());
        assert_eq!(a, a2);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects.by_name("a").map(Shape::kind_name), Some("circle"));
        let names: Vec<&str> = objects.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn play_renders_inclusive_frames() {
        let mut scene = scene();
        let id = scene.objects_mut().insert("c", Shape::circle(Vec2::ZERO, 1.0).unwrap());
        let mut anim = Animation::move_to(scene.objects(), id, Vec2::new(2.0, 0.0), 1.0).unwrap();
        let mut surface = RecordingSurface::new();
        let frames = scene.play(&mut anim, &mut surface);
        assert_eq!(frames, 31);
        assert_eq!(surface.present_count(), 31);
        assert!(anim.is_finished());
    }

    #[test]
    fn zero_duration_renders_end_state_once() {
        let mut scene = scene();
        let id = scene.objects_mut().insert("c", Shape::circle(Vec2::ZERO, 1.0).unwrap());
        let mut anim = Animation::fade_in(scene.objects(), id, 0.0).unwrap();
        let mut surface = RecordingSurface::new();
        assert_eq!(scene.play(&mut anim, &mut surface), 1);
        assert_eq!(scene.objects().get(id).unwrap().fill_opacity, 1.0);
    }

    #[test]
    fn render_frame_draws_in_order() {
        let mut scene = scene();
        scene.objects_mut().insert("a", Shape::line(Vec2::ZERO, Vec2::new(1.0, 0.0)));
        scene.objects_mut().insert("b", Shape::circle(Vec2::ZERO, 1.0).unwrap());
        let mut surface = RecordingSurface::new();
        scene.render_frame(&mut surface);
        let frame = surface.last_frame().unwrap();
        assert_eq!(frame.background, Color::WHITE);
        assert_eq!(frame.commands.len(), 2);
        assert!(!frame.commands[0].closed);
        assert!(frame.commands[1].closed);
    }
}
