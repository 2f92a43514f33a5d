//! Animations: pure functions from normalized progress to shape mutation.
//!
//! Each [`Animation`] captures whatever start state it needs when it is
//! built. `update(p, objects)` then maps `p ∈ [0, 1]` onto its target, so
//! the same `p` always yields the same state.

pub mod easing;

use crate::config::PhysicsConfig;
use crate::scene::{ObjectTable, ShapeId};
use crate::types::color::Color;
use crate::types::shape::Shape;
use crate::types::vec2::Vec2;

pub use easing::Interpolation;

/// Fixed integration step for the bounce simulation, in seconds.
pub const BOUNCE_STEP: f64 = 1.0 / 240.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElasticProperty {
    Scale,
    Opacity,
    X,
    Y,
}

impl ElasticProperty {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "scale"   => Self::Scale,
            "opacity" => Self::Opacity,
            "x"       => Self::X,
            "y"       => Self::Y,
            _ => return None,
        })
    }
}

/// Positional kinds keep the target's points and centroid from build time
/// and re-place that snapshot on every update, so a repeated `update(p)`
/// never drifts.
#[derive(Debug, Clone)]
pub enum AnimationKind {
    Move { target: ShapeId, snapshot: Vec<Vec2>, start: Vec2, end: Vec2 },
    /// Restores `snapshot` before every update so frames don't compound.
    Scale { target: ShapeId, snapshot: Vec<Vec2>, factor: f64 },
    Rotate { target: ShapeId, snapshot: Vec<Vec2>, angle: f64 },
    FadeIn { target: ShapeId },
    FadeOut { target: ShapeId, start: f64 },
    Color { target: ShapeId, start: Color, end: Color },
    Path { target: ShapeId, snapshot: Vec<Vec2>, origin: Vec2, points: Vec<Vec2> },
    Elastic {
        target: ShapeId,
        property: ElasticProperty,
        start: f64,
        end: f64,
        snapshot: Vec<Vec2>,
        origin: Vec2,
    },
    Bounce { target: ShapeId, snapshot: Vec<Vec2>, start: Vec2, physics: PhysicsConfig },
    Group(Vec<Animation>),
    Wait,
}

#[derive(Debug, Clone)]
pub struct Animation {
    kind: AnimationKind,
    duration: f64,
    interpolation: Interpolation,
    progress: f64,
    finished: bool,
}

// ─── Construction ────────────────────────────────────────────────────────────

impl Animation {
    fn new(kind: AnimationKind, duration: f64) -> Self {
        Self {
            kind,
            duration: duration.max(0.0),
            interpolation: Interpolation::default(),
            progress: 0.0,
            finished: false,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Returns `None` when `target` is not in `objects`.
    pub fn move_to(objects: &ObjectTable, target: ShapeId, end: Vec2, duration: f64) -> Option<Self> {
        let shape = objects.get(target)?;
        let kind = AnimationKind::Move { target, snapshot: shape.points.clone(), start: shape.centroid(), end };
        Some(Self::new(kind, duration))
    }

    pub fn scale(objects: &ObjectTable, target: ShapeId, factor: f64, duration: f64) -> Option<Self> {
        let snapshot = objects.get(target)?.points.clone();
        Some(Self::new(AnimationKind::Scale { target, snapshot, factor }, duration))
    }

    /// `angle` in radians, counter-clockwise.
    pub fn rotate(objects: &ObjectTable, target: ShapeId, angle: f64, duration: f64) -> Option<Self> {
        let snapshot = objects.get(target)?.points.clone();
        Some(Self::new(AnimationKind::Rotate { target, snapshot, angle }, duration))
    }

    pub fn fade_in(objects: &ObjectTable, target: ShapeId, duration: f64) -> Option<Self> {
        objects.get(target)?;
        Some(Self::new(AnimationKind::FadeIn { target }, duration))
    }

    pub fn fade_out(objects: &ObjectTable, target: ShapeId, duration: f64) -> Option<Self> {
        let start = objects.get(target)?.fill_opacity;
        Some(Self::new(AnimationKind::FadeOut { target, start }, duration))
    }

    pub fn color(objects: &ObjectTable, target: ShapeId, end: Color, duration: f64) -> Option<Self> {
        let start = objects.get(target)?.color;
        Some(Self::new(AnimationKind::Color { target, start, end }, duration))
    }

    pub fn path(objects: &ObjectTable, target: ShapeId, points: Vec<Vec2>, duration: f64) -> Option<Self> {
        let shape = objects.get(target)?;
        let kind = AnimationKind::Path { target, snapshot: shape.points.clone(), origin: shape.centroid(), points };
        Some(Self::new(kind, duration))
    }

    pub fn elastic(
        objects: &ObjectTable,
        target: ShapeId,
        property: ElasticProperty,
        end: f64,
        duration: f64,
    ) -> Option<Self> {
        let shape = objects.get(target)?;
        let origin = shape.centroid();
        let start = match property {
            ElasticProperty::Scale => 1.0,
            ElasticProperty::Opacity => shape.fill_opacity,
            ElasticProperty::X => origin.x,
            ElasticProperty::Y => origin.y,
        };
        let snapshot = shape.points.clone();
        Some(Self::new(AnimationKind::Elastic { target, property, start, end, snapshot, origin }, duration))
    }

    pub fn bounce(objects: &ObjectTable, target: ShapeId, physics: PhysicsConfig, duration: f64) -> Option<Self> {
        let shape = objects.get(target)?;
        let kind = AnimationKind::Bounce { target, snapshot: shape.points.clone(), start: shape.centroid(), physics };
        Some(Self::new(kind, duration))
    }

    /// Runs children together; lasts as long as the longest child.
    pub fn group(children: Vec<Animation>) -> Self {
        let duration = children.iter().map(Animation::duration).fold(0.0, f64::max);
        Self::new(AnimationKind::Group(children), duration)
    }

    pub fn wait(duration: f64) -> Self {
        Self::new(AnimationKind::Wait, duration)
    }
}

// ─── Playback ────────────────────────────────────────────────────────────────

impl Animation {
    pub fn kind(&self) -> &AnimationKind { &self.kind }
    pub fn duration(&self) -> f64 { self.duration }
    pub fn interpolation(&self) -> Interpolation { self.interpolation }
    pub fn progress(&self) -> f64 { self.progress }
    pub fn is_finished(&self) -> bool { self.finished }

    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.finished = false;
        if let AnimationKind::Group(children) = &mut self.kind {
            children.iter_mut().for_each(Animation::reset);
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            AnimationKind::Move { .. } => "move",
            AnimationKind::Scale { .. } => "scale",
            AnimationKind::Rotate { .. } => "rotate",
            AnimationKind::FadeIn { .. } => "fadein",
            AnimationKind::FadeOut { .. } => "fadeout",
            AnimationKind::Color { .. } => "color",
            AnimationKind::Path { .. } => "path",
            AnimationKind::Elastic { .. } => "elastic",
            AnimationKind::Bounce { .. } => "bounce",
            AnimationKind::Group(_) => "group",
            AnimationKind::Wait => "wait",
        }
    }

    /// Applies the state at `progress` (clamped to [0, 1]). Missing targets
    /// are skipped.
    pub fn update(&mut self, progress: f64, objects: &mut ObjectTable) {
        let p = progress.clamp(0.0, 1.0);
        let interpolation = self.interpolation;
        let eased = interpolation.apply(easing::smoothstep(p));
        let duration = self.duration;

        match &mut self.kind {
            AnimationKind::Move { target, snapshot, start, end } => {
                if let Some(shape) = objects.get_mut(*target) {
                    place(shape, snapshot, *start, start.lerp(*end, eased));
                }
            }
            AnimationKind::Scale { target, snapshot, factor } => {
                if let Some(shape) = objects.get_mut(*target) {
                    shape.points.clone_from(snapshot);
                    let s = easing::lerp(1.0, *factor, eased);
                    if s != 1.0 {
                        shape.scale(s);
                    }
                }
            }
            AnimationKind::Rotate { target, snapshot, angle } => {
                if let Some(shape) = objects.get_mut(*target) {
                    shape.points.clone_from(snapshot);
                    let a = easing::lerp(0.0, *angle, eased);
                    if a != 0.0 {
                        shape.rotate(a);
                    }
                }
            }
            AnimationKind::FadeIn { target } => {
                if let Some(shape) = objects.get_mut(*target) {
                    shape.set_opacity(easing::lerp(0.0, 1.0, eased));
                }
            }
            AnimationKind::FadeOut { target, start } => {
                if let Some(shape) = objects.get_mut(*target) {
                    shape.set_opacity(easing::lerp(*start, 0.0, eased));
                }
            }
            AnimationKind::Color { target, start, end } => {
                if let Some(shape) = objects.get_mut(*target) {
                    shape.color = start.lerp(*end, eased);
                }
            }
            AnimationKind::Path { target, snapshot, origin, points } => {
                if let (Some(shape), Some(pos)) = (objects.get_mut(*target), point_on_path(points, eased)) {
                    place(shape, snapshot, *origin, pos);
                }
            }
            AnimationKind::Elastic { target, property, start, end, snapshot, origin } => {
                // The strategy shapes progress before the damped sine, which
                // keeps the overshoot `apply` would otherwise clamp away.
                let v = easing::lerp(*start, *end, easing::elastic_out(interpolation.apply(p)));
                if let Some(shape) = objects.get_mut(*target) {
                    match property {
                        ElasticProperty::Scale => {
                            shape.points.clone_from(snapshot);
                            if v != 1.0 {
                                shape.scale(v);
                            }
                        }
                        ElasticProperty::Opacity => shape.set_opacity(v),
                        ElasticProperty::X => place(shape, snapshot, *origin, Vec2::new(v, origin.y)),
                        ElasticProperty::Y => place(shape, snapshot, *origin, Vec2::new(origin.x, v)),
                    }
                }
            }
            AnimationKind::Bounce { target, snapshot, start, physics } => {
                let y = simulate_bounce(start.y, physics, p * duration);
                if let Some(shape) = objects.get_mut(*target) {
                    place(shape, snapshot, *start, Vec2::new(start.x, y));
                }
            }
            AnimationKind::Group(children) => {
                for child in children.iter_mut() {
                    let local = if child.duration > 0.0 {
                        (p * duration / child.duration).min(1.0)
                    } else if p > 0.0 {
                        1.0
                    } else {
                        0.0
                    };
                    child.update(local, objects);
                }
            }
            AnimationKind::Wait => {}
        }

        self.progress = p;
        self.finished = match &self.kind {
            AnimationKind::Group(children) => children.iter().all(Animation::is_finished),
            _ => p >= 1.0,
        };
    }
}

/// Restores `snapshot` and shifts it so its centroid `origin` lands on `to`.
fn place(shape: &mut Shape, snapshot: &[Vec2], origin: Vec2, to: Vec2) {
    shape.points.clear();
    shape.points.extend_from_slice(snapshot);
    shape.translate(to - origin);
}

/// Point at arc-length fraction `t` along a polyline.
pub fn point_on_path(points: &[Vec2], t: f64) -> Option<Vec2> {
    let first = *points.first()?;
    let lengths: Vec<f64> = points.windows(2).map(|w| w[0].distance(w[1])).collect();
    let total: f64 = lengths.iter().sum();
    if total == 0.0 {
        return Some(first);
    }

    let target = t.clamp(0.0, 1.0) * total;
    let mut walked = 0.0;
    for (i, len) in lengths.iter().enumerate() {
        if walked + len >= target && *len > 0.0 {
            return Some(points[i].lerp(points[i + 1], (target - walked) / len));
        }
        walked += len;
    }
    points.last().copied()
}

/// Height of a ball dropped from rest at `start_y` after `elapsed` seconds,
/// integrated with a fixed step so the result depends only on `elapsed`.
pub fn simulate_bounce(start_y: f64, physics: &PhysicsConfig, elapsed: f64) -> f64 {
    let mut y = start_y;
    let mut vy = 0.0;
    let mut remaining = elapsed.max(0.0);

    while remaining > 0.0 {
        let dt = remaining.min(BOUNCE_STEP);
        remaining -= dt;

        vy += physics.gravity * dt;
        y += vy * dt;

        if y <= physics.ground {
            y = physics.ground;
            vy = -vy * physics.elasticity;
            if vy.abs() < physics.rest_speed {
                break;
            }
        }
    }
    y
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(shape: Shape) -> (ObjectTable, ShapeId) {
        let mut objects = ObjectTable::default();
        let id = objects.insert("s", shape);
        (objects, id)
    }

    fn square() -> Shape {
        Shape::rectangle(Vec2::new(1.0, 1.0), 2.0, 2.0).unwrap()
    }

    #[test]
    fn scale_snapshot_does_not_compound() {
        let (mut objects, id) = table_with(square());
        let mut anim = Animation::scale(&objects, id, 2.0, 1.0).unwrap();
        anim.update(1.0, &mut objects);
        anim.update(1.0, &mut objects);
        assert_eq!(objects.get(id).unwrap().rect_size(), Some((4.0, 4.0)));
    }

    #[test]
    fn scale_at_zero_is_exact() {
        let (mut objects, id) = table_with(square());
        let before = objects.get(id).unwrap().clone();
        let mut anim = Animation::scale(&objects, id, 3.0, 1.0).unwrap();
        anim.update(0.7, &mut objects);
        anim.update(0.0, &mut objects);
        assert_eq!(objects.get(id).unwrap(), &before);
    }

    #[test]
    fn rotate_half_turn() {
        let (mut objects, id) = table_with(Shape::line(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0)));
        let mut anim = Animation::rotate(&objects, id, std::f64::consts::PI, 1.0).unwrap();
        anim.update(1.0, &mut objects);
        let pts = &objects.get(id).unwrap().points;
        assert!(pts[0].approx_eq(Vec2::new(1.0, 0.0), 1e-12));
    }

    #[test]
    fn fade_out_starts_from_current_opacity() {
        let mut s = square();
        s.fill_opacity = 0.6;
        let (mut objects, id) = table_with(s);
        let mut anim = Animation::fade_out(&objects, id, 1.0).unwrap();
        anim.update(0.0, &mut objects);
        assert_eq!(objects.get(id).unwrap().fill_opacity, 0.6);
        anim.update(1.0, &mut objects);
        assert_eq!(objects.get(id).unwrap().fill_opacity, 0.0);
    }

    #[test]
    fn color_endpoints() {
        let (mut objects, id) = table_with(square());
        let mut anim = Animation::color(&objects, id, Color::rgb(255, 0, 0), 1.0).unwrap();
        anim.update(0.0, &mut objects);
        assert_eq!(objects.get(id).unwrap().color, Color::BLACK);
        anim.update(1.0, &mut objects);
        assert_eq!(objects.get(id).unwrap().color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn path_arc_length() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(3.0, 1.0)];
        assert_eq!(point_on_path(&pts, 0.0), Some(Vec2::new(0.0, 0.0)));
        assert!(point_on_path(&pts, 0.5).unwrap().approx_eq(Vec2::new(2.0, 0.0), 1e-12));
        assert_eq!(point_on_path(&pts, 1.0), Some(Vec2::new(3.0, 1.0)));
    }

    #[test]
    fn path_degenerate_cases() {
        assert_eq!(point_on_path(&[], 0.5), None);
        let same = [Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0)];
        assert_eq!(point_on_path(&same, 0.5), Some(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn elastic_scale_uses_snapshot() {
        let (mut objects, id) = table_with(square());
        let mut anim = Animation::elastic(&objects, id, ElasticProperty::Scale, 2.0, 1.0).unwrap();
        for _ in 0..3 {
            anim.update(1.0, &mut objects);
        }
        assert_eq!(objects.get(id).unwrap().rect_size(), Some((4.0, 4.0)));
    }

    #[test]
    fn bounce_settles_on_ground() {
        let physics = PhysicsConfig::default();
        let y = simulate_bounce(2.0, &physics, 60.0);
        assert_eq!(y, physics.ground);
        assert_eq!(simulate_bounce(2.0, &physics, 0.0), 2.0);
    }

    #[test]
    fn bounce_is_deterministic() {
        let physics = PhysicsConfig::default();
        let a = simulate_bounce(3.0, &physics, 0.8);
        let b = simulate_bounce(3.0, &physics, 0.8);
        assert_eq!(a, b);
        assert!(a < 3.0);
    }

    #[test]
    fn group_scales_child_progress() {
        let (mut objects, id) = table_with(square());
        let short = Animation::fade_in(&objects, id, 1.0).unwrap();
        let long = Animation::wait(2.0);
        let mut group = Animation::group(vec![short, long]);
        assert_eq!(group.duration(), 2.0);

        group.update(0.5, &mut objects);
        assert_eq!(objects.get(id).unwrap().fill_opacity, 1.0);
        assert!(!group.is_finished());

        group.update(1.0, &mut objects);
        assert!(group.is_finished());
    }

    #[test]
    fn reset_clears_state() {
        let mut w = Animation::wait(1.0);
        let mut objects = ObjectTable::default();
        w.update(1.0, &mut objects);
        assert!(w.is_finished());
        w.reset();
        assert!(!w.is_finished());
        assert_eq!(w.progress(), 0.0);
    }

    // ─── Every kind × every strategy ───

    const KINDS: [&str; 10] =
        ["move", "scale", "rotate", "fadein", "fadeout", "color", "path", "elastic", "bounce", "group"];

    const STRATEGIES: [Interpolation; 7] = [
        Interpolation::Linear,
        Interpolation::Smooth,
        Interpolation::EaseIn,
        Interpolation::EaseOut,
        Interpolation::EaseInOut,
        Interpolation::Elastic,
        Interpolation::Bounce,
    ];

    const RED: Color = Color::rgb(200, 40, 10);

    fn half_opaque_square() -> Shape {
        let mut s = square();
        s.fill_opacity = 0.5;
        s
    }

    fn build(kind: &str, objects: &ObjectTable, id: ShapeId) -> Animation {
        let anim = match kind {
            "move" => Animation::move_to(objects, id, Vec2::new(4.0, -2.0), 1.0),
            "scale" => Animation::scale(objects, id, 2.5, 1.0),
            "rotate" => Animation::rotate(objects, id, 1.2, 1.0),
            "fadein" => Animation::fade_in(objects, id, 1.0),
            "fadeout" => Animation::fade_out(objects, id, 1.0),
            "color" => Animation::color(objects, id, RED, 1.0),
            "path" => {
                let points = vec![Vec2::new(-1.0, 0.5), Vec2::new(2.0, 0.5), Vec2::new(2.0, 3.0)];
                Animation::path(objects, id, points, 1.0)
            }
            "elastic" => Animation::elastic(objects, id, ElasticProperty::X, 5.0, 1.0),
            "bounce" => Animation::bounce(objects, id, PhysicsConfig::default(), 1.0),
            "group" => Some(Animation::group(vec![
                Animation::move_to(objects, id, Vec2::new(-3.0, 0.0), 2.0).unwrap(),
                Animation::color(objects, id, RED, 0.0).unwrap(),
            ])),
            other => panic!("no such kind {other}"),
        };
        anim.unwrap()
    }

    fn assert_end_state(kind: &str, before: &Shape, after: &Shape) {
        let at = |x: f64, y: f64| {
            assert!(after.centroid().approx_eq(Vec2::new(x, y), 1e-9), "{kind}: centroid {:?}", after.centroid());
        };
        match kind {
            "move" => at(4.0, -2.0),
            "scale" => {
                let mut expected = before.clone();
                expected.scale(2.5);
                assert_eq!(after, &expected);
            }
            "rotate" => {
                let mut expected = before.clone();
                expected.rotate(1.2);
                assert_eq!(after, &expected);
            }
            "fadein" => assert_eq!(after.fill_opacity, 1.0),
            "fadeout" => assert_eq!(after.fill_opacity, 0.0),
            "color" => assert_eq!(after.color, RED),
            "path" => at(2.0, 3.0),
            "elastic" => at(5.0, 1.0),
            "bounce" => at(1.0, simulate_bounce(1.0, &PhysicsConfig::default(), 1.0)),
            "group" => {
                at(-3.0, 0.0);
                assert_eq!(after.color, RED);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn start_state_is_exact_for_every_strategy() {
        for kind in KINDS {
            for strategy in STRATEGIES {
                let (mut objects, id) = table_with(half_opaque_square());
                let before = objects.get(id).unwrap().clone();
                let mut anim = build(kind, &objects, id).with_interpolation(strategy);
                anim.update(0.0, &mut objects);
                let after = objects.get(id).unwrap();
                match kind {
                    "fadein" => {
                        assert_eq!(after.fill_opacity, 0.0);
                        assert_eq!(after.points, before.points);
                    }
                    // a path starts on its first point
                    "path" => assert!(after.centroid().approx_eq(Vec2::new(-1.0, 0.5), 1e-9)),
                    _ => assert_eq!(after, &before, "{kind} {strategy:?}"),
                }
            }
        }
    }

    #[test]
    fn end_state_is_exact_for_every_strategy() {
        for kind in KINDS {
            for strategy in STRATEGIES {
                let (mut objects, id) = table_with(half_opaque_square());
                let before = objects.get(id).unwrap().clone();
                let mut anim = build(kind, &objects, id).with_interpolation(strategy);
                anim.update(0.6, &mut objects);
                anim.update(1.0, &mut objects);
                assert!(anim.is_finished(), "{kind} {strategy:?}");
                assert_end_state(kind, &before, objects.get(id).unwrap());
            }
        }
    }

    #[test]
    fn repeated_update_is_idempotent() {
        for kind in KINDS {
            for strategy in STRATEGIES {
                let (mut objects, id) = table_with(half_opaque_square());
                let mut anim = build(kind, &objects, id).with_interpolation(strategy);
                anim.update(0.37, &mut objects);
                let once = objects.get(id).unwrap().clone();
                anim.update(0.37, &mut objects);
                assert_eq!(objects.get(id).unwrap(), &once, "{kind} {strategy:?}");
            }
        }
    }

    #[test]
    fn elastic_follows_the_chosen_strategy() {
        let x_at = |strategy: Interpolation| {
            let (mut objects, id) = table_with(square());
            let mut anim = Animation::elastic(&objects, id, ElasticProperty::X, 10.0, 1.0)
                .unwrap()
                .with_interpolation(strategy);
            anim.update(0.3, &mut objects);
            objects.get(id).unwrap().centroid().x
        };
        let linear = x_at(Interpolation::Linear);
        assert!((linear - easing::lerp(1.0, 10.0, easing::elastic_out(0.3))).abs() < 1e-9);
        assert_ne!(linear, x_at(Interpolation::EaseIn));
    }

    #[test]
    fn zero_length_child_waits_for_group_start() {
        let (mut objects, id) = table_with(square());
        let flash = Animation::color(&objects, id, RED, 0.0).unwrap();
        let mut group = Animation::group(vec![flash, Animation::wait(1.0)]);

        group.update(0.0, &mut objects);
        assert_eq!(objects.get(id).unwrap().color, Color::BLACK);
        group.update(0.1, &mut objects);
        assert_eq!(objects.get(id).unwrap().color, RED);
    }

    #[test]
    fn missing_target_is_skipped() {
        let (objects, id) = table_with(square());
        let mut anim = Animation::fade_in(&objects, id, 1.0).unwrap();
        let mut empty = ObjectTable::default();
        anim.update(1.0, &mut empty);
        assert!(anim.is_finished());
    }
}
