//! Tree-walking evaluator. Executes a parsed program statement by statement
//! against one active scene, a rendering [`Surface`] and a [`Host`].
//!
//! Execution stops at the first failing statement. Mutations and frames
//! produced before it are kept.

use std::path::{Path, PathBuf};

use crate::animation::{Animation, ElasticProperty, Interpolation};
use crate::config::EngineConfig;
use crate::error::RuntimeError;
use crate::runtime::host::Host;
use crate::runtime::value::Value;
use crate::scene::{CoordinateSystem, Scene, ShapeId, Surface};
use crate::syntax::ast::{AnimateStmt, AnimationKindName, Expr, ObjectKind, Program, Property, Stmt};
use crate::types::color::Color;
use crate::types::shape::{DEFAULT_FONT_SIZE, Shape, ShapeKind};
use crate::types::vec2::Vec2;

pub struct Evaluator<S: Surface, H: Host> {
    config: EngineConfig,
    surface: S,
    host: H,
    scene: Option<Scene>,
    diagnostics: Vec<String>,
}

impl<S: Surface, H: Host> Evaluator<S, H> {
    pub fn new(surface: S, host: H) -> Self {
        Self { config: EngineConfig::default(), surface, host, scene: None, diagnostics: Vec::new() }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn diagnostics(&self) -> &[String] { &self.diagnostics }
    pub fn surface(&self) -> &S { &self.surface }
    pub fn surface_mut(&mut self) -> &mut S { &mut self.surface }
    pub fn host(&self) -> &H { &self.host }
    pub fn scene(&self) -> Option<&Scene> { self.scene.as_ref() }

    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.scene.as_ref().and_then(|s| s.objects().by_name(name))
    }

    pub fn into_parts(self) -> (S, H) {
        (self.surface, self.host)
    }

    /// Runs every statement in order. The first error is recorded in
    /// [`diagnostics`](Self::diagnostics) and returned.
    pub fn evaluate(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let result = self.exec_block(&program.statements);
        if let Err(e) = &result {
            tracing::debug!(line = e.line, error = %e.message, "script halted");
            self.diagnostics.push(e.to_string());
        }
        result
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        let line = stmt.span().line;
        match stmt {
            Stmt::Scene { width, height, name, .. } => self.exec_scene(width, height, name, line),
            Stmt::Create { kind, name, params, .. } => self.exec_create(*kind, name, params, line),
            Stmt::Set { target, property, value, .. } => self.exec_set(target, *property, value, line),
            Stmt::Animate(anim) => self.exec_animate(anim, line),
            Stmt::Render { .. } => self.exec_render(1, line),
            Stmt::RenderFrames { count, .. } => {
                let count = count_of(&eval(count, line)?, "render count", line)?;
                self.exec_render(count, line)
            }
            Stmt::Save { name, .. } => self.exec_save(name, line),
            Stmt::Export { name, fps, duration, .. } => {
                let fps = match fps {
                    Some(e) => number(e, "export fps", line)?,
                    None => self.config.export_fps,
                };
                let duration = match duration {
                    Some(e) => number(e, "export duration", line)?,
                    None => self.config.export_duration,
                };
                self.exec_sequence(name, fps, duration, line)
            }
            Stmt::Video { name, fps, duration, .. } => {
                let fps = number(fps, "video fps", line)?;
                let duration = number(duration, "video duration", line)?;
                self.exec_sequence(name, fps, duration, line)
            }
            Stmt::Wait { seconds, .. } => self.exec_wait(seconds, line),
            Stmt::Loop { count, body, .. } => {
                let count = count_of(&eval(count, line)?, "loop count", line)?;
                tracing::debug!(count, line, "loop");
                for _ in 0..count {
                    self.exec_block(body)?;
                }
                Ok(())
            }
            Stmt::Clean { dirs, .. } => self.exec_clean(dirs.as_ref(), line),
        }
    }

    // ─── Scene ────────────────────────────────────────────────────────────────

    fn exec_scene(&mut self, width: &Expr, height: &Expr, name: &Expr, line: usize) -> Result<(), RuntimeError> {
        let mut w = number(width, "scene width", line)?;
        let mut h = number(height, "scene height", line)?;
        if w <= 0.0 || h <= 0.0 {
            tracing::debug!(w, h, "non-positive scene size, using defaults");
            w = self.config.default_width;
            h = self.config.default_height;
        }
        let name = text(name, "scene name", line)?;
        let background = Color::parse(&self.config.background).map_err(|e| err(line, format!("background: {e}")))?;

        let mut coords = CoordinateSystem::new(w, h, self.config.fixed_scale);
        coords.set_auto_fit(self.config.auto_fit);

        if let Some(old) = &self.scene {
            tracing::debug!(scene = %old.name, discarded = old.objects().len(), "replacing scene");
        }
        tracing::info!(scene = %name, width = w, height = h, "scene created");

        self.surface.resize(w.round() as u32, h.round() as u32);
        self.scene = Some(Scene::new(name, coords, background, self.config.frame_rate));
        Ok(())
    }

    fn scene_mut(&mut self, line: usize) -> Result<&mut Scene, RuntimeError> {
        self.scene.as_mut().ok_or_else(|| no_scene(line))
    }

    fn target(&self, name: &str, line: usize) -> Result<ShapeId, RuntimeError> {
        let scene = self.scene.as_ref().ok_or_else(|| no_scene(line))?;
        scene.objects().id(name).ok_or_else(|| err(line, format!("unknown object `{name}`")))
    }

    // ─── create ───────────────────────────────────────────────────────────────

    fn exec_create(&mut self, kind: ObjectKind, name: &str, params: &[Expr], line: usize) -> Result<(), RuntimeError> {
        let args: Vec<Value> = params.iter().map(|p| eval(p, line)).collect::<Result<_, _>>()?;
        let shape = build_shape(kind, &args).map_err(|e| err(line, format!("failed to create `{name}`: {e}")))?;

        let scene = self.scene_mut(line)?;
        let replaced = scene.objects().id(name).is_some();
        scene.objects_mut().insert(name, shape);
        tracing::debug!(object = name, kind = ?kind, replaced, "object created");
        Ok(())
    }

    // ─── set ──────────────────────────────────────────────────────────────────

    fn exec_set(&mut self, target: &str, property: Property, value: &Expr, line: usize) -> Result<(), RuntimeError> {
        let id = self.target(target, line)?;
        let value = eval(value, line)?;
        let scene = self.scene_mut(line)?;
        let Some(shape) = scene.objects_mut().get_mut(id) else {
            return Err(err(line, format!("unknown object `{target}`")));
        };

        let unsupported = |shape: &Shape| {
            err(line, format!("property `{}` is not supported by {} `{target}`", property.name(), shape.kind_name()))
        };
        let invalid = |reason: String| err(line, format!("`{target}.{}`: {reason}", property.name()));

        match property {
            Property::Color => shape.color = value.to_color().map_err(invalid)?,
            Property::Position => {
                let p = expect_point(&value).map_err(invalid)?;
                shape.move_to(p);
            }
            Property::Opacity => {
                let o = expect_number(&value).map_err(invalid)?;
                if !(0.0..=1.0).contains(&o) {
                    return Err(invalid(format!("opacity must be within [0, 1], got {o}")));
                }
                shape.set_opacity(o);
            }
            Property::Size => match shape.kind {
                ShapeKind::Circle => {
                    let r = expect_number(&value).map_err(invalid)?;
                    shape.set_radius(r).map_err(invalid)?;
                }
                ShapeKind::Text(_) => {
                    let size = value.to_font_size().map_err(invalid)?;
                    shape.set_font_size(size).map_err(invalid)?;
                }
                _ => return Err(unsupported(shape)),
            },
            Property::Width | Property::Height => {
                let Some((w, h)) = shape.rect_size() else {
                    return Err(unsupported(shape));
                };
                let v = expect_number(&value).map_err(invalid)?;
                let (w, h) = if property == Property::Width { (v, h) } else { (w, v) };
                shape.set_rect_size(w, h).map_err(invalid)?;
            }
            Property::Vertex(index) => {
                if !matches!(shape.kind, ShapeKind::Triangle) {
                    return Err(unsupported(shape));
                }
                let p = expect_point(&value).map_err(invalid)?;
                shape.set_vertex(index, p).map_err(invalid)?;
            }
            Property::Vertices => {
                if !matches!(shape.kind, ShapeKind::Triangle) {
                    return Err(unsupported(shape));
                }
                let points = value.as_points().ok_or_else(|| {
                    invalid(format!("expected an array of coordinates, got {}", value.type_name()))
                })?;
                let vertices: [Vec2; 3] = points.try_into().map_err(|p: Vec<Vec2>| {
                    invalid(format!("triangle needs exactly 3 vertices, got {}", p.len()))
                })?;
                shape.set_vertices(vertices).map_err(invalid)?;
            }
        }
        Ok(())
    }

    // ─── animate / wait ───────────────────────────────────────────────────────

    fn exec_animate(&mut self, stmt: &AnimateStmt, line: usize) -> Result<(), RuntimeError> {
        let id = self.target(&stmt.target, line)?;
        let duration = number(&stmt.duration, "animation duration", line)?;
        if duration < 0.0 {
            return Err(err(line, format!("animation duration must not be negative, got {duration}")));
        }
        let interpolation = match &stmt.easing {
            Some(name) => Interpolation::from_name(name).ok_or_else(|| err(line, format!("unknown easing `{name}`")))?,
            None => Interpolation::default(),
        };
        let args: Vec<Value> = stmt.params.iter().map(|p| eval(p, line)).collect::<Result<_, _>>()?;
        let physics = self.config.physics;

        let Some(scene) = self.scene.as_mut() else {
            return Err(no_scene(line));
        };
        scene.refit();

        let objects = scene.objects();
        let bad = |e: String| err(line, format!("animate {} `{}`: {e}", kind_label(stmt.kind), stmt.target));
        let anim = match stmt.kind {
            AnimationKindName::Move => {
                let [end] = arity::<1>(&args).map_err(bad)?;
                Animation::move_to(objects, id, expect_point(end).map_err(bad)?, duration)
            }
            AnimationKindName::Scale => {
                let [factor] = arity::<1>(&args).map_err(bad)?;
                Animation::scale(objects, id, expect_number(factor).map_err(bad)?, duration)
            }
            AnimationKindName::Rotate => {
                let [angle] = arity::<1>(&args).map_err(bad)?;
                Animation::rotate(objects, id, expect_number(angle).map_err(bad)?, duration)
            }
            AnimationKindName::FadeIn => {
                arity::<0>(&args).map_err(bad)?;
                Animation::fade_in(objects, id, duration)
            }
            AnimationKindName::FadeOut => {
                arity::<0>(&args).map_err(bad)?;
                Animation::fade_out(objects, id, duration)
            }
            AnimationKindName::Color => {
                let [color] = arity::<1>(&args).map_err(bad)?;
                Animation::color(objects, id, color.to_color().map_err(bad)?, duration)
            }
            AnimationKindName::Path => {
                let [path] = arity::<1>(&args).map_err(bad)?;
                let points = path.as_points().filter(|p| !p.is_empty()).ok_or_else(|| {
                    bad(format!("expected a non-empty array of coordinates, got {}", path.type_name()))
                })?;
                Animation::path(objects, id, points, duration)
            }
            AnimationKindName::Elastic => {
                let [property, value] = arity::<2>(&args).map_err(bad)?;
                let name = property.as_text().unwrap_or_default();
                let property = ElasticProperty::from_name(name)
                    .ok_or_else(|| bad(format!("unknown elastic property `{name}`, expected scale, opacity, x or y")))?;
                Animation::elastic(objects, id, property, expect_number(value).map_err(bad)?, duration)
            }
            AnimationKindName::Bounce => {
                arity::<0>(&args).map_err(bad)?;
                Animation::bounce(objects, id, physics, duration)
            }
        };
        let mut anim = anim
            .ok_or_else(|| err(line, format!("unknown object `{}`", stmt.target)))?
            .with_interpolation(interpolation);

        tracing::debug!(
            kind = anim.kind_name(),
            target = %stmt.target,
            frames = scene.frame_count(duration) + 1,
            "animation start"
        );
        scene.play(&mut anim, &mut self.surface);
        Ok(())
    }

    fn exec_wait(&mut self, seconds: &Expr, line: usize) -> Result<(), RuntimeError> {
        let seconds = number(seconds, "wait duration", line)?;
        if seconds < 0.0 {
            return Err(err(line, format!("wait duration must not be negative, got {seconds}")));
        }
        match self.scene.as_mut() {
            Some(scene) => {
                let mut pause = Animation::wait(seconds);
                scene.play(&mut pause, &mut self.surface);
            }
            None => tracing::debug!(seconds, "wait without a scene"),
        }
        Ok(())
    }

    // ─── Output ───────────────────────────────────────────────────────────────

    fn exec_render(&mut self, count: usize, line: usize) -> Result<(), RuntimeError> {
        let Some(scene) = self.scene.as_mut() else {
            return Err(no_scene(line));
        };
        scene.refit();
        for _ in 0..count {
            scene.render_frame(&mut self.surface);
        }
        Ok(())
    }

    fn project_dir(&self, line: usize) -> Result<PathBuf, RuntimeError> {
        let scene = self.scene.as_ref().ok_or_else(|| no_scene(line))?;
        Ok(Path::new(&self.config.output_dir).join(&scene.name))
    }

    fn exec_save(&mut self, name: &Expr, line: usize) -> Result<(), RuntimeError> {
        let dir = self.project_dir(line)?.join("frames");
        let mut file = text(name, "file name", line)?;
        if !file.ends_with(".png") {
            file.push_str(".png");
        }
        self.host.create_dir_all(&dir).map_err(|e| err(line, e.to_string()))?;
        let path = dir.join(file);
        self.surface.save_frame(&path).map_err(|e| err(line, e.to_string()))?;
        tracing::debug!(path = %path.display(), "frame saved");
        Ok(())
    }

    /// Renders `round(fps · duration)` frames of the current scene into a
    /// frame directory and hands it to the transcoder. A missing or failing
    /// transcoder only warns; the frames stay on disk.
    fn exec_sequence(&mut self, name: &Expr, fps: f64, duration: f64, line: usize) -> Result<(), RuntimeError> {
        if fps <= 0.0 {
            return Err(err(line, format!("fps must be positive, got {fps}")));
        }
        if duration < 0.0 {
            return Err(err(line, format!("duration must not be negative, got {duration}")));
        }
        let project = self.project_dir(line)?;
        let file = text(name, "video name", line)?;
        let stem = file.strip_suffix(".mp4").unwrap_or(&file);
        let frames_dir = project.join(format!("{stem}_frames"));
        let output = project.join(format!("{stem}.mp4"));
        let total = (fps * duration).round() as usize;

        tracing::info!(output = %output.display(), fps, duration, frames = total, "export started");
        self.host.create_dir_all(&frames_dir).map_err(|e| err(line, e.to_string()))?;

        let Some(scene) = self.scene.as_mut() else {
            return Err(no_scene(line));
        };
        scene.refit();
        for frame in 0..total {
            scene.render_frame(&mut self.surface);
            let path = frames_dir.join(format!("frame_{frame:04}.png"));
            self.surface
                .save_frame(&path)
                .map_err(|e| err(line, format!("frame {frame}: {e}")))?;
        }

        match self.host.transcode(&frames_dir, fps, &output) {
            Ok(()) => {
                if let Err(e) = self.host.remove_dir(&frames_dir) {
                    tracing::warn!(error = %e, "could not remove frame directory");
                }
                tracing::info!(output = %output.display(), "export finished");
            }
            Err(e) => {
                tracing::warn!(error = %e, frames = %frames_dir.display(), "transcoding skipped, frames kept");
            }
        }
        Ok(())
    }

    fn exec_clean(&mut self, dirs: Option<&Expr>, line: usize) -> Result<(), RuntimeError> {
        let dirs: Vec<String> = match dirs {
            None => self.config.clean_dirs.clone(),
            Some(expr) => match eval(expr, line)? {
                Value::List(items) => items
                    .iter()
                    .map(|v| v.as_text().map(str::to_string).ok_or_else(|| {
                        err(line, format!("directory names must be strings, got {}", v.type_name()))
                    }))
                    .collect::<Result<_, _>>()?,
                Value::Str(s) => vec![s],
                other => return Err(err(line, format!("expected a list of directories, got {}", other.type_name()))),
            },
        };

        if let Some(bad) = dirs.iter().find(|d| d.is_empty() || d.contains("..") || d.contains('/') || d.contains('\\')) {
            return Err(err(line, format!("illegal directory path `{bad}`")));
        }
        for dir in &dirs {
            self.host.clean_dir(Path::new(dir)).map_err(|e| err(line, e.to_string()))?;
            tracing::info!(dir = %dir, "directory cleaned");
        }
        Ok(())
    }
}

// ─── Shape construction ──────────────────────────────────────────────────────

/// Matches loosely ordered `create` arguments against the forms each kind
/// accepts, in a fixed priority.
fn build_shape(kind: ObjectKind, args: &[Value]) -> Result<Shape, String> {
    use Value::{Number, Point};

    match kind {
        ObjectKind::Circle => match args {
            [Number(r)] => Shape::circle(Vec2::ZERO, *r),
            [Number(r), Point(c)] | [Point(c), Number(r)] => Shape::circle(*c, *r),
            _ => Err(usage("circle", "radius [(x, y)]` or `(x, y) radius", args)),
        },
        ObjectKind::Rectangle => match args {
            [Number(w), Number(h)] => Shape::rectangle(Vec2::ZERO, *w, *h),
            [Number(w), Number(h), Point(c)] | [Point(c), Number(w), Number(h)] => Shape::rectangle(*c, *w, *h),
            _ => Err(usage("rectangle", "width height [(x, y)]", args)),
        },
        ObjectKind::Line => match args {
            [Point(a), Point(b)] => Ok(Shape::line(*a, *b)),
            _ => Err(usage("line", "(x1, y1) (x2, y2)", args)),
        },
        ObjectKind::Arrow => match args {
            [Point(a), Point(b)] => Ok(Shape::arrow(*a, *b)),
            _ => Err(usage("arrow", "(x1, y1) (x2, y2)", args)),
        },
        ObjectKind::Polygon => match args {
            [list @ Value::List(_)] => {
                let points = list.as_points().ok_or("polygon vertices must all be coordinates")?;
                Shape::polygon(&points)
            }
            _ => Err(usage("polygon", "[(x, y), ...]", args)),
        },
        ObjectKind::Text => {
            let Some((content, rest)) = args.split_first() else {
                return Err(usage("text", "\"content\" [size] [(x, y)]", args));
            };
            let Value::Str(content) = content else {
                return Err(format!("text content must be a string, got {}", content.type_name()));
            };
            let (size, pos) = match rest {
                [] => (DEFAULT_FONT_SIZE, Vec2::ZERO),
                [Point(p)] => (DEFAULT_FONT_SIZE, *p),
                [size] => (size.to_font_size()?, Vec2::ZERO),
                [size, Point(p)] => (size.to_font_size()?, *p),
                _ => return Err(usage("text", "\"content\" [size] [(x, y)]", args)),
            };
            Shape::text(content.clone(), size, pos)
        }
        ObjectKind::Triangle => build_triangle(args),
    }
}

fn build_triangle(args: &[Value]) -> Result<Shape, String> {
    use Value::{Number, Point};

    let center = |rest: &[Value]| -> Result<Vec2, String> {
        match rest {
            [] => Ok(Vec2::ZERO),
            [Point(p)] => Ok(*p),
            _ => Err(usage("triangle", "... [(x, y)]", rest)),
        }
    };

    match args {
        [Point(a), Point(b), Point(c)] => Ok(Shape::triangle(*a, *b, *c)),
        [Number(size), rest @ ..] => Shape::isosceles_triangle(*size, center(rest)?),
        [form @ (Value::Str(_) | Value::Ident(_)), rest @ ..] => {
            let form = form.as_text().unwrap_or_default().to_ascii_lowercase();
            match (form.as_str(), rest) {
                ("equilateral", [Number(side), rest @ ..]) => Shape::equilateral_triangle(*side, center(rest)?),
                ("isosceles", [Number(size), rest @ ..]) => Shape::isosceles_triangle(*size, center(rest)?),
                ("right", [Number(w), Number(h), rest @ ..]) => Shape::right_triangle(*w, *h, center(rest)?),
                ("equilateral" | "isosceles", _) => Err(format!("{form} triangle needs a size")),
                ("right", _) => Err("right triangle needs a width and a height".into()),
                _ => Err(format!("unknown triangle type `{form}`, expected equilateral, right or isosceles")),
            }
        }
        _ => Err(usage("triangle", "(x1, y1) (x2, y2) (x3, y3)` or `size [(x, y)]", args)),
    }
}

fn usage(kind: &str, form: &str, args: &[Value]) -> String {
    let got: Vec<&str> = args.iter().map(Value::type_name).collect();
    format!("{kind} expects `{form}`, got ({})", got.join(", "))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn err(line: usize, msg: impl Into<String>) -> RuntimeError {
    RuntimeError::new(line, msg)
}

fn no_scene(line: usize) -> RuntimeError {
    err(line, "no scene defined")
}

fn eval(expr: &Expr, line: usize) -> Result<Value, RuntimeError> {
    Value::from_expr(expr).map_err(|e| err(line, e))
}

fn number(expr: &Expr, what: &str, line: usize) -> Result<f64, RuntimeError> {
    expect_number(&eval(expr, line)?).map_err(|e| err(line, format!("{what}: {e}")))
}

fn text(expr: &Expr, what: &str, line: usize) -> Result<String, RuntimeError> {
    let value = eval(expr, line)?;
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| err(line, format!("{what}: expected a string, got {}", value.type_name())))
}

fn expect_number(value: &Value) -> Result<f64, String> {
    value.as_number().ok_or_else(|| format!("expected a number, got {}", value.type_name()))
}

fn expect_point(value: &Value) -> Result<Vec2, String> {
    value.as_point().ok_or_else(|| format!("expected a coordinate (x, y), got {}", value.type_name()))
}

/// A non-negative whole number.
fn count_of(value: &Value, what: &str, line: usize) -> Result<usize, RuntimeError> {
    let n = expect_number(value).map_err(|e| err(line, format!("{what}: {e}")))?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(err(line, format!("{what} must be a non-negative whole number, got {n}")));
    }
    Ok(n as usize)
}

fn arity<const N: usize>(args: &[Value]) -> Result<&[Value; N], String> {
    args.try_into().map_err(|_| format!("expected {N} parameter(s), got {}", args.len()))
}

fn kind_label(kind: AnimationKindName) -> &'static str {
    match kind {
        AnimationKindName::Move => "move",
        AnimationKindName::Scale => "scale",
        AnimationKindName::Rotate => "rotate",
        AnimationKindName::FadeIn => "fadein",
        AnimationKindName::FadeOut => "fadeout",
        AnimationKindName::Color => "color",
        AnimationKindName::Path => "path",
        AnimationKindName::Elastic => "elastic",
        AnimationKindName::Bounce => "bounce",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::host::RecordingHost;
    use crate::scene::RecordingSurface;

    fn run(src: &str) -> (Evaluator<RecordingSurface, RecordingHost>, Result<(), RuntimeError>) {
        let program = crate::compile(src).expect("script should parse");
        let mut ev = Evaluator::new(RecordingSurface::new(), RecordingHost::new());
        let result = ev.evaluate(&program);
        (ev, result)
    }

    fn pt(x: f64, y: f64) -> Value {
        Value::Point(Vec2::new(x, y))
    }

    #[test]
    fn circle_accepts_both_orders() {
        let a = build_shape(ObjectKind::Circle, &[Value::Number(2.0), pt(1.0, 1.0)]).unwrap();
        let b = build_shape(ObjectKind::Circle, &[pt(1.0, 1.0), Value::Number(2.0)]).unwrap();
        assert_eq!(a, b);
        assert!(a.centroid().approx_eq(Vec2::new(1.0, 1.0), 1e-9));
    }

    #[test]
    fn circle_rejects_non_positive_radius() {
        assert!(build_shape(ObjectKind::Circle, &[Value::Number(0.0)]).is_err());
    }

    #[test]
    fn usage_lists_argument_types() {
        let e = build_shape(ObjectKind::Line, &[pt(0.0, 0.0)]).unwrap_err();
        assert!(e.contains("got (coordinate)"), "{e}");
    }

    #[test]
    fn text_forms() {
        let t = build_shape(ObjectKind::Text, &[Value::Str("hi".into()), Value::Ident("large".into()), pt(1.0, 2.0)]).unwrap();
        assert_eq!(t.text_run().map(|r| r.font_size), Some(20.0));
        assert!(t.centroid().approx_eq(Vec2::new(1.0, 2.0), 1e-9));
        let plain = build_shape(ObjectKind::Text, &[Value::Str("hi".into())]).unwrap();
        assert_eq!(plain.text_run().map(|r| r.font_size), Some(DEFAULT_FONT_SIZE));
        assert!(build_shape(ObjectKind::Text, &[Value::Number(1.0)]).is_err());
    }

    #[test]
    fn triangle_forms() {
        let three = build_triangle(&[pt(0.0, 0.0), pt(1.0, 0.0), pt(0.0, 1.0)]).unwrap();
        assert_eq!(three.vertices(), Some([Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]));
        assert!(build_triangle(&[Value::Number(2.0)]).is_ok());
        assert!(build_triangle(&[Value::Str("equilateral".into()), Value::Number(2.0), pt(1.0, 1.0)]).is_ok());
        assert!(build_triangle(&[Value::Ident("right".into()), Value::Number(3.0), Value::Number(4.0)]).is_ok());
        assert!(build_triangle(&[Value::Str("right".into()), Value::Number(3.0)]).is_err());
        assert!(build_triangle(&[Value::Str("scalene".into()), Value::Number(3.0)]).unwrap_err().contains("scalene"));
    }

    #[test]
    fn statements_before_a_scene_fail() {
        let (ev, result) = run("create circle c 1");
        assert_eq!(result.unwrap_err().message, "no scene defined");
        assert_eq!(ev.diagnostics().len(), 1);
    }

    #[test]
    fn non_positive_scene_size_uses_defaults() {
        let (ev, result) = run("scene 0 -5 \"d\"");
        result.unwrap();
        let scene = ev.scene().unwrap();
        assert_eq!((scene.width(), scene.height()), (1920.0, 1080.0));
        assert_eq!(ev.surface().size, (1920, 1080));
    }

    #[test]
    fn set_width_keeps_height() {
        let (ev, result) = run("scene 800 600 \"t\"\ncreate rectangle r 2 1\nset r.width = 4");
        result.unwrap();
        assert_eq!(ev.shape("r").unwrap().rect_size(), Some((4.0, 1.0)));
    }

    #[test]
    fn opacity_out_of_range_is_rejected() {
        let (_, result) = run("scene 800 600 \"t\"\ncreate circle c 1\nset c.opacity = 2");
        assert!(result.unwrap_err().message.contains("[0, 1]"));
    }

    #[test]
    fn wrong_animation_arity() {
        let (_, result) = run("scene 800 600 \"t\"\ncreate circle c 1\nanimate scale c 1.0");
        let e = result.unwrap_err();
        assert_eq!(e.line, 3);
        assert!(e.message.contains("expected 1 parameter"), "{}", e.message);
    }

    #[test]
    fn easing_is_applied() {
        let (ev, result) = run("scene 800 600 \"t\"\ncreate circle c 1\nanimate move c (2, 0) linear 1");
        result.unwrap();
        assert!(ev.shape("c").unwrap().centroid().approx_eq(Vec2::new(2.0, 0.0), 1e-9));
    }

    #[test]
    fn loop_count_must_be_whole() {
        let (_, result) = run("loop 1.5 {\nrender\n}");
        assert!(result.unwrap_err().message.contains("whole number"));
    }

    #[test]
    fn wait_renders_frames() {
        let (ev, result) = run("scene 800 600 \"t\"\nwait 0.5");
        result.unwrap();
        assert_eq!(ev.surface().present_count(), 16);
    }
}
