use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText};
use kinescript_lang::{
    compile, Color, DrawCommand, EngineConfig, Evaluator, Frame, HostCall, RecordingHost, RecordingSurface,
};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "kinescript.toml";

fn to_color32(c: Color, alpha: f64) -> Color32 {
    let a = (c.a as f64 * alpha.clamp(0.0, 1.0)).round() as u8;
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, a)
}

fn mono_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).monospace().color(Color32::from_rgb(140, 140, 140)));
        ui.label(RichText::new(value).monospace().color(Color32::from_rgb(210, 210, 170)));
    });
}

fn load_config() -> anyhow::Result<EngineConfig> {
    if !Path::new(CONFIG_FILE).exists() {
        return Ok(EngineConfig::default());
    }
    EngineConfig::load(CONFIG_FILE).with_context(|| format!("loading {CONFIG_FILE}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    tracing::info!(frame_rate = config.frame_rate, auto_fit = config.auto_fit, "previewer starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1400.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Kinescript Preview", options, Box::new(|_cc| Ok(Box::new(App::new(config)))))
        .map_err(|e| anyhow::anyhow!("previewer failed: {e}"))
}

// ─── App state ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
enum Tab { Errors, Objects, Ast, Frames, Canvas }

struct App {
    config: EngineConfig,
    source: String,
    result: RunResult,
    tab: Tab,
    playing: bool,
    frame: usize,
    last_tick: Instant,
    /// Fractional frames carried between repaints.
    carry: f64,
}

impl App {
    fn new(config: EngineConfig) -> Self {
        let source = String::from(
"# write kinescript here
scene 800 600 \"demo\"
create circle ball 1 (-3, 0)
set ball.color = mathblue
set ball.opacity = 0.8
render
animate move ball (3, 0) easeinout 1.5
animate color ball mathred 0.5
");
        let result = run(&source, &config);
        Self { config, source, result, tab: Tab::Canvas, playing: true, frame: 0, last_tick: Instant::now(), carry: 0.0 }
    }

    fn rerun(&mut self) {
        self.result = run(&self.source, &self.config);
        self.frame = 0;
        self.carry = 0.0;
        self.last_tick = Instant::now();
    }
}

// ─── Run result ───────────────────────────────────────────────────────────────

struct ObjectRow {
    name: String,
    kind: &'static str,
    centroid: (f64, f64),
    color: Color,
    opacity: f64,
    points: usize,
}

struct RunResult {
    errors: Vec<String>,
    objects: Vec<ObjectRow>,
    ast: String,
    frames: Vec<Frame>,
    saved: Vec<String>,
    host_calls: Vec<HostCall>,
    canvas: (f64, f64),
}

impl RunResult {
    fn failed(errors: Vec<String>) -> Self {
        Self { errors, objects: vec![], ast: String::new(), frames: vec![], saved: vec![], host_calls: vec![], canvas: (0.0, 0.0) }
    }
}

fn run(source: &str, config: &EngineConfig) -> RunResult {
    // ── Parse ─────────────────────────────────────────────────────────────────
    let program = match compile(source) {
        Ok(p) => p,
        Err(errs) => return RunResult::failed(errs.iter().map(|e| format!("[parse] {e}")).collect()),
    };
    let ast = format!("{program:#?}");

    // ── Evaluate ──────────────────────────────────────────────────────────────
    let mut ev = Evaluator::new(RecordingSurface::new(), RecordingHost::new()).with_config(config.clone());
    if let Err(e) = ev.evaluate(&program) {
        tracing::debug!(error = %e, "script stopped");
    }
    let errors = ev.diagnostics().to_vec();

    let (objects, canvas) = match ev.scene() {
        Some(scene) => {
            let rows = scene.objects().iter().map(|(name, shape)| {
                let c = shape.centroid();
                ObjectRow {
                    name: name.to_string(),
                    kind: shape.kind_name(),
                    centroid: (c.x, c.y),
                    color: shape.color,
                    opacity: shape.fill_opacity,
                    points: shape.points.len(),
                }
            }).collect();
            (rows, (scene.width(), scene.height()))
        }
        None => (vec![], (0.0, 0.0)),
    };

    let (surface, host) = ev.into_parts();
    RunResult {
        errors,
        objects,
        ast,
        frames: surface.frames,
        saved: surface.saved.iter().map(|p| p.display().to_string()).collect(),
        host_calls: host.calls,
        canvas,
    }
}

// ─── UI ───────────────────────────────────────────────────────────────────────

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Advance playback ──────────────────────────────────────────────────
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f64().min(0.1);
        self.last_tick = now;

        let total = self.result.frames.len();
        if self.playing && total > 1 {
            self.carry += dt * self.config.frame_rate;
            let step = self.carry.floor();
            self.carry -= step;
            self.frame = (self.frame + step as usize) % total;
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |cols| {
                // ── Left: editor ──────────────────────────────────────────────
                cols[0].vertical(|ui| {
                    ui.label("Source");
                    let response = ui.add(
                        egui::TextEdit::multiline(&mut self.source)
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .desired_rows(44),
                    );
                    if response.changed() {
                        self.rerun();
                    }
                });

                // ── Right: output ─────────────────────────────────────────────
                cols[1].vertical(|ui| {
                    ui.horizontal(|ui| {
                        let error_count = self.result.errors.len();
                        if error_count == 0 {
                            ui.label(RichText::new("✓  no errors").color(Color32::from_rgb(80, 200, 80)));
                        } else {
                            ui.label(RichText::new(format!("✗  {error_count} error(s)")).color(Color32::from_rgb(220, 80, 80)));
                        }
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("run").clicked() {
                                self.rerun();
                            }
                            let label = if self.playing { "pause" } else { "play" };
                            if ui.button(label).clicked() {
                                self.playing = !self.playing;
                            }
                        });
                    });

                    ui.separator();

                    ui.horizontal(|ui| {
                        let err_label = if self.result.errors.is_empty() {
                            String::from("Errors")
                        } else {
                            format!("Errors ({})", self.result.errors.len())
                        };
                        ui.selectable_value(&mut self.tab, Tab::Errors, err_label);
                        ui.selectable_value(&mut self.tab, Tab::Objects, "Objects");
                        ui.selectable_value(&mut self.tab, Tab::Ast, "AST");
                        ui.selectable_value(&mut self.tab, Tab::Frames, "Frames");
                        ui.selectable_value(&mut self.tab, Tab::Canvas, "Canvas");
                    });

                    ui.separator();

                    egui::ScrollArea::vertical().show(ui, |ui| {
                        match self.tab {
                            Tab::Errors  => self.show_errors(ui),
                            Tab::Objects => self.show_objects(ui),
                            Tab::Ast     => self.show_ast(ui),
                            Tab::Frames  => self.show_frames(ui),
                            Tab::Canvas  => self.show_canvas(ui),
                        }
                    });
                });
            });
        });
    }
}

impl App {
    fn show_errors(&self, ui: &mut egui::Ui) {
        if self.result.errors.is_empty() {
            ui.label(RichText::new("No errors.").color(Color32::GRAY));
            return;
        }
        for msg in &self.result.errors {
            ui.label(RichText::new(msg).monospace().color(Color32::from_rgb(220, 80, 80)));
        }
    }

    fn show_objects(&self, ui: &mut egui::Ui) {
        if self.result.objects.is_empty() {
            ui.label(RichText::new("No objects.").color(Color32::GRAY));
            return;
        }

        egui::Grid::new("objects_grid")
            .striped(true)
            .min_col_width(70.0)
            .show(ui, |ui| {
                for h in ["name", "kind", "centroid", "color", "opacity", "points"] {
                    ui.label(RichText::new(h).strong());
                }
                ui.end_row();

                for row in &self.result.objects {
                    ui.label(RichText::new(&row.name).monospace());
                    ui.label(RichText::new(row.kind).monospace().color(Color32::from_rgb(180, 140, 255)));
                    ui.label(RichText::new(format!("({:.3}, {:.3})", row.centroid.0, row.centroid.1)).monospace());
                    ui.label(RichText::new(row.color.to_string()).monospace().color(to_color32(row.color, 1.0)));
                    ui.label(RichText::new(format!("{:.2}", row.opacity)).monospace());
                    ui.label(RichText::new(row.points.to_string()).monospace().color(Color32::GRAY));
                    ui.end_row();
                }
            });
    }

    fn show_ast(&self, ui: &mut egui::Ui) {
        if self.result.ast.is_empty() {
            ui.label(RichText::new("No AST (parse failed).").color(Color32::GRAY));
            return;
        }
        ui.add(
            egui::TextEdit::multiline(&mut self.result.ast.clone())
                .font(egui::TextStyle::Monospace)
                .desired_width(f32::INFINITY)
                .interactive(false),
        );
    }

    fn show_frames(&self, ui: &mut egui::Ui) {
        mono_row(ui, "frames:", &self.result.frames.len().to_string());
        mono_row(ui, "fps:   ", &format!("{}", self.config.frame_rate));
        if let Some(frame) = self.result.frames.get(self.frame) {
            mono_row(ui, "now:   ", &format!("#{} ({} commands)", self.frame, frame.commands.len()));
        }

        ui.add_space(8.0);
        ui.label(RichText::new("Saved frames").strong());
        if self.result.saved.is_empty() {
            ui.label(RichText::new("none").color(Color32::GRAY));
        }
        for path in &self.result.saved {
            ui.label(RichText::new(path).monospace());
        }

        ui.add_space(8.0);
        ui.label(RichText::new("Host calls").strong());
        if self.result.host_calls.is_empty() {
            ui.label(RichText::new("none").color(Color32::GRAY));
        }
        for call in &self.result.host_calls {
            let text = match call {
                HostCall::CreateDir(p) => format!("mkdir      {}", p.display()),
                HostCall::CleanDir(p) => format!("clean      {}", p.display()),
                HostCall::RemoveDir(p) => format!("rmdir      {}", p.display()),
                HostCall::Transcode { frames_dir, fps, output } => {
                    format!("transcode  {} @ {fps} fps → {}", frames_dir.display(), output.display())
                }
            };
            ui.label(RichText::new(text).monospace().color(Color32::from_rgb(120, 180, 255)));
        }
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let Some(frame) = self.result.frames.get(self.frame) else {
            let msg = if self.result.errors.is_empty() {
                "No frames. Add `render` or `animate`."
            } else {
                "Fix errors to run."
            };
            ui.label(RichText::new(msg).color(Color32::GRAY));
            return;
        };

        let last = self.result.frames.len() - 1;
        ui.add(egui::Slider::new(&mut self.frame, 0..=last).text("frame"));

        // Fit the scene canvas into the available width.
        let (w, h) = self.result.canvas;
        let zoom = if w > 0.0 { (ui.available_width() as f64 / w).min(1.0) } else { 1.0 };
        let desired = egui::vec2((w * zoom) as f32, (h * zoom) as f32);
        let (canvas_rect, _response) = ui.allocate_exact_size(desired, egui::Sense::hover());
        let painter = ui.painter_at(canvas_rect);

        painter.rect_filled(canvas_rect, 0.0, to_color32(frame.background, 1.0));

        let offset = canvas_rect.min;
        let to_pos = |(x, y): (f64, f64)| egui::pos2(offset.x + (x * zoom) as f32, offset.y + (y * zoom) as f32);

        for cmd in &frame.commands {
            draw_command(&painter, cmd, zoom, &to_pos);
        }
    }
}

fn draw_command(painter: &egui::Painter, cmd: &DrawCommand, zoom: f64, to_pos: &dyn Fn((f64, f64)) -> egui::Pos2) {
    if let Some(text) = &cmd.text {
        painter.text(
            to_pos(text.anchor),
            egui::Align2::CENTER_CENTER,
            &text.content,
            egui::FontId::proportional((text.font_size * zoom) as f32),
            to_color32(cmd.color, cmd.fill_opacity),
        );
        return;
    }

    let pts: Vec<egui::Pos2> = cmd.points.iter().copied().map(to_pos).collect();
    if pts.len() < 2 {
        return;
    }
    let stroke = egui::Stroke::new((cmd.stroke_width * zoom) as f32, to_color32(cmd.color, 1.0));

    if cmd.closed {
        let fill = if cmd.fill_opacity > 0.0 { to_color32(cmd.color, cmd.fill_opacity) } else { Color32::TRANSPARENT };
        painter.add(egui::Shape::convex_polygon(pts, fill, stroke));
    } else {
        painter.add(egui::Shape::line(pts, stroke));
    }
}
