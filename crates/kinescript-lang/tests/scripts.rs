//! Whole-script behavior tests.
//!
//! Scripts go through compile → Evaluator::evaluate against an in-memory
//! surface and host; shapes, recorded frames and host calls are inspected
//! afterwards.

use std::path::Path;

use kinescript_lang::{
    compile, Color, EngineConfig, ErrorCode, Evaluator, HostCall, RecordingHost, RecordingSurface, RuntimeError,
    Shape, Vec2,
};
use pretty_assertions::assert_eq;

type Ev = Evaluator<RecordingSurface, RecordingHost>;

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn eval_with(src: &str, host: RecordingHost, config: EngineConfig) -> (Ev, Result<(), RuntimeError>) {
    let prog = compile(src).unwrap_or_else(|errs| panic!("compile failed: {errs:#?}"));
    let mut ev = Evaluator::new(RecordingSurface::new(), host).with_config(config);
    let result = ev.evaluate(&prog);
    (ev, result)
}

fn run(src: &str) -> Ev {
    let (ev, result) = eval_with(src, RecordingHost::new(), EngineConfig::default());
    result.unwrap_or_else(|e| panic!("evaluate failed: {e}"));
    ev
}

fn run_err(src: &str) -> (Ev, RuntimeError) {
    let (ev, result) = eval_with(src, RecordingHost::new(), EngineConfig::default());
    match result {
        Ok(()) => panic!("expected a runtime error"),
        Err(e) => (ev, e),
    }
}

fn shape<'a>(ev: &'a Ev, name: &str) -> &'a Shape {
    ev.shape(name).unwrap_or_else(|| panic!("no shape `{name}`"))
}

const HEADER: &str = "scene 800 600 \"t\"\n";

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn scenario_a_create_color_render_save() {
    let ev = run("scene 800 600 \"t\"\ncreate circle c1 50 (0,0)\nset c1.color = \"#FF0000\"\nrender\nsave \"out\"");

    let scene = ev.scene().unwrap();
    assert_eq!(scene.objects().len(), 1);
    let c1 = shape(&ev, "c1");
    assert_eq!(c1.kind_name(), "circle");
    assert_eq!(c1.color, Color::rgb(255, 0, 0));
    assert!(c1.centroid().approx_eq(Vec2::ZERO, 1e-9));
    for p in &c1.points {
        assert!((p.length() - 50.0).abs() < 1e-9);
    }

    let saved = &ev.surface().saved;
    assert_eq!(saved.len(), 1);
    assert!(saved[0].ends_with("out.png"));
    assert_eq!(saved[0], Path::new("output/t/frames/out.png"));
}

#[test]
fn scenario_b_move_renders_inclusive_frames() {
    let ev = run(&format!("{HEADER}create circle c1 50 (0,0)\nanimate move c1 (100, 0) 1.0"));

    let frames = &ev.surface().frames;
    assert_eq!(frames.len(), 31);

    let coords = ev.scene().unwrap().coords();
    let centre_of = |i: usize| {
        let ((x0, y0), (x1, y1)) = frames[i].commands[0].screen_bounds().unwrap();
        coords.to_logical(Vec2::new((x0 + x1) / 2.0, (y0 + y1) / 2.0))
    };
    assert!(centre_of(0).approx_eq(Vec2::ZERO, 1e-6));
    assert!(centre_of(30).approx_eq(Vec2::new(100.0, 0.0), 1e-6));
    assert!(shape(&ev, "c1").centroid().approx_eq(Vec2::new(100.0, 0.0), 1e-9));
}

#[test]
fn scenario_c_unknown_object_halts() {
    let (ev, err) = run_err(&format!("{HEADER}set unknown_obj.color = \"red\"\ncreate circle unknown_obj 1\nrender"));
    assert_eq!(err.line, 2);
    assert!(err.message.contains("unknown_obj"));
    assert_eq!(ev.diagnostics().to_vec(), vec![err.to_string()]);
    assert!(ev.shape("unknown_obj").is_none());
    assert_eq!(ev.surface().present_count(), 0);
}

// ─── Diagnostics ─────────────────────────────────────────────────────────────

#[test]
fn two_syntax_errors_two_diagnostics() {
    let errs = compile("scene 800 600 \"t\"\ncreate blob b 1\nrender\nset c1.colour = red\n").unwrap_err();
    assert_eq!(errs.len(), 2);
    assert_eq!((errs[0].line, errs[1].line), (2, 4));
    assert!(errs.iter().all(|e| e.code == ErrorCode::P003));
}

#[test]
fn lexical_errors_are_reported_by_compile() {
    let errs = compile("scene 800 600 \"t\"\ncreate circle c 1 @\nsave \"oops").unwrap_err();
    let codes: Vec<ErrorCode> = errs.iter().map(|e| e.code.clone()).collect();
    assert_eq!(codes, vec![ErrorCode::L001, ErrorCode::L002]);
}

#[test]
fn runtime_error_keeps_earlier_work() {
    let (ev, err) = run_err(&format!("{HEADER}create circle c 1\nrender\nsave \"a\"\ncreate circle d -1\nrender"));
    assert_eq!(err.line, 5);
    assert!(err.message.contains("failed to create `d`"), "{}", err.message);
    assert_eq!(ev.surface().present_count(), 1);
    assert_eq!(ev.surface().saved.len(), 1);
}

#[test]
fn failed_save_halts_with_line_and_keeps_frames() {
    let mut surface = RecordingSurface::new();
    surface.fail_saves = true;
    let prog = compile(&format!("{HEADER}create circle c 1\nrender\nsave \"a\"\nrender")).unwrap();
    let mut ev = Evaluator::new(surface, RecordingHost::new());

    let err = ev.evaluate(&prog).unwrap_err();
    assert_eq!(err.line, 4);
    assert!(err.message.contains("failed to save frame"), "{}", err.message);
    assert!(err.message.contains("output/t/frames/a.png"), "{}", err.message);
    assert_eq!(ev.diagnostics().to_vec(), vec![err.to_string()]);
    assert_eq!(ev.surface().present_count(), 1);
    assert!(ev.surface().saved.is_empty());
    assert!(ev.shape("c").is_some());
}

// ─── Scene and objects ───────────────────────────────────────────────────────

#[test]
fn new_scene_discards_objects() {
    let (ev, err) = run_err("scene 800 600 \"a\"\ncreate circle c 1\nscene 400 300 \"b\"\nset c.color = red");
    assert_eq!(ev.scene().unwrap().name, "b");
    assert!(ev.scene().unwrap().objects().is_empty());
    assert!(err.message.contains("unknown object `c`"));
}

#[test]
fn redefinition_overwrites_silently() {
    let ev = run(&format!("{HEADER}create circle c 1\ncreate rectangle c 2 2"));
    assert_eq!(ev.scene().unwrap().objects().len(), 1);
    assert_eq!(shape(&ev, "c").kind_name(), "rectangle");
}

#[test]
fn circle_points_lie_on_radius() {
    let ev = run(&format!("{HEADER}create circle c (3, -2) 1.5"));
    let c = shape(&ev, "c");
    let centre = Vec2::new(3.0, -2.0);
    assert!(c.centroid().approx_eq(centre, 1e-9));
    assert!(c.points.iter().all(|p| (p.distance(centre) - 1.5).abs() < 1e-9));
}

#[test]
fn triangle_forms_and_vertices() {
    let ev = run(&format!(
        "{HEADER}create triangle a (0,0) (4,0) (0,3)\n\
         create triangle b \"right\" 4 3 (1, 1)\n\
         create triangle c equilateral 2\n\
         create triangle d 2\n\
         set a.vertex2 = (5, 0)\n\
         set b.vertices = [(0,0), (1,0), (0,1)]"
    ));
    assert_eq!(shape(&ev, "a").vertices(), Some([Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(0.0, 3.0)]));
    assert_eq!(shape(&ev, "b").vertices(), Some([Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]));
    assert_eq!(shape(&ev, "c").kind_name(), "triangle");
    assert_eq!(shape(&ev, "d").kind_name(), "triangle");
}

#[test]
fn unsupported_property_names_property_kind_and_object() {
    let (_, err) = run_err(&format!("{HEADER}create line l (0,0) (1,1)\nset l.size = 3"));
    assert_eq!(err.message, "property `size` is not supported by line `l`");
}

#[test]
fn unknown_color_always_raises() {
    let (_, err) = run_err(&format!("{HEADER}create circle c 1\nset c.color = \"chartreuse\""));
    assert!(err.message.contains("unknown color `chartreuse`"));
}

#[test]
fn named_colors_and_sizes() {
    let ev = run(&format!("{HEADER}create text t \"hi\" small (1, 1)\nset t.color = MathBlue\nset t.size = title"));
    let t = shape(&ev, "t");
    assert_eq!(t.color, Color::rgb(0x34, 0x98, 0xDB));
    assert_eq!(t.text_run().map(|r| r.font_size), Some(28.0));
}

// ─── Animation through scripts ───────────────────────────────────────────────

#[test]
fn loop_accumulates_mutations() {
    let ev = run(&format!("{HEADER}create circle c 1\nloop 3 {{\n  animate move c (2, 0) 0\n  set c.position = (0, 1)\n}}"));
    assert!(shape(&ev, "c").centroid().approx_eq(Vec2::new(0.0, 1.0), 1e-9));
    assert_eq!(ev.surface().present_count(), 3);
}

#[test]
fn loop_scale_compounds_across_iterations() {
    let ev = run(&format!("{HEADER}create rectangle r 1 1\nloop 3 {{\n  animate scale r 2 0.1\n}}"));
    let (w, h) = shape(&ev, "r").rect_size().unwrap();
    assert!((w - 8.0).abs() < 1e-9 && (h - 8.0).abs() < 1e-9);
}

#[test]
fn every_animation_kind_reaches_its_target() {
    let ev = run(&format!(
        "{HEADER}create rectangle r 2 2\n\
         animate fadein r 0.2\n\
         animate color r blue easeinout 0.2\n\
         animate rotate r 3.141592653589793 0.2\n\
         animate path r [(0,0), (3,0), (3,4)] 0.2\n\
         animate elastic r opacity 0.5 0.2\n\
         animate bounce r 60"
    ));
    let r = shape(&ev, "r");
    assert_eq!(r.color, Color::rgb(0, 0, 255));
    assert_eq!(r.fill_opacity, 0.5);
    let ground = EngineConfig::default().physics.ground;
    assert!(r.centroid().approx_eq(Vec2::new(3.0, ground), 1e-9), "{:?}", r.centroid());
}

#[test]
fn fadeout_ends_transparent() {
    let ev = run(&format!("{HEADER}create text t \"x\"\nanimate fadeout t 0.5"));
    assert_eq!(shape(&ev, "t").fill_opacity, 0.0);
}

#[test]
fn render_frames_and_auto_fit() {
    let config = EngineConfig { auto_fit: true, ..EngineConfig::default() };
    let (ev, result) = eval_with(&format!("{HEADER}create circle c 2\nrender 4"), RecordingHost::new(), config);
    result.unwrap();
    assert_eq!(ev.surface().present_count(), 4);
    assert_ne!(ev.scene().unwrap().coords().scale(), EngineConfig::default().fixed_scale);
}

// ─── Export, video and clean ─────────────────────────────────────────────────

#[test]
fn export_without_transcoder_keeps_frames() {
    let (ev, result) = eval_with(
        &format!("{HEADER}create circle c 1\nexport \"clip\" 10 0.5"),
        RecordingHost::without_transcoder(),
        EngineConfig::default(),
    );
    result.unwrap();
    let saved = &ev.surface().saved;
    assert_eq!(saved.len(), 5);
    assert_eq!(saved[0], Path::new("output/t/clip_frames/frame_0000.png"));
    assert_eq!(saved[4], Path::new("output/t/clip_frames/frame_0004.png"));
    assert!(ev.host().removed().is_empty());
}

#[test]
fn video_transcodes_and_removes_frames() {
    let ev = run(&format!("{HEADER}video \"clip.mp4\" 4 1"));
    assert_eq!(ev.surface().saved.len(), 4);
    let frames_dir = Path::new("output/t/clip_frames");
    assert!(ev.host().calls.contains(&HostCall::Transcode {
        frames_dir: frames_dir.to_path_buf(),
        fps: 4.0,
        output: Path::new("output/t/clip.mp4").to_path_buf(),
    }));
    assert_eq!(ev.host().removed(), vec![frames_dir]);
}

#[test]
fn export_defaults_come_from_config() {
    let config = EngineConfig { export_fps: 2.0, export_duration: 1.5, ..EngineConfig::default() };
    let (ev, result) = eval_with(&format!("{HEADER}export \"clip\""), RecordingHost::new(), config);
    result.unwrap();
    assert_eq!(ev.surface().saved.len(), 3);
}

#[test]
fn clean_rejects_path_traversal() {
    let (ev, err) = run_err("clean [\"output\", \"../etc\"]");
    assert!(err.message.contains("illegal directory path `../etc`"));
    assert!(ev.host().cleaned().is_empty());
}

#[test]
fn bare_clean_uses_configured_dirs() {
    let ev = run("clean");
    assert_eq!(ev.host().cleaned(), vec![Path::new("output"), Path::new("scripts")]);
}
