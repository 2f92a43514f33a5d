/// Source location attached to every statement for error reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ─── Top level ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `scene <w> <h> "<name>"`
    Scene { width: Expr, height: Expr, name: Expr, span: Span },
    /// `create <kind> <name> <params...>`
    Create { kind: ObjectKind, name: String, params: Vec<Expr>, span: Span },
    /// `set <name>.<property> = <value>`
    Set { target: String, property: Property, value: Expr, span: Span },
    /// `animate <kind> <name> <params...> [easing] <duration>`
    Animate(AnimateStmt),
    /// `render`
    Render { span: Span },
    /// `render <count>`
    RenderFrames { count: Expr, span: Span },
    /// `save "<name>"`
    Save { name: Expr, span: Span },
    /// `export "<name>" [<fps> <duration>]`
    Export { name: Expr, fps: Option<Expr>, duration: Option<Expr>, span: Span },
    /// `video "<name>" <fps> <duration>`
    Video { name: Expr, fps: Expr, duration: Expr, span: Span },
    /// `wait <seconds>`
    Wait { seconds: Expr, span: Span },
    /// `loop <count> { ... }`
    Loop { count: Expr, body: Vec<Stmt>, span: Span },
    /// `clean ["a", "b"]`, or bare `clean`
    Clean { dirs: Option<Expr>, span: Span },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Scene { span, .. }
            | Stmt::Create { span, .. }
            | Stmt::Set { span, .. }
            | Stmt::Render { span }
            | Stmt::RenderFrames { span, .. }
            | Stmt::Save { span, .. }
            | Stmt::Export { span, .. }
            | Stmt::Video { span, .. }
            | Stmt::Wait { span, .. }
            | Stmt::Loop { span, .. }
            | Stmt::Clean { span, .. } => *span,
            Stmt::Animate(a) => a.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimateStmt {
    pub kind: AnimationKindName,
    pub target: String,
    /// Parameters between the target and the easing/duration.
    pub params: Vec<Expr>,
    pub easing: Option<String>,
    pub duration: Expr,
    pub span: Span,
}

// ─── Names resolved by the parser ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Circle,
    Rectangle,
    Line,
    Arrow,
    Polygon,
    Text,
    Triangle,
}

impl ObjectKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "circle"    => Self::Circle,
            "rectangle" => Self::Rectangle,
            "line"      => Self::Line,
            "arrow"     => Self::Arrow,
            "polygon"   => Self::Polygon,
            "text"      => Self::Text,
            "triangle"  => Self::Triangle,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Color,
    Position,
    Opacity,
    Size,
    Width,
    Height,
    /// `vertex1`..`vertex3`, zero-based here.
    Vertex(usize),
    Vertices,
}

impl Property {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "color"    => Self::Color,
            "position" => Self::Position,
            "opacity"  => Self::Opacity,
            "size"     => Self::Size,
            "width"    => Self::Width,
            "height"   => Self::Height,
            "vertex1"  => Self::Vertex(0),
            "vertex2"  => Self::Vertex(1),
            "vertex3"  => Self::Vertex(2),
            "vertices" => Self::Vertices,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Position => "position",
            Self::Opacity => "opacity",
            Self::Size => "size",
            Self::Width => "width",
            Self::Height => "height",
            Self::Vertex(0) => "vertex1",
            Self::Vertex(1) => "vertex2",
            Self::Vertex(_) => "vertex3",
            Self::Vertices => "vertices",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKindName {
    Move,
    Scale,
    Rotate,
    FadeIn,
    FadeOut,
    Color,
    Path,
    Elastic,
    Bounce,
}

impl AnimationKindName {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "move"    => Self::Move,
            "scale"   => Self::Scale,
            "rotate"  => Self::Rotate,
            "fadein"  => Self::FadeIn,
            "fadeout" => Self::FadeOut,
            "color"   => Self::Color,
            "path"    => Self::Path,
            "elastic" => Self::Elastic,
            "bounce"  => Self::Bounce,
            _ => return None,
        })
    }
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Number(f64),
    Str(String),
    /// Hex digits without the leading `#`.
    Color(String),
    Coord(Box<Expr>, Box<Expr>),
    Array(Vec<Expr>),
}

impl Expr {
    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Ident(_) => "identifier",
            Expr::Number(_) => "number",
            Expr::Str(_) => "string",
            Expr::Color(_) => "color",
            Expr::Coord(..) => "coordinate",
            Expr::Array(_) => "array",
        }
    }
}
