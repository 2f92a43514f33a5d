pub mod syntax;
pub mod types;
pub mod scene;
pub mod animation;
pub mod runtime;
pub mod error;
pub mod config;

pub use animation::{Animation, Interpolation};
pub use config::{EngineConfig, PhysicsConfig};
pub use error::{ConfigError, Error, ErrorCode, HostError, RuntimeError, SurfaceError};
pub use runtime::evaluator::Evaluator;
pub use runtime::host::{FsHost, Host, HostCall, RecordingHost};
pub use runtime::value::Value;
pub use scene::{CoordinateSystem, Frame, RecordingSurface, Scene, Surface};
pub use syntax::ast::Program;
pub use syntax::token::{Token, TokenKind};
pub use types::color::Color;
pub use types::draw::DrawCommand;
pub use types::shape::Shape;
pub use types::vec2::Vec2;

use syntax::lexer::Lexer;
use syntax::parser::Parser;

// ─── Public API ───────────────────────────────────────────────────────────────

/// Tokenizes and parses a script. Fails with every lexical and syntax
/// diagnostic in the source, in order.
pub fn compile(source: &str) -> Result<Program, Vec<Error>> {
    let tokens = Lexer::new(source).tokenize();
    Parser::new(tokens).parse()
}

/// Compiles and runs `source` on a fresh evaluator.
///
/// Syntax errors prevent execution entirely. A runtime error is returned
/// alongside the evaluator so the frames and diagnostics produced before it
/// can still be inspected.
pub fn run<S: Surface, H: Host>(
    source: &str,
    surface: S,
    host: H,
    config: EngineConfig,
) -> Result<(Evaluator<S, H>, Result<(), RuntimeError>), Vec<Error>> {
    let program = compile(source)?;
    let mut evaluator = Evaluator::new(surface, host).with_config(config);
    let result = evaluator.evaluate(&program);
    Ok((evaluator, result))
}
