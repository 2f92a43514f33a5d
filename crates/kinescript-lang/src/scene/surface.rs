//! The rendering boundary. Rasterization, font shaping and image encoding
//! live behind [`Surface`].

use std::path::{Path, PathBuf};

use crate::error::SurfaceError;
use crate::types::color::Color;
use crate::types::draw::DrawCommand;

pub trait Surface {
    /// Called when a scene is created.
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn clear(&mut self, background: Color);
    fn draw(&mut self, command: &DrawCommand);
    /// Ends the current frame.
    fn present(&mut self);
    /// Writes the last presented frame to `path`.
    fn save_frame(&mut self, path: &Path) -> Result<(), SurfaceError>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn resize(&mut self, width: u32, height: u32) { (**self).resize(width, height) }
    fn clear(&mut self, background: Color) { (**self).clear(background) }
    fn draw(&mut self, command: &DrawCommand) { (**self).draw(command) }
    fn present(&mut self) { (**self).present() }
    fn save_frame(&mut self, path: &Path) -> Result<(), SurfaceError> { (**self).save_frame(path) }
}

// ─── In-memory surface ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub background: Color,
    pub commands: Vec<DrawCommand>,
}

/// Keeps every presented frame and saved path in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub size: (u32, u32),
    pub frames: Vec<Frame>,
    pub saved: Vec<PathBuf>,
    pending: Option<Frame>,
    /// Makes every `save_frame` fail.
    pub fail_saves: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn clear(&mut self, background: Color) {
        self.pending = Some(Frame { background, commands: Vec::new() });
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.pending
            .get_or_insert_with(|| Frame { background: Color::WHITE, commands: Vec::new() })
            .commands
            .push(command.clone());
    }

    fn present(&mut self) {
        let frame = self.pending.take()
            .unwrap_or(Frame { background: Color::WHITE, commands: Vec::new() });
        self.frames.push(frame);
    }

    fn save_frame(&mut self, path: &Path) -> Result<(), SurfaceError> {
        if self.fail_saves {
            return Err(SurfaceError::Save { path: path.to_path_buf(), reason: "save disabled".into() });
        }
        self.saved.push(path.to_path_buf());
        Ok(())
    }
}
