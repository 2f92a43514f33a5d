//! Filesystem and transcoder boundary used by `save`, `export`, `video`
//! and `clean`.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::EngineConfig;
use crate::error::HostError;

pub trait Host {
    fn create_dir_all(&mut self, path: &Path) -> Result<(), HostError>;
    /// Empties `path`, creating it when missing.
    fn clean_dir(&mut self, path: &Path) -> Result<(), HostError>;
    fn remove_dir(&mut self, path: &Path) -> Result<(), HostError>;
    /// Encodes `frames_dir/frame_%04d.png` at `fps` into `output`.
    fn transcode(&mut self, frames_dir: &Path, fps: f64, output: &Path) -> Result<(), HostError>;
}

impl<H: Host + ?Sized> Host for &mut H {
    fn create_dir_all(&mut self, path: &Path) -> Result<(), HostError> { (**self).create_dir_all(path) }
    fn clean_dir(&mut self, path: &Path) -> Result<(), HostError> { (**self).clean_dir(path) }
    fn remove_dir(&mut self, path: &Path) -> Result<(), HostError> { (**self).remove_dir(path) }
    fn transcode(&mut self, frames_dir: &Path, fps: f64, output: &Path) -> Result<(), HostError> {
        (**self).transcode(frames_dir, fps, output)
    }
}

// ─── Real filesystem ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FsHost {
    program: String,
}

impl FsHost {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    /// Uses the transcoder program named in `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.transcoder.clone())
    }
}

impl Default for FsHost {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> HostError + '_ {
    move |source| HostError::Io { path: path.to_path_buf(), source }
}

impl Host for FsHost {
    fn create_dir_all(&mut self, path: &Path) -> Result<(), HostError> {
        std::fs::create_dir_all(path).map_err(io_err(path))
    }

    fn clean_dir(&mut self, path: &Path) -> Result<(), HostError> {
        if !path.exists() {
            return self.create_dir_all(path);
        }
        for entry in std::fs::read_dir(path).map_err(io_err(path))? {
            let entry = entry.map_err(io_err(path))?;
            let child = entry.path();
            let is_dir = entry.file_type().map_err(io_err(&child))?.is_dir();
            if is_dir {
                std::fs::remove_dir_all(&child).map_err(io_err(&child))?;
            } else {
                std::fs::remove_file(&child).map_err(io_err(&child))?;
            }
        }
        Ok(())
    }

    fn remove_dir(&mut self, path: &Path) -> Result<(), HostError> {
        std::fs::remove_dir_all(path).map_err(io_err(path))
    }

    fn transcode(&mut self, frames_dir: &Path, fps: f64, output: &Path) -> Result<(), HostError> {
        let pattern = frames_dir.join("frame_%04d.png");
        tracing::debug!(program = %self.program, input = %pattern.display(), output = %output.display(), "transcoding");

        let result = Command::new(&self.program)
            .arg("-y")
            .arg("-r").arg(format!("{fps}"))
            .arg("-i").arg(&pattern)
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .arg(output)
            .output()
            .map_err(|source| HostError::TranscoderMissing { program: self.program.clone(), source })?;

        if result.status.success() {
            Ok(())
        } else {
            Err(HostError::TranscoderFailed { program: self.program.clone(), status: result.status.to_string() })
        }
    }
}

// ─── In-memory host ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CreateDir(PathBuf),
    CleanDir(PathBuf),
    RemoveDir(PathBuf),
    Transcode { frames_dir: PathBuf, fps: f64, output: PathBuf },
}

/// Records every call without touching the disk.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    /// When false, `transcode` fails as if the program were not installed.
    pub transcoder_available: bool,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self { calls: Vec::new(), transcoder_available: true }
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_transcoder() -> Self {
        Self { transcoder_available: false, ..Self::default() }
    }

    pub fn cleaned(&self) -> Vec<&Path> {
        self.calls.iter().filter_map(|c| match c {
            HostCall::CleanDir(p) => Some(p.as_path()),
            _ => None,
        }).collect()
    }

    pub fn removed(&self) -> Vec<&Path> {
        self.calls.iter().filter_map(|c| match c {
            HostCall::RemoveDir(p) => Some(p.as_path()),
            _ => None,
        }).collect()
    }
}

impl Host for RecordingHost {
    fn create_dir_all(&mut self, path: &Path) -> Result<(), HostError> {
        self.calls.push(HostCall::CreateDir(path.to_path_buf()));
        Ok(())
    }

    fn clean_dir(&mut self, path: &Path) -> Result<(), HostError> {
        self.calls.push(HostCall::CleanDir(path.to_path_buf()));
        Ok(())
    }

    fn remove_dir(&mut self, path: &Path) -> Result<(), HostError> {
        self.calls.push(HostCall::RemoveDir(path.to_path_buf()));
        Ok(())
    }

    fn transcode(&mut self, frames_dir: &Path, fps: f64, output: &Path) -> Result<(), HostError> {
        self.calls.push(HostCall::Transcode {
            frames_dir: frames_dir.to_path_buf(),
            fps,
            output: output.to_path_buf(),
        });
        if self.transcoder_available {
            Ok(())
        } else {
            Err(HostError::TranscoderMissing {
                program: "ffmpeg".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_host_logs_calls_in_order() {
        let mut host = RecordingHost::new();
        host.create_dir_all(Path::new("out/a")).unwrap();
        host.clean_dir(Path::new("scripts")).unwrap();
        host.remove_dir(Path::new("out/a")).unwrap();
        assert_eq!(host.calls.len(), 3);
        assert_eq!(host.cleaned(), vec![Path::new("scripts")]);
        assert_eq!(host.removed(), vec![Path::new("out/a")]);
    }

    #[test]
    fn missing_transcoder_is_reported() {
        let mut host = RecordingHost::without_transcoder();
        let err = host.transcode(Path::new("f"), 30.0, Path::new("v.mp4")).unwrap_err();
        assert!(matches!(err, HostError::TranscoderMissing { .. }));
    }

    #[test]
    fn fs_host_takes_transcoder_from_config() {
        let config = EngineConfig { transcoder: "avconv".into(), ..EngineConfig::default() };
        assert_eq!(FsHost::from_config(&config).program, "avconv");
    }

    #[test]
    fn fs_host_reports_missing_program() {
        let mut host = FsHost::new("kinescript-no-such-transcoder");
        let err = host.transcode(Path::new("f"), 30.0, Path::new("v.mp4")).unwrap_err();
        assert!(matches!(err, HostError::TranscoderMissing { .. }));
    }
}
