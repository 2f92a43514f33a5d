//! Engine configuration (`kinescript.toml`).
//!
//! Every field has a default, so an empty document is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Simulated frames per second for `animate` and `wait`.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// Canvas used when `scene` is given a non-positive size.
    #[serde(default = "default_width")]
    pub default_width: f64,
    #[serde(default = "default_height")]
    pub default_height: f64,
    /// Pixels per logical unit when auto-fit is off.
    #[serde(default = "default_fixed_scale")]
    pub fixed_scale: f64,
    #[serde(default)]
    pub auto_fit: bool,
    /// Named color or `#RRGGBB`.
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_export_fps")]
    pub export_fps: f64,
    #[serde(default = "default_export_duration")]
    pub export_duration: f64,
    /// Directories cleared by a bare `clean`.
    #[serde(default = "default_clean_dirs")]
    pub clean_dirs: Vec<String>,
    #[serde(default = "default_transcoder")]
    pub transcoder: String,
    #[serde(default)]
    pub physics: PhysicsConfig,
}

/// Parameters of the `bounce` animation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PhysicsConfig {
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    #[serde(default = "default_elasticity")]
    pub elasticity: f64,
    /// Logical y of the floor.
    #[serde(default = "default_ground")]
    pub ground: f64,
    /// Below this vertical speed the object comes to rest.
    #[serde(default = "default_rest_speed")]
    pub rest_speed: f64,
}

fn default_frame_rate() -> f64 { 30.0 }
fn default_width() -> f64 { 1920.0 }
fn default_height() -> f64 { 1080.0 }
fn default_fixed_scale() -> f64 { 40.0 }
fn default_background() -> String { "white".to_string() }
fn default_output_dir() -> String { "output".to_string() }
fn default_export_fps() -> f64 { 30.0 }
fn default_export_duration() -> f64 { 5.0 }
fn default_clean_dirs() -> Vec<String> { vec!["output".to_string(), "scripts".to_string()] }
fn default_transcoder() -> String { "ffmpeg".to_string() }
fn default_gravity() -> f64 { -9.8 }
fn default_elasticity() -> f64 { 0.8 }
fn default_ground() -> f64 { -4.5 }
fn default_rest_speed() -> f64 { 0.1 }

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            elasticity: default_elasticity(),
            ground: default_ground(),
            rest_speed: default_rest_speed(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            default_width: default_width(),
            default_height: default_height(),
            fixed_scale: default_fixed_scale(),
            auto_fit: false,
            background: default_background(),
            output_dir: default_output_dir(),
            export_fps: default_export_fps(),
            export_duration: default_export_duration(),
            clean_dirs: default_clean_dirs(),
            transcoder: default_transcoder(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&src)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("frame_rate", self.frame_rate)?;
        positive("default_width", self.default_width)?;
        positive("default_height", self.default_height)?;
        positive("fixed_scale", self.fixed_scale)?;
        positive("export_fps", self.export_fps)?;
        if self.export_duration < 0.0 {
            return Err(invalid("export_duration", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.physics.elasticity) {
            return Err(invalid("physics.elasticity", "must be within [0, 1]"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 { Ok(()) } else { Err(invalid(field, format!("must be > 0, got {value}"))) }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let c = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(c, EngineConfig::default());
        assert_eq!(c.frame_rate, 30.0);
        assert_eq!(c.physics.gravity, -9.8);
    }

    #[test]
    fn partial_override() {
        let c = EngineConfig::from_toml_str("frame_rate = 60\nauto_fit = true\n[physics]\nground = -2.0\n").unwrap();
        assert_eq!(c.frame_rate, 60.0);
        assert!(c.auto_fit);
        assert_eq!(c.physics.ground, -2.0);
        assert_eq!(c.physics.elasticity, 0.8);
        assert_eq!(c.output_dir, "output");
    }

    #[test]
    fn rejects_zero_frame_rate() {
        let err = EngineConfig::from_toml_str("frame_rate = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "frame_rate", .. }));
    }

    #[test]
    fn rejects_elasticity_out_of_range() {
        let err = EngineConfig::from_toml_str("[physics]\nelasticity = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "physics.elasticity", .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(EngineConfig::from_toml_str("frame_rate = ="), Err(ConfigError::Parse(_))));
    }
}
