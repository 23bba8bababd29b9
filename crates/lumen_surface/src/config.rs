//! # Surface Configuration
//!
//! Loaded once when the surface is built. Every field has a default, so a
//! TOML file only needs the keys it wants to change:
//!
//! ```toml
//! initial_width = 1280
//! initial_height = 720
//! render_mode = "on_demand"
//! frame_interval_ms = 16
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::mode::RenderMode;

/// Longest frame interval accepted for continuous pacing.
const MAX_FRAME_INTERVAL_MS: u64 = 1000;

/// Configuration for a [`RenderSurface`](crate::RenderSurface).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    /// Width reported to the first `on_size_changed` if the host never
    /// notifies a size.
    pub initial_width: u32,
    /// Height reported to the first `on_size_changed`.
    pub initial_height: u32,
    /// Scheduling discipline at startup.
    pub render_mode: RenderMode,
    /// Minimum spacing between continuous frames (ms). Zero disables pacing,
    /// for contexts whose `present` already blocks on vsync.
    pub frame_interval_ms: u64,
    /// Keep the context alive across pause/resume.
    pub preserve_context_on_pause: bool,
    /// Multisample count handed to the context factory.
    pub sample_count: u32,
    /// Name given to the render thread.
    pub thread_name: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            initial_width: 0,
            initial_height: 0,
            render_mode: RenderMode::Continuous,
            frame_interval_ms: 16, // ~60Hz
            preserve_context_on_pause: false,
            sample_count: 1,
            thread_name: "lumen-render".to_string(),
        }
    }
}

impl SurfaceConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, otherwise whatever
    /// [`validate`](Self::validate) rejects.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, then as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Rejects values the scheduler cannot honor.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for an empty thread name, a frame interval
    /// above one second or a zero sample count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_name.trim().is_empty() {
            return Err(ConfigError::Invalid("thread_name must not be empty".into()));
        }
        if self.frame_interval_ms > MAX_FRAME_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "frame_interval_ms {} exceeds {MAX_FRAME_INTERVAL_MS}",
                self.frame_interval_ms
            )));
        }
        if self.sample_count == 0 {
            return Err(ConfigError::Invalid("sample_count must be at least 1".into()));
        }
        Ok(())
    }

    /// Continuous-mode pacing interval.
    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Parameters handed to [`ContextFactory::create`](crate::ContextFactory::create).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    /// Surface width at creation time.
    pub width: u32,
    /// Surface height at creation time.
    pub height: u32,
    /// Requested multisample count. Interpretation is up to the factory.
    pub sample_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SurfaceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.render_mode, RenderMode::Continuous);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SurfaceConfig::from_toml_str(
            r#"
            initial_width = 800
            initial_height = 600
            render_mode = "on_demand"
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_width, 800);
        assert_eq!(config.initial_height, 600);
        assert_eq!(config.render_mode, RenderMode::OnDemand);
        assert_eq!(config.sample_count, 1);
        assert_eq!(config.thread_name, "lumen-render");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            SurfaceConfig::from_toml_str("thread_name = \"  \""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SurfaceConfig::from_toml_str("frame_interval_ms = 5000"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SurfaceConfig::from_toml_str("sample_count = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_types() {
        assert!(matches!(
            SurfaceConfig::from_toml_str("vsync = true"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SurfaceConfig::from_toml_str("render_mode = \"sometimes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("lumen_surface_missing_config.toml");
        assert!(matches!(SurfaceConfig::from_file(&path), Err(ConfigError::Io(_))));
    }
}
