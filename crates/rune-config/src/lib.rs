//! Rune Motion configuration system
//!
//! This crate provides centralized configuration for Rune Motion, loading
//! transition classes and demo settings from `rune.toml`, with environment
//! variables as overrides.
//!
//! ```toml
//! [demo]
//! scene = "swap"
//! frames_per_transition = 18
//!
//! [css.enter]
//! from = "opacity-0 scale-95"
//! active = "transition duration-200 ease-out"
//! to = "opacity-100 scale-100"
//!
//! [css.leave]
//! from = "opacity-100"
//! active = "transition duration-150 ease-in"
//! to = "opacity-0"
//! ```

use rune_transition::{ClassList, Css, TransitionClasses};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "rune.toml";

/// Errors that can occur while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`RuneConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main configuration structure for Rune Motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuneConfig {
    /// Demo application settings
    pub demo: DemoConfig,
    /// Enter and leave transition classes
    pub css: Css,
}

/// Demo application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Scene to play (transition, swap)
    pub scene: Option<String>,
    /// Frames the simulated browser waits after `to` is applied before it
    /// reports the CSS transition as finished
    pub frames_per_transition: u32,
    /// Number of scripted requests a scene issues
    pub toggles: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scene: None,
            frames_per_transition: 18,
            toggles: 6,
        }
    }
}

impl Default for RuneConfig {
    fn default() -> Self {
        Self {
            demo: DemoConfig::default(),
            css: default_css(),
        }
    }
}

/// The class names used by the demo pages.
pub fn default_css() -> Css {
    Css::new(
        TransitionClasses::new("enter-from", "enter-active", "enter-to"),
        TransitionClasses::new("leave-from", "leave-active", "leave-to"),
    )
}

impl RuneConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the rune.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Render configuration as TOML text
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if the file doesn't exist or is invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(err) => {
                debug!(%err, "using default configuration");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// This allows for temporary overrides without modifying the config file.
    pub fn merge_with_env(&mut self) {
        // Demo settings
        if let Ok(scene) = std::env::var("DEMO_SCENE") {
            self.demo.scene = Some(scene);
        }
        if let Ok(val) = std::env::var("DEMO_FRAMES_PER_TRANSITION")
            && let Ok(frames) = val.parse::<u32>()
        {
            self.demo.frames_per_transition = frames;
        }
        if let Ok(val) = std::env::var("DEMO_TOGGLES")
            && let Ok(toggles) = val.parse::<u32>()
        {
            self.demo.toggles = toggles;
        }

        // Transition classes
        merge_classes(&mut self.css.enter, "RUNE_ENTER");
        merge_classes(&mut self.css.leave, "RUNE_LEAVE");
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn merge_classes(classes: &mut TransitionClasses, prefix: &str) {
    let slots = [
        ("FROM", &mut classes.from),
        ("ACTIVE", &mut classes.active),
        ("TO", &mut classes.to),
    ];
    for (suffix, slot) in slots {
        if let Ok(val) = std::env::var(format!("{prefix}_{suffix}")) {
            *slot = ClassList::parse(&val);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuneConfig::default();
        assert_eq!(config.demo.scene, None);
        assert_eq!(config.demo.frames_per_transition, 18);
        assert!(config.css.enter.active.contains("enter-active"));
        assert!(config.css.leave.to.contains("leave-to"));
    }

    #[test]
    fn test_toml_serialization() {
        let config = RuneConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = RuneConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed = RuneConfig::from_toml_str(
            r#"
            [css.enter]
            active = "transition-opacity duration-300"
            "#,
        )
        .unwrap();

        assert!(parsed.css.enter.from.is_empty());
        assert_eq!(parsed.css.enter.active.len(), 2);
        assert_eq!(parsed.css.leave, TransitionClasses::default());
        assert_eq!(parsed.demo, DemoConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let err = RuneConfig::from_toml_str("[demo\nscene = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = RuneConfig::load_from_file("does/not/exist/rune.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist"));
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if rune.toml doesn't exist
        let config = RuneConfig::load_or_default();
        assert!(config.demo.frames_per_transition > 0);
    }

    #[test]
    fn test_merge_with_env() {
        // Set environment variable
        unsafe {
            std::env::set_var("DEMO_SCENE", "swap");
            std::env::set_var("DEMO_FRAMES_PER_TRANSITION", "4");
            std::env::set_var("RUNE_LEAVE_ACTIVE", "transition duration-75");
        }

        let mut config = RuneConfig::default();
        config.merge_with_env();

        assert_eq!(config.demo.scene.as_deref(), Some("swap"));
        assert_eq!(config.demo.frames_per_transition, 4);
        assert_eq!(config.css.leave.active.to_string(), "transition duration-75");
        assert!(config.css.enter.active.contains("enter-active"));

        // Clean up
        unsafe {
            std::env::remove_var("DEMO_SCENE");
            std::env::remove_var("DEMO_FRAMES_PER_TRANSITION");
            std::env::remove_var("RUNE_LEAVE_ACTIVE");
        }
    }
}
