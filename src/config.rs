//! Runtime configuration loaded from a TOML file.
//!
//! Every section and field is optional; a missing file means defaults.
//! Command-line flags are applied on top by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_JITTER_SPAN, DEFAULT_RESERVED_BOTTOM};
use crate::jitter::{JitterSource, NoJitter, SeededJitter};
use crate::layout::Viewport;
use crate::taskbar::TaskbarClickPolicy;
use crate::window::{WindowManager, WindowManagerOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub viewport: ViewportConfig,
    pub window: WindowConfig,
    pub taskbar: TaskbarConfig,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Screen size. Without both dimensions the manager runs with no viewport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub reserved_bottom: i32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            reserved_bottom: DEFAULT_RESERVED_BOTTOM,
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> Option<Viewport> {
        Some(Viewport::new(self.width?, self.height?, self.reserved_bottom))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub clamp_to_viewport: bool,
    /// Offset new windows so they don't stack exactly on top of each other.
    pub jitter: bool,
    pub seed: Option<u64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            clamp_to_viewport: true,
            jitter: true,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskbarConfig {
    pub click_policy: TaskbarClickPolicy,
}

impl Config {
    /// Read `path`. A file that doesn't exist yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config not found; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn options(&self) -> WindowManagerOptions {
        WindowManagerOptions {
            clamp_to_viewport: self.window.clamp_to_viewport,
            taskbar_click: self.taskbar.click_policy,
            jitter_span: DEFAULT_JITTER_SPAN,
        }
    }

    fn jitter(&self) -> Box<dyn JitterSource> {
        match (self.window.jitter, self.window.seed) {
            (false, _) => Box::new(NoJitter),
            (true, Some(seed)) => Box::new(SeededJitter::new(seed)),
            (true, None) => Box::new(SeededJitter::from_entropy()),
        }
    }

    /// A manager with this configuration's options, jitter and viewport.
    pub fn build_manager(&self) -> WindowManager {
        let mut wm = WindowManager::with_jitter(self.options(), self.jitter());
        wm.set_viewport(self.viewport.viewport());
        wm
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.viewport.viewport(), None);
        assert!(config.options().clamp_to_viewport);
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::parse(indoc! {r#"
            log_level = "debug"
            log_file = "/tmp/desktop-wm.log"

            [viewport]
            width = 1280
            height = 800

            [window]
            clamp_to_viewport = false
            jitter = false

            [taskbar]
            click_policy = "toggle-minimize"
        "#})
        .unwrap();
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.viewport.viewport(), Some(Viewport::new(1280, 800, 40)));
        assert_eq!(
            config.taskbar.click_policy,
            TaskbarClickPolicy::ToggleMinimize
        );

        let mut wm = config.build_manager();
        let id = wm.open("notes", "Notes");
        assert_eq!(wm.window(id).map(|w| (w.x, w.y)), Some((100, 100)));
        assert!(!wm.options().clamp_to_viewport);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(Config::parse("[taskbar]\nclick_policy = \"sometimes\"\n").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[viewport\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
