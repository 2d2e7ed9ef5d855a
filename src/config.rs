use crate::flip::FlipTiming;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Labels drawn by the About window. Overridable for translated builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub about: String,
    pub version: String,
    pub credits: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            about: "About".into(),
            version: "Version".into(),
            credits: "Credits".into(),
        }
    }
}

/// About window configuration.
/// Stored in the platform config directory (`$XDG_CONFIG_HOME/flipabout/` or `%APPDATA%\flipabout\`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Link behind the Credits button. No button is shown when unset.
    pub credits_url: Option<String>,
    /// Window size in logical points.
    pub window_width: f32,
    pub window_height: f32,
    /// Icon flip: hide phase then show phase, in milliseconds.
    pub icon_hide_ms: f64,
    pub icon_show_ms: f64,
    /// Copyright/logo flip, in milliseconds.
    pub copyright_hide_ms: f64,
    pub copyright_show_ms: f64,
    /// Image shown on the back of the app icon (128×128 pt).
    pub icon_back_path: Option<PathBuf>,
    /// Image shown on the front of the app icon. Falls back to a placeholder.
    pub icon_front_path: Option<PathBuf>,
    /// Organization logo revealed by hovering the copyright line (12 pt high max).
    pub organization_logo_path: Option<PathBuf>,
    /// JSON descriptor with `name`, `version`, `build` and `copyright` keys.
    /// Compile-time package metadata is used when unset.
    pub descriptor_path: Option<PathBuf>,
    pub labels: Labels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credits_url: None,
            window_width: 268.0,
            window_height: 388.0,
            icon_hide_ms: 120.0,
            icon_show_ms: 320.0,
            copyright_hide_ms: 80.0,
            copyright_show_ms: 160.0,
            icon_back_path: None,
            icon_front_path: None,
            organization_logo_path: None,
            descriptor_path: None,
            labels: Labels::default(),
        }
    }
}

impl Config {
    /// Load config from `config.json` in the platform config directory, or return defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "No config file at {}, using defaults. Creating default config.",
                    path.display()
                );
                let config = Self::default();
                config.save_to(path);
                config
            }
        }
    }

    /// Write the config as pretty JSON to `path`.
    pub fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to write config to {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize config: {}", e);
            }
        }
    }

    pub fn icon_timing(&self) -> FlipTiming {
        FlipTiming::from_millis(self.icon_hide_ms, self.icon_show_ms)
    }

    pub fn copyright_timing(&self) -> FlipTiming {
        FlipTiming::from_millis(self.copyright_hide_ms, self.copyright_show_ms)
    }
}

fn config_path() -> PathBuf {
    let dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flipabout");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok();
    }
    dir.join("config.json")
}
