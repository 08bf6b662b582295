use crate::error::AppError;
use crate::filesystem;
use photo_gallery::{AndroidBridgeConfig, Facing};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User-tunable settings, read from `config.toml` in the app data directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Album that captures are stored in and the grid is loaded from
    pub album_name: String,
    pub grid_columns: u32,
    /// Edge length of generated thumbnails in pixels
    pub thumbnail_size: u32,
    /// Seconds before a notice disappears; 0 keeps it until dismissed
    pub notice_timeout_secs: u64,
    pub default_facing: Facing,
    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
    /// Android activity implementing the device bridge (slash format)
    pub main_activity_class: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            album_name: "Camera".to_string(),
            grid_columns: 3,
            thumbnail_size: 256,
            notice_timeout_secs: 4,
            default_facing: Facing::Back,
            log_level: "info".to_string(),
            main_activity_class: AndroidBridgeConfig::default().main_activity_class,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(s: &str) -> Result<Self, AppError> {
        let config: AppConfig = toml::from_str(s)?;
        Ok(config.sanitized())
    }

    /// Load from `path`. A missing file yields defaults; an unreadable or
    /// invalid file is logged and also yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{} in {}, using defaults", e, path.display());
                Self::default()
            }
        }
    }

    pub fn load() -> Self {
        Self::load_from(&filesystem::config_path())
    }

    pub fn bridge_config(&self) -> AndroidBridgeConfig {
        AndroidBridgeConfig {
            main_activity_class: self.main_activity_class.clone(),
        }
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.album_name.trim().is_empty() {
            self.album_name = defaults.album_name;
        }
        if self.main_activity_class.trim().is_empty() {
            self.main_activity_class = defaults.main_activity_class;
        }
        self.grid_columns = self.grid_columns.clamp(1, 8);
        self.thumbnail_size = self.thumbnail_size.clamp(64, 1024);
        self
    }
}
