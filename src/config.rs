//! Application configuration, read once at startup.

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::common::ModelConfig;
use crate::data::FsAccess;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// `0` for `/dev/video0`, a device path, or `stub://` for the synthetic source.
    pub device: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "0".to_string(),
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub tick_interval_ms: u64,
    /// Width the image is scaled to on screen. The height follows the aspect ratio.
    pub display_width: u32,
    pub window_width: f32,
    pub window_height: f32,
    pub model: ModelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            tick_interval_ms: 3,
            display_width: 800,
            window_width: 1200.,
            window_height: 700.,
            model: ModelConfig::default(),
        }
    }
}

impl AppConfig {
    /// `~/.config/autointell/config.json` on Linux.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        FsAccess::Config.app_file(CONFIG_FILE)
    }

    /// Reads the configuration from the default location, or the defaults
    /// when there is no file.
    pub fn load() -> anyhow::Result<Self> {
        match Self::default_path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                log::warn!("{err}, using the default configuration");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            log::info!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
