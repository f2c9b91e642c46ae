use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::brush::{self, BrushConfig};
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_brush_radius: i32,
    pub mask_color: [u8; 4],
    /// Used until the media has been laid out at least once.
    pub fallback_surface_size: [u32; 2],
    pub debug: bool,
    pub window_size: [f32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_brush_radius: brush::DEFAULT_BRUSH_RADIUS,
            mask_color: [239, 68, 68, 128],
            fallback_surface_size: [1200, 1200],
            debug: false,
            window_size: [1200.0, 800.0],
        }
    }
}

impl Config {
    /// Missing file means defaults; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn brush(&self) -> BrushConfig {
        BrushConfig::new(self.default_brush_radius)
    }

    pub fn mask_color(&self) -> image::Rgba<u8> {
        image::Rgba(self.mask_color)
    }
}
