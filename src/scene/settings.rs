//! Render settings loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable settings files.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Serialize, Deserialize};

use super::ScenePreset;
use crate::error::{Error, Result};
use crate::rasterizer::{Camera, RasterSettings, HEIGHT, WIDTH};

/// Optional image files for the four material slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexturePaths {
    pub diffuse: Option<PathBuf>,
    pub normal: Option<PathBuf>,
    pub gloss: Option<PathBuf>,
    pub specular: Option<PathBuf>,
}

/// Everything needed to render a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    pub raster: RasterSettings,
    /// Camera placement; its aspect ratio is derived from width/height
    pub camera: Camera,
    pub scene: ScenePreset,
    pub textures: TexturePaths,
    /// Spin meshes about their Y axis on `update`
    pub rotate: bool,
    /// Radians per second
    pub rotation_speed: f32,
    /// Where the color buffer is exported
    pub output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            raster: RasterSettings::default(),
            camera: Camera::default(),
            scene: ScenePreset::default(),
            textures: TexturePaths::default(),
            rotate: false,
            rotation_speed: 1.0,
            output: PathBuf::from("rasterizer_color_buffer.bmp"),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidSettings(format!(
                "resolution {}x{} has no pixels",
                self.width, self.height
            )));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(Error::InvalidSettings(format!(
                "field of view {} must be between 0 and 180 degrees",
                self.camera.fov_degrees
            )));
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return Err(Error::InvalidSettings(format!(
                "clip range {}..{} is empty",
                self.camera.near, self.camera.far
            )));
        }
        let (near, far) = self.raster.depth_remap;
        if near >= far {
            return Err(Error::InvalidSettings(format!(
                "depth remap range {}..{} is empty",
                near, far
            )));
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Load settings from a RON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let settings = load_settings_from_str(&contents)?;
    info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings from a RON string
pub fn load_settings_from_str(s: &str) -> Result<Settings> {
    let settings: Settings = ron::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}

/// Save settings to a RON file
pub fn save_settings<P: AsRef<Path>>(settings: &Settings, path: P) -> Result<()> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(settings, config)?;
    fs::write(path, contents)?;
    Ok(())
}
