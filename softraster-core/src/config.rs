/// Render configuration, loaded from TOML
///
/// Every field has a default so a config file only needs the values it
/// changes:
///
/// ```toml
/// flip_y = false
///
/// [camera]
/// fov = 75.0
///
/// [assets]
/// mesh = "models/lee.obj"
/// ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::buffer::Color;
use crate::error::ConfigError;

/// Top-level render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Initial color buffer width, used for the starting aspect ratio
    pub width: usize,
    pub height: usize,
    /// Clear color at the start of every frame
    pub background: Color,
    /// Map NDC +y to the top row of the color buffer
    pub flip_y: bool,
    pub camera: CameraConfig,
    pub controls: ControlConfig,
    pub assets: AssetConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color::new(40, 45, 60),
            flip_y: true,
            camera: CameraConfig::default(),
            controls: ControlConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Initial camera placement and frustum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub center: [f32; 3],
    pub up: [f32; 3],
    /// Degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 10.0, 20.0],
            center: [0.0, 10.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov: 60.0,
            near: 0.1,
            far: 10000.0,
        }
    }
}

/// Keyboard camera control rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// World units per second for eye and center movement
    pub move_speed: f32,
    /// Degrees per second
    pub fov_speed: f32,
    /// Exclusive lower bound on the field of view
    pub fov_min: f32,
    /// Exclusive upper bound on the field of view
    pub fov_max: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            fov_speed: 5.0,
            fov_min: 20.0,
            fov_max: 100.0,
        }
    }
}

/// Asset paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub mesh: PathBuf,
    pub texture: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            mesh: PathBuf::from("lee.obj"),
            texture: PathBuf::from("color.tga"),
        }
    }
}
