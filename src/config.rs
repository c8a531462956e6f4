//! Viewer configuration
//!
//! Uses RON (Rusty Object Notation) for a human-readable settings file.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::error::AssetError;
use crate::rasterizer::{Color, RasterOptions, Vec3, HEIGHT, WIDTH};

/// Default location of the settings file
pub const CONFIG_PATH: &str = "assets/render.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_origin: Vec3,
    /// World rotation around Y, radians per second
    pub rotation_speed: f32,
    pub rotate: bool,
    pub mesh: Option<PathBuf>,
    pub texture: Option<PathBuf>,
    pub clear_color: Color,
    pub uniform_clear_color: Color,
    pub options: RasterOptions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fov_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
            camera_origin: Vec3::new(0.0, 0.0, -50.0),
            rotation_speed: 0.9,
            rotate: true,
            mesh: None,
            texture: None,
            clear_color: Color::new(100, 100, 100),
            uniform_clear_color: Color::new(39, 39, 39),
            options: RasterOptions::default(),
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Parse a config from a RON string; missing fields take their defaults
    pub fn from_ron(s: &str) -> Result<Self, AssetError> {
        Ok(ron::from_str(s)?)
    }

    /// Load a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Save a config to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AssetError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());

        let contents = ron::ser::to_string_pretty(self, config)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Load from `path`, falling back to defaults when the file is missing or malformed
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::CullMode;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = RenderConfig::from_ron(
            "(width: 320, height: 240, options: (show_depth_buffer: true, cull_mode: Back))",
        )
        .unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 240);
        assert!(config.options.show_depth_buffer);
        assert!(!config.options.show_bounding_boxes);
        assert_eq!(config.options.cull_mode, CullMode::Back);
        assert_eq!(config.fov_degrees, 45.0);
        assert_eq!(config.clear_color, Color::new(100, 100, 100));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(RenderConfig::from_ron("(width: \"wide\")"), Err(AssetError::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("softraster-config-{}.ron", std::process::id()));
        let config = RenderConfig {
            texture: Some(PathBuf::from("assets/textures/vehicle_diffuse.png")),
            rotate: false,
            ..Default::default()
        };

        config.save(&path).unwrap();
        let loaded = RenderConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_defaults() {
        let config = RenderConfig::load_or_default("definitely/not/here.ron");
        assert_eq!(config, RenderConfig::default());
    }
}
