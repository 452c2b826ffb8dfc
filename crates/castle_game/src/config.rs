use castle_platform::PlatformConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::camera::CameraConfig;
use crate::player::PhysicsConfig;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/game.json";
const DEFAULT_STAGE_PATH: &str = "assets/stages/stage1.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub stage_path: PathBuf,
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub window: PlatformConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stage_path: PathBuf::from(DEFAULT_STAGE_PATH),
            physics: PhysicsConfig::default(),
            camera: CameraConfig::default(),
            window: PlatformConfig::default(),
        }
    }
}

/// Load the game configuration.
///
/// An explicit path must exist. Without one, the default path is used if
/// present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<GameConfig, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !default_path.exists() {
                log::info!("No config at {}, using defaults", default_path.display());
                return Ok(GameConfig::default());
            }
            default_path
        }
    };
    load_config_from_path(&path)
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    log::info!("Config loaded from {}", path.display());
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    let p = &config.physics;
    if ![p.move_speed, p.jump_impulse, p.gravity, p.max_fall_speed]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err("Config validation failed: physics values must be finite".to_string());
    }
    if p.gravity <= 0.0 {
        return Err("Config validation failed: gravity must be > 0".to_string());
    }
    if p.max_fall_speed >= 0.0 {
        return Err("Config validation failed: max_fall_speed must be < 0".to_string());
    }
    if !(config.camera.logical_height > 0.0 && config.camera.logical_height.is_finite()) {
        return Err("Config validation failed: camera.logical_height must be > 0".to_string());
    }
    if !config.camera.vertical_offset.is_finite() {
        return Err("Config validation failed: camera.vertical_offset must be finite".to_string());
    }
    Ok(())
}
