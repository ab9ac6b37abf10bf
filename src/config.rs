//! Tuning knobs for the whole game
//!
//! Every field can be overridden by a `config.json` served next to the page.
//! Missing fields (or a missing file) fall back to the defaults below.
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub background: BackgroundConfig,
    pub obstacles: ObstacleConfig,
    pub keys: KeyConfig,
    pub assets: AssetConfig,
}

impl GameConfig {
    pub const PATH: &'static str = "config.json";

    /// Reject values the world cannot be built from
    /// - spacings, sizes and periods are divisors or loop steps, they must be
    ///   finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("camera.frustum_size", self.camera.frustum_size),
            ("player.max_speed", self.player.max_speed),
            ("background.tile_width_ratio", self.background.tile_width_ratio),
            ("obstacles.distance", self.obstacles.distance),
            ("obstacles.period", self.obstacles.period),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(anyhow!("{} must be a positive number, got {}", name, value));
            }
        }

        let non_negative = [
            ("player.acceleration", self.player.acceleration),
            ("player.deceleration", self.player.deceleration),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(anyhow!("{} must not be negative, got {}", name, value));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// vertical extent of the view, in world units
    pub frustum_size: f64,
    pub z: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            frustum_size: 15.0,
            z: 5.0,
        }
    }
}

/// Speeds are world units per millisecond, accelerations per millisecond²
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_speed: f64,
    pub acceleration: f64,
    pub deceleration: f64,
    pub move_speed: f64,
    pub max_tilt_degrees: f64,
    pub size: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            max_speed: 0.005,
            acceleration: 0.00002,
            deceleration: 0.00001,
            move_speed: 0.005,
            max_tilt_degrees: 30.0,
            size: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// tile width as a fraction of the frustum size, tiles are frustum tall
    pub tile_width_ratio: f64,
    pub depth: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        BackgroundConfig {
            tile_width_ratio: 0.5,
            depth: -2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub start_offset: f64,
    pub distance: f64,
    /// obstacles placed beyond the first screen
    pub extra: usize,
    pub depth: f64,
    pub base_scale: f64,
    pub amplitude: f64,
    /// milliseconds per radian of the scale pulse
    pub period: f64,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        ObstacleConfig {
            start_offset: 5.0,
            distance: 5.0,
            extra: 200,
            depth: 0.0,
            base_scale: 1.5,
            amplitude: 0.25,
            period: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyConfig {
    pub up: String,
    pub down: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        KeyConfig {
            up: "w".to_string(),
            down: "s".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetConfig {
    pub bird: String,
    pub background: String,
    pub obstacle: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig {
            bird: "assets/bird.png".to_string(),
            background: "assets/forest.png".to_string(),
            obstacle: "assets/apple.png".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults_for_missing_fields() {
        let config: GameConfig = serde_json::from_str(
            r#"{ "player": { "max_speed": 0.01 }, "keys": { "up": "ArrowUp" } }"#,
        )
        .unwrap();

        assert_eq!(config.player.max_speed, 0.01);
        assert_eq!(config.player.acceleration, 0.00002);
        assert_eq!(config.keys.up, "ArrowUp");
        assert_eq!(config.keys.down, "s");
        assert_eq!(config.camera, CameraConfig::default());
        assert_eq!(config.obstacles, ObstacleConfig::default());
    }

    #[test]
    fn empty_object_is_the_default_config() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_spacings_and_periods_are_rejected() {
        let overrides = [
            r#"{ "obstacles": { "distance": 0 } }"#,
            r#"{ "obstacles": { "period": 0 } }"#,
            r#"{ "background": { "tile_width_ratio": 0 } }"#,
            r#"{ "camera": { "frustum_size": -15 } }"#,
            r#"{ "player": { "max_speed": 0 } }"#,
            r#"{ "player": { "deceleration": -0.1 } }"#,
        ];
        for json in overrides {
            let config: GameConfig = serde_json::from_str(json).unwrap();
            assert!(config.validate().is_err(), "{} should be rejected", json);
        }
    }

    #[test]
    fn rejection_names_the_offending_field() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "obstacles": { "distance": 0 } }"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("obstacles.distance"));
    }
}
