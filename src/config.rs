//! Game balance and tuning
//!
//! All gameplay numbers live here so a run can be reconfigured without
//! touching the core. Defaults reproduce the stock balance; embedders may
//! override individual fields via JSON (unknown fields rejected, missing
//! fields defaulted).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Config loading/validation error.
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed into a [`GameConfig`].
    Parse(serde_json::Error),
    /// A field value is outside its safe operating range.
    OutOfRange {
        /// Field name (for logging).
        field: &'static str,
        /// The rejected value.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "config parse failed: {}", err),
            ConfigError::OutOfRange {
                field,
                value,
                safe_range,
            } => write!(
                f,
                "config field '{}' = {} is outside safe range {}",
                field, value, safe_range
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::OutOfRange { .. } => None,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    // === Play field ===
    /// Play field width in world units
    pub screen_width: f32,
    /// Play field height in world units
    pub screen_height: f32,
    /// Spatial grid cell size
    pub cell_size: f32,

    // === Entities ===
    /// Base sprite box of the player (pre-scale)
    pub player_size: Vec2,
    /// Base sprite box of an enemy
    pub enemy_size: Vec2,
    /// Base sprite box of a bullet
    pub bullet_size: Vec2,
    /// Base sprite box of an explosion
    pub explosion_size: Vec2,
    /// Player sprite scale factor
    pub player_scale: f32,

    // === Combat ===
    /// Live-enemy cap for the spawner
    pub max_enemies: usize,
    /// Base delay between enemy spawns (seconds, divided by level)
    pub spawn_interval: f32,
    /// Minimum delay between player shots (seconds)
    pub bullet_interval: f32,
    /// Upward bullet speed (world units per second)
    pub bullet_speed: f32,
    /// Post-hit invincibility window (seconds)
    pub invincibility: f32,
    /// Explosion lifetime (seconds)
    pub explosion_ttl: f32,
    /// Score reward per destroyed enemy
    pub score_per_kill: u32,

    // === Progression ===
    /// Starting player HP
    pub starting_hp: i32,
    /// Score step between level thresholds (first threshold = one step)
    pub level_step: u32,
    /// Winning happens when the level exceeds this
    pub max_level: u32,
    /// Delay between a terminal transition and the game-end callback (seconds)
    pub end_delay: f32,

    // === Background ===
    /// Background scroll speed (world units per second)
    pub background_speed: f32,
    /// Background image height; the scroll offset wraps modulo this
    pub background_height: f32,

    // === Collision evaluator ===
    /// Sleep between scan cycles, in milliseconds. `None` reproduces the
    /// unthrottled best-effort loop; the default throttles lightly so the
    /// evaluator does not burn a whole core.
    pub scan_interval_ms: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 1080.0,
            screen_height: 1920.0,
            cell_size: 100.0,

            player_size: Vec2::new(96.0, 96.0),
            enemy_size: Vec2::new(72.0, 72.0),
            bullet_size: Vec2::new(16.0, 40.0),
            explosion_size: Vec2::new(96.0, 96.0),
            player_scale: 1.0,

            max_enemies: 10,
            spawn_interval: 2.0,
            bullet_interval: 0.5,
            bullet_speed: 300.0,
            invincibility: 3.0,
            explosion_ttl: 3.0,
            score_per_kill: 10,

            starting_hp: 3,
            level_step: 100,
            max_level: 4,
            end_delay: 3.0,

            background_speed: 50.0,
            background_height: 512.0,

            scan_interval_ms: Some(1),
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON, falling back to defaults for absent fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that field values are inside their safe operating ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "cell_size",
                value: self.cell_size,
                safe_range: "(0.0, inf)",
            });
        }
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "screen_width/screen_height",
                value: self.screen_width.min(self.screen_height),
                safe_range: "(0.0, inf)",
            });
        }
        if self.invincibility < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "invincibility",
                value: self.invincibility,
                safe_range: "[0.0, inf)",
            });
        }
        // A non-positive spawn interval would spin the spawner's catch-up
        // loop forever on the first live tick
        if self.spawn_interval <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "spawn_interval",
                value: self.spawn_interval,
                safe_range: "(0.0, inf)",
            });
        }
        if self.bullet_interval < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "bullet_interval",
                value: self.bullet_interval,
                safe_range: "[0.0, inf)",
            });
        }
        if self.explosion_ttl <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "explosion_ttl",
                value: self.explosion_ttl,
                safe_range: "(0.0, inf)",
            });
        }
        if self.end_delay < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "end_delay",
                value: self.end_delay,
                safe_range: "[0.0, inf)",
            });
        }
        if self.background_height <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "background_height",
                value: self.background_height,
                safe_range: "(0.0, inf)",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_override() {
        let config = GameConfig::from_json(r#"{ "max_enemies": 4, "cell_size": 50.0 }"#).unwrap();
        assert_eq!(config.max_enemies, 4);
        assert_eq!(config.cell_size, 50.0);
        // Untouched fields keep their defaults
        assert_eq!(config.level_step, 100);
    }

    #[test]
    fn test_from_json_rejects_bad_cell_size() {
        let err = GameConfig::from_json(r#"{ "cell_size": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field, .. } if field == "cell_size"));
    }

    #[test]
    fn test_from_json_rejects_zero_spawn_interval() {
        // A zero interval would never let the spawner's catch-up loop end
        let err = GameConfig::from_json(r#"{ "spawn_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field, .. } if field == "spawn_interval"));

        let err = GameConfig::from_json(r#"{ "spawn_interval": -2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field, .. } if field == "spawn_interval"));
    }

    #[test]
    fn test_from_json_rejects_bad_timing_fields() {
        for json in [
            r#"{ "bullet_interval": -0.5 }"#,
            r#"{ "explosion_ttl": 0.0 }"#,
            r#"{ "end_delay": -1.0 }"#,
        ] {
            assert!(
                matches!(GameConfig::from_json(json), Err(ConfigError::OutOfRange { .. })),
                "accepted {json}"
            );
        }
    }

    #[test]
    fn test_from_json_rejects_unknown_field() {
        assert!(GameConfig::from_json(r#"{ "not_a_field": 1 }"#).is_err());
    }
}
