//! Game configuration, read from a RON file with a default for every field.

use crate::catalog::DEFAULT_FALLBACK_MOVE;
use crate::errors::{ConfigError, ConfigResult};
use crate::loader::read_ron;
use crate::world::EncounterThresholds;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of a generated exploration grid.
    pub grid_size: usize,
    /// Optional ASCII layout file used instead of a generated grid.
    pub grid_layout: Option<PathBuf>,
    pub encounter_thresholds: EncounterThresholds,
    /// Pause between exploration ticks.
    pub tick_delay_ms: u64,
    /// Longest wait for a command during one exploration tick.
    pub input_poll_ms: u64,
    /// Cells shown around the marker.
    pub view_radius: usize,
    pub data_dir: PathBuf,
    /// Species offered as starters, by catalog number.
    pub starter_indices: Vec<u16>,
    pub fallback_move: String,
    /// Fixed seed for reproducible runs; None draws from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 15,
            grid_layout: None,
            encounter_thresholds: EncounterThresholds::default(),
            tick_delay_ms: 50,
            input_poll_ms: 200,
            view_radius: 5,
            data_dir: PathBuf::from("data"),
            starter_indices: vec![1, 4, 7, 16],
            fallback_move: DEFAULT_FALLBACK_MOVE.to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let config: GameConfig = read_ron(path)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_ron_str(text: &str) -> ConfigResult<Self> {
        let config: GameConfig = ron::from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.grid_size < 5 {
            return Err(ConfigError::InvalidSetting {
                field: "grid_size",
                reason: format!("must be at least 5, got {}", self.grid_size),
            });
        }
        for (field, value) in [
            ("encounter_thresholds.grass", self.encounter_thresholds.grass),
            ("encounter_thresholds.water", self.encounter_thresholds.water),
        ] {
            if value > 100 {
                return Err(ConfigError::InvalidSetting {
                    field,
                    reason: format!("percent chance must be 0-100, got {}", value),
                });
            }
        }
        if self.input_poll_ms == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "input_poll_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.starter_indices.is_empty() {
            return Err(ConfigError::InvalidSetting {
                field: "starter_indices",
                reason: "at least one starter is required".to_string(),
            });
        }
        Ok(())
    }

    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }

    pub fn input_poll(&self) -> Duration {
        Duration::from_millis(self.input_poll_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = GameConfig::from_ron_str("(grid_size: 21, seed: Some(7))").unwrap();
        assert_eq!(config.grid_size, 21);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.encounter_thresholds, EncounterThresholds { grass: 30, water: 30 });
        assert_eq!(config.starter_indices, vec![1, 4, 7, 16]);
        assert_eq!(config.fallback_move, "Struggle");
    }

    #[test]
    fn test_partial_thresholds_keep_other_default() {
        let config = GameConfig::from_ron_str("(encounter_thresholds: (water: 45))").unwrap();
        assert_eq!(config.encounter_thresholds.grass, 30);
        assert_eq!(config.encounter_thresholds.water, 45);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            GameConfig::from_ron_str("(grid_size: 2)"),
            Err(ConfigError::InvalidSetting { field: "grid_size", .. })
        ));
        assert!(matches!(
            GameConfig::from_ron_str("(encounter_thresholds: (grass: 101))"),
            Err(ConfigError::InvalidSetting { field: "encounter_thresholds.grass", .. })
        ));
        assert!(matches!(
            GameConfig::from_ron_str("(grid_size: \"big\")"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/game.ron");
        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }
}
