//! Session Configuration
//!
//! Loaded from JSON; every field has a default so `{}` is a valid config.

use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::core::grid::{Grid, DEFAULT_GRID_SIZE};
use crate::game::treasure::TieBreak;

/// Configuration for a treasure hunt session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HuntConfig {
    /// Board edge length (board has `grid_size²` cells)
    pub grid_size: u32,
    /// RNG seed; `None` derives one from a fresh session id
    pub seed: Option<u64>,
    /// Rule precedence for cells that are prime and a multiple of five
    pub tie_break: TieBreak,
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            seed: None,
            tie_break: TieBreak::PrimeFirst,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config is not valid JSON for [`HuntConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Grid size outside the supported range.
    #[error("Grid size {0} out of range (1..={max})", max = Grid::MAX_SIZE)]
    InvalidGridSize(u32),
}

impl HuntConfig {
    /// Config with a fixed seed and defaults elsewhere.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: HuntConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 || self.grid_size > Grid::MAX_SIZE {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        Ok(())
    }

    /// Board described by this config.
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = HuntConfig::from_json_str("{}").unwrap();
        assert_eq!(config, HuntConfig::default());
        assert_eq!(config.grid().cells(), 100);
    }

    #[test]
    fn test_full_json() {
        let config = HuntConfig::from_json_str(
            r#"{ "grid_size": 8, "seed": 42, "tie_break": "multiple_of_five_first" }"#,
        )
        .unwrap();

        assert_eq!(config.grid_size, 8);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.tie_break, TieBreak::MultipleOfFiveFirst);
    }

    #[test]
    fn test_invalid_grid_size() {
        assert!(matches!(
            HuntConfig::from_json_str(r#"{ "grid_size": 0 }"#),
            Err(ConfigError::InvalidGridSize(0))
        ));
        assert!(matches!(
            HuntConfig::from_json_str(r#"{ "grid_size": 5000 }"#),
            Err(ConfigError::InvalidGridSize(5000))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            HuntConfig::from_json_str(r#"{ "grid": 10 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            HuntConfig::from_file("/nonexistent/treasure-hunt.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
