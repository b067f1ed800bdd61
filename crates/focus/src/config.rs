//! Focus engine tuning
//!
//! Configuration file: ~/.config/netjack/focus.yaml
//!
//! Every field is optional; a missing file yields the stock tuning.

use crate::error::{FocusError, Result};
use netjack_core::Paths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tuning knobs for a focus engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Starting and maximum focus
    #[serde(default = "default_maximum")]
    pub maximum: f64,

    /// Focus at or below this enters overload
    #[serde(default = "default_overload_threshold")]
    pub overload_threshold: f64,

    /// Base drain multiplier restored when overload clears
    #[serde(default = "default_drain_rate")]
    pub drain_rate: f64,

    /// Base focus regained per regeneration tick
    #[serde(default = "default_regen_rate")]
    pub regen_rate: f64,

    /// Quiet period after an action before regeneration resumes (ms)
    #[serde(default = "default_regen_delay_ms")]
    pub regen_delay_ms: i64,

    /// Background regeneration tick (ms)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Concurrently active stimulants before overdose
    #[serde(default = "default_max_active_stimulants")]
    pub max_active_stimulants: usize,

    /// Focus below which minor effects may appear
    #[serde(default = "default_low_focus_effect_threshold")]
    pub low_focus_effect_threshold: f64,

    /// Chance of a minor effect per action under low focus
    #[serde(default = "default_low_focus_effect_chance")]
    pub low_focus_effect_chance: f64,

    /// Fixed RNG seed; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_maximum() -> f64 {
    100.0
}

fn default_overload_threshold() -> f64 {
    20.0
}

fn default_drain_rate() -> f64 {
    1.0
}

fn default_regen_rate() -> f64 {
    0.5
}

fn default_regen_delay_ms() -> i64 {
    5000
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_max_active_stimulants() -> usize {
    2
}

fn default_low_focus_effect_threshold() -> f64 {
    30.0
}

fn default_low_focus_effect_chance() -> f64 {
    0.3
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            maximum: default_maximum(),
            overload_threshold: default_overload_threshold(),
            drain_rate: default_drain_rate(),
            regen_rate: default_regen_rate(),
            regen_delay_ms: default_regen_delay_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            max_active_stimulants: default_max_active_stimulants(),
            low_focus_effect_threshold: default_low_focus_effect_threshold(),
            low_focus_effect_chance: default_low_focus_effect_chance(),
            seed: None,
        }
    }
}

impl FocusConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let paths = Paths::new();
        Self::load_from(&paths.config_file("focus"))
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| FocusError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|err| match err {
            ParseFailure::Yaml(source) => FocusError::ConfigParse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::Invalid(e) => e,
        })
    }

    /// Parse and validate YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        Self::parse(content).map_err(|err| match err {
            ParseFailure::Yaml(source) => FocusError::InvalidConfig(source.to_string()),
            ParseFailure::Invalid(e) => e,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, ParseFailure> {
        // An empty file is a valid "all defaults" config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).map_err(ParseFailure::Yaml)?;
        config.validate().map_err(ParseFailure::Invalid)?;
        Ok(config)
    }

    /// Reject tunings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.maximum > 0.0) {
            return Err(FocusError::InvalidConfig(format!(
                "maximum must be positive, got {}",
                self.maximum
            )));
        }
        if !(self.overload_threshold > 0.0 && self.overload_threshold < self.maximum) {
            return Err(FocusError::InvalidConfig(format!(
                "overload_threshold must be within (0, {}), got {}",
                self.maximum, self.overload_threshold
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(FocusError::InvalidConfig(
                "tick_interval_ms must be non-zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.low_focus_effect_chance) {
            return Err(FocusError::InvalidConfig(format!(
                "low_focus_effect_chance must be within [0, 1], got {}",
                self.low_focus_effect_chance
            )));
        }
        if self.regen_rate < 0.0 || self.drain_rate < 0.0 || self.regen_delay_ms < 0 {
            return Err(FocusError::InvalidConfig(
                "rates and delays must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Regeneration tick as a Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

enum ParseFailure {
    Yaml(serde_yaml::Error),
    Invalid(FocusError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = FocusConfig::default();
        assert_eq!(config.maximum, 100.0);
        assert_eq!(config.overload_threshold, 20.0);
        assert_eq!(config.regen_rate, 0.5);
        assert_eq!(config.max_active_stimulants, 2);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = FocusConfig::from_yaml("regen_rate: 1.5\nseed: 7\n").unwrap();
        assert_eq!(config.regen_rate, 1.5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.maximum, 100.0);
        assert_eq!(config.regen_delay_ms, 5000);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(FocusConfig::from_yaml("  \n").unwrap(), FocusConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let err = FocusConfig::from_yaml("maximum: 50\noverload_threshold: 60\n").unwrap_err();
        assert!(matches!(err, FocusError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_bad_chance() {
        let config = FocusConfig {
            low_focus_effect_chance: 1.5,
            ..FocusConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let path = env::temp_dir().join(format!("focus_config_missing_{}.yaml", std::process::id()));
        let _ = fs::remove_file(&path);
        assert_eq!(FocusConfig::load_from(&path).unwrap(), FocusConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = env::temp_dir().join(format!("focus_config_load_{}.yaml", std::process::id()));
        fs::write(&path, "tick_interval_ms: 250\nmax_active_stimulants: 3\n").unwrap();

        let config = FocusConfig::load_from(&path).unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.max_active_stimulants, 3);

        fs::write(&path, "maximum: [not, a, number]\n").unwrap();
        let err = FocusConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, FocusError::ConfigParse { .. }));

        let _ = fs::remove_file(&path);
    }
}
