//! Combat constants configuration

use super::{load_toml, parse_toml, ConfigError};
use crate::defense::MitigationModel;
use crate::leech::LeechPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable combat constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub mitigation: MitigationConstants,
    #[serde(default)]
    pub leech: LeechConstants,
    #[serde(default)]
    pub bleeding: BleedingConstants,
}

impl CombatConstants {
    /// Load and validate constants from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let constants: CombatConstants = load_toml(path)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Parse and validate constants from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let constants: CombatConstants = parse_toml(content)?;
        constants.validate()?;
        Ok(constants)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let MitigationModel::MinimumFraction { fraction } = self.mitigation.model {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ConfigError::ValidationError(format!(
                    "mitigation fraction {} outside 0..=1",
                    fraction
                )));
            }
        }
        if self.bleeding.hp_divisor.is_nan() || self.bleeding.hp_divisor <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "bleeding hp_divisor must be positive, got {}",
                self.bleeding.hp_divisor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MitigationConstants {
    #[serde(default)]
    pub model: MitigationModel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeechConstants {
    /// Counter behavior for fractional steal rates
    #[serde(default)]
    pub policy: LeechPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleedingConstants {
    /// Bleeding drains `max_hp / hp_divisor` per second
    #[serde(default = "default_hp_divisor")]
    pub hp_divisor: f32,
}

impl Default for BleedingConstants {
    fn default() -> Self {
        BleedingConstants {
            hp_divisor: default_hp_divisor(),
        }
    }
}

fn default_hp_divisor() -> f32 {
    650.0
}
