//! Mitigation - Flat defense subtracted from each hit

use super::constants::{ARMORED_MULTIPLIER, MINIMUM_DAMAGE_FRACTION};
use crate::condition::{ConditionEffectKind, ConditionEffectSet};
use serde::{Deserialize, Serialize};

/// How defense turns raw damage into applied damage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MitigationModel {
    /// `raw - defense`, floored at zero
    Linear,
    /// `raw - defense`, but never below `raw * fraction`
    MinimumFraction { fraction: f32 },
}

impl Default for MitigationModel {
    fn default() -> Self {
        MitigationModel::MinimumFraction {
            fraction: MINIMUM_DAMAGE_FRACTION,
        }
    }
}

/// Reduce raw damage by defense
///
/// Monotonic non-increasing in `defense`, never negative, and never more
/// than `raw` for positive raw damage. Negative defense is treated as zero.
///
/// # Arguments
/// * `raw` - Incoming damage before mitigation
/// * `defense` - The effective defense of the target
/// * `model` - The mitigation formula
pub fn mitigate(raw: i32, defense: i32, model: MitigationModel) -> i32 {
    if raw <= 0 {
        return 0;
    }
    let defense = defense.max(0);
    let after_defense = raw.saturating_sub(defense).max(0);

    match model {
        MitigationModel::Linear => after_defense,
        MitigationModel::MinimumFraction { fraction } => {
            let floor = (raw as f32 * fraction.clamp(0.0, 1.0)) as i32;
            after_defense.max(floor)
        }
    }
}

/// Defense a hit actually faces after conditions and piercing
///
/// Armored doubles defense, ArmorBroken removes it, and piercing hits ignore it.
pub fn effective_defense(base: i32, conditions: &ConditionEffectSet, ignore_defense: bool) -> i32 {
    if ignore_defense || conditions.has(ConditionEffectKind::ArmorBroken) {
        return 0;
    }
    if conditions.has(ConditionEffectKind::Armored) {
        return base.saturating_mul(ARMORED_MULTIPLIER);
    }
    base
}
