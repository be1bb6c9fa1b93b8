//! Projectile - One fired shot and its secondary-effect roll

use crate::condition::{ConditionEffect, ConditionEffects};
use crate::template::ProjectileDesc;
use crate::types::ObjectId;
use rand::Rng;
use std::sync::Arc;

/// A projectile instance hitting an enemy
#[derive(Debug, Clone)]
pub struct Projectile {
    /// Per-owner bullet id, echoed in the damage broadcast
    pub id: u8,
    pub owner: ObjectId,
    /// Damage rolled when the shot was fired
    pub damage: i32,
    pub desc: Arc<ProjectileDesc>,
}

impl Projectile {
    pub fn new(id: u8, owner: ObjectId, damage: i32, desc: Arc<ProjectileDesc>) -> Self {
        Projectile {
            id,
            owner,
            damage,
            desc,
        }
    }

    /// Fire a shot with damage rolled from the descriptor's range
    pub fn fire(id: u8, owner: ObjectId, desc: Arc<ProjectileDesc>, rng: &mut impl Rng) -> Self {
        let damage = desc.roll_damage(rng);
        Projectile::new(id, owner, damage, desc)
    }

    /// Guaranteed effect mask carried on the wire
    pub fn condition_effects(&self) -> ConditionEffects {
        self.desc.effect_mask()
    }

    /// Effects this hit applies: the guaranteed list plus at most one rolled extra
    pub fn effects_for_hit<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ConditionEffect> {
        let mut effects = self.desc.effects.clone();
        if let Some(extra) = roll_secondary_effect(&self.desc, rng) {
            effects.push(extra);
        }
        effects
    }
}

/// Roll each chance row once; the last row that succeeds is the one applied
pub fn roll_secondary_effect<R: Rng + ?Sized>(
    desc: &ProjectileDesc,
    rng: &mut R,
) -> Option<ConditionEffect> {
    let mut extra = None;
    for row in &desc.cond_chance {
        if row.chance == 0 || row.effect.is_noop() {
            continue;
        }
        if f64::from(row.chance) / 100.0 > rng.gen::<f64>() {
            extra = Some(row.effect);
        }
    }
    extra
}
