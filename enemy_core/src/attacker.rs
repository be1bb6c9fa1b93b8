//! Attacker - The player-like side of a hit

use crate::condition::{ConditionEffect, ConditionEffectKind, ConditionEffectSet};
use crate::leech::StealRates;
use crate::types::ObjectId;

/// A player (or player-like actor) dealing damage
///
/// Leech mutates the attacker through the resource setters, never the target.
pub trait Attacker {
    fn id(&self) -> ObjectId;

    /// Condition query used to gate leech (Sick blocks life, Quiet blocks mana)
    fn has_condition(&self, kind: ConditionEffectKind) -> bool;

    /// Steal rates, if the attacker has any steal gear at all
    fn steal_rates(&self) -> Option<StealRates>;

    fn hp(&self) -> i32;
    fn max_hp(&self) -> i32;
    fn set_hp(&mut self, hp: i32);

    fn mp(&self) -> i32;
    fn max_mp(&self) -> i32;
    fn set_mp(&mut self, mp: i32);
}

/// Plain attacker state for simulations and tests
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: ObjectId,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub steal: Option<StealRates>,
    pub conditions: ConditionEffectSet,
}

impl PlayerState {
    pub fn new(id: ObjectId, max_hp: i32, max_mp: i32) -> Self {
        PlayerState {
            id,
            hp: max_hp,
            max_hp,
            mp: max_mp,
            max_mp,
            steal: None,
            conditions: ConditionEffectSet::new(),
        }
    }

    pub fn with_steal(mut self, rates: StealRates) -> Self {
        self.steal = Some(rates);
        self
    }

    pub fn with_resources(mut self, hp: i32, mp: i32) -> Self {
        self.hp = hp;
        self.mp = mp;
        self
    }

    pub fn with_condition(mut self, effect: ConditionEffect) -> Self {
        self.conditions.apply(effect);
        self
    }
}

impl Attacker for PlayerState {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn has_condition(&self, kind: ConditionEffectKind) -> bool {
        self.conditions.has(kind)
    }

    fn steal_rates(&self) -> Option<StealRates> {
        self.steal.filter(|rates| !rates.is_zero())
    }

    fn hp(&self) -> i32 {
        self.hp
    }

    fn max_hp(&self) -> i32 {
        self.max_hp
    }

    fn set_hp(&mut self, hp: i32) {
        self.hp = hp;
    }

    fn mp(&self) -> i32 {
        self.mp
    }

    fn max_mp(&self) -> i32 {
        self.max_mp
    }

    fn set_mp(&mut self, mp: i32) {
        self.mp = mp;
    }
}
