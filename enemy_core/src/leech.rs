//! Leech - Life and mana steal granted to attackers per qualifying hit
//!
//! Rates of 1 or more grant that many points on every hit. Fractional rates
//! accumulate hits and grant a single point once `1 / rate` hits have landed.
//! Counters live on the enemy being hit, so progress does not carry over
//! when the attacker switches targets.

use serde::{Deserialize, Serialize};

/// What happens to a hit counter after it pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeechPolicy {
    /// Counter restarts from zero on every grant
    #[default]
    ResetOnGrant,
    /// Counter keeps growing, so every hit past the first threshold grants
    Accumulate,
}

/// Which pool a steal refills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeechResource {
    Life,
    Mana,
}

/// Life/mana steal rates exposed by an attacker
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StealRates {
    #[serde(default)]
    pub life: f32,
    #[serde(default)]
    pub mana: f32,
}

impl StealRates {
    pub fn new(life: f32, mana: f32) -> Self {
        StealRates { life, mana }
    }

    pub fn is_zero(&self) -> bool {
        self.life == 0.0 && self.mana == 0.0
    }
}

/// Hit counters for fractional steal, one per resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeechState {
    life_hits: u32,
    mana_hits: u32,
}

impl LeechState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self, resource: LeechResource) -> u32 {
        match resource {
            LeechResource::Life => self.life_hits,
            LeechResource::Mana => self.mana_hits,
        }
    }

    /// Run one qualifying hit through the counter for `resource`
    pub fn grant(
        &mut self,
        resource: LeechResource,
        rate: f32,
        current: i32,
        max: i32,
        policy: LeechPolicy,
    ) -> i32 {
        let slot = match resource {
            LeechResource::Life => &mut self.life_hits,
            LeechResource::Mana => &mut self.mana_hits,
        };
        grant(rate, current, max, slot, policy)
    }
}

/// Apply one qualifying hit and return the attacker's new resource value
///
/// # Arguments
/// * `rate` - Points per hit; fractional values accumulate across hits
/// * `current` - Attacker's current pool
/// * `max` - Attacker's maximum pool
/// * `counter` - Hit counter slot for this resource
/// * `policy` - Whether the counter resets when it pays out
pub fn grant(rate: f32, current: i32, max: i32, counter: &mut u32, policy: LeechPolicy) -> i32 {
    if !rate.is_finite() || rate <= 0.0 {
        return current;
    }

    if rate >= 1.0 {
        return add_capped(current, rate as i32, max);
    }

    *counter = counter.saturating_add(1);
    if *counter as f32 >= 1.0 / rate {
        if policy == LeechPolicy::ResetOnGrant {
            *counter = 0;
        }
        return add_capped(current, 1, max);
    }
    current
}

fn add_capped(current: i32, amount: i32, max: i32) -> i32 {
    if current >= max {
        return current;
    }
    current.saturating_add(amount).min(max)
}
