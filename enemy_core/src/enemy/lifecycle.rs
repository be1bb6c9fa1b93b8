//! Lifecycle - Spawning -> Active -> Dead, with a one-way death guard

use super::Enemy;
use crate::condition::{ConditionEffectKind, ConditionEffect};
use crate::types::{SpawnPoint, WorldId};
use crate::world::{DeathEvent, World, WorldTime};
use std::sync::atomic::{AtomicU8, Ordering};

/// Where an enemy is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// Constructed or placed in a world, not ticked yet
    Spawning = 0,
    /// Ticking
    Active = 1,
    /// Terminal
    Dead = 2,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Spawning,
            1 => LifecycleState::Active,
            _ => LifecycleState::Dead,
        }
    }
}

/// Atomic lifecycle cell. The transition into Dead succeeds exactly once.
#[derive(Debug)]
pub struct Lifecycle(AtomicU8);

impl Lifecycle {
    pub fn new() -> Self {
        Lifecycle(AtomicU8::new(LifecycleState::Spawning as u8))
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Spawning -> Active. Returns true only on the first call.
    pub fn activate(&self) -> bool {
        self.0
            .compare_exchange(
                LifecycleState::Spawning as u8,
                LifecycleState::Active as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Any live state -> Dead. Returns true for exactly one caller.
    pub fn try_kill(&self) -> bool {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                (state != LifecycleState::Dead as u8).then_some(LifecycleState::Dead as u8)
            })
            .is_ok()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// What one tick did to an enemy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// HP lost to bleeding
    pub bled: i32,
    /// Conditions that ran out
    pub expired: Vec<ConditionEffectKind>,
}

impl Enemy {
    /// Place the enemy in a world and apply template immunities
    pub fn enter_world(&mut self, world: WorldId) {
        if self.lifecycle.state() == LifecycleState::Dead {
            tracing::warn!(enemy = %self.id, "dead enemy cannot enter a world");
            return;
        }
        self.world = Some(world);
        if self.template.stasis_immune {
            self.conditions
                .apply(ConditionEffect::permanent(ConditionEffectKind::StasisImmune));
        }
        tracing::debug!(enemy = %self.id, name = %self.template.name, "enemy spawned");
    }

    /// Advance one simulation step
    ///
    /// Captures the spawn point on the first tick, drains HP while Bleeding
    /// (`max_hp / divisor` per second of elapsed time), then expires timed
    /// conditions. Bleeding alone never runs the death transition.
    pub fn tick(&mut self, time: &WorldTime) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.lifecycle.state() == LifecycleState::Dead {
            return outcome;
        }

        if !self.spawn_point.is_set() {
            self.spawn_point = SpawnPoint::Fixed(self.position);
        }
        self.lifecycle.activate();

        if !self.is_static && self.conditions.has(ConditionEffectKind::Bleeding) {
            let drain = (self.max_hp as f32 / self.constants.bleeding.hp_divisor
                * time.elapsed_ms_delta as f32
                / 1000.0) as i32;
            self.hp = self.hp.saturating_sub(drain);
            outcome.bled = drain;
        }

        outcome.expired = self.conditions.tick(time.elapsed_ms_delta);
        outcome
    }

    /// Terminal transition: finalize credit, notify observers, leave the world
    ///
    /// Returns false without side effects if the enemy is already dead.
    pub fn death(&mut self, world: &mut dyn World, time: &WorldTime) -> bool {
        if !self.lifecycle.try_kill() {
            tracing::warn!(enemy = %self.id, "death requested for an enemy that is already dead");
            return false;
        }

        let kill_credit = self.ledger.finalize(time);
        let event = DeathEvent {
            enemy: self.id,
            object_type: self.template.object_type,
            position: self.position,
            time: *time,
            kill_credit,
        };

        tracing::info!(
            enemy = %self.id,
            name = %self.template.name,
            hp = self.hp,
            top_damager = ?event.kill_credit.as_ref().and_then(|c| c.top_damager()),
            "enemy died"
        );

        if let Some(behavior) = self.behavior.as_mut() {
            behavior.on_death(&event);
        }
        for (_, listener) in self.death_listeners.iter_mut() {
            listener.on_death(&event);
        }

        match self.world.take() {
            Some(owner) => {
                if owner != world.id() {
                    tracing::warn!(enemy = %self.id, "death reported to a different world");
                }
                world.leave_world(self.id);
            }
            None => tracing::warn!(enemy = %self.id, "enemy died outside any world"),
        }
        true
    }
}
