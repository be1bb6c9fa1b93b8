//! Enemy - A hostile world entity that takes damage, bleeds and dies

mod lifecycle;

pub use lifecycle::{Lifecycle, LifecycleState, TickOutcome};

use crate::attacker::Attacker;
use crate::combat::{resolve_direct_hit, resolve_projectile_hit, CombatContext, HitReport, Projectile};
use crate::condition::{ConditionEffect, ConditionEffectSet, DamageGate};
use crate::config::CombatConstants;
use crate::ledger::DamageLedger;
use crate::leech::LeechState;
use crate::template::EnemyTemplate;
use crate::types::{ObjectId, Position, SpawnPoint, WorldId};
use crate::world::{BehaviorHook, DeathListener, ListenerId};
use std::fmt;
use std::sync::Arc;

/// A live enemy
///
/// Owned by its world; every mutation goes through `&mut self`, so hits and
/// ticks for one world run on a single timeline.
pub struct Enemy {
    id: ObjectId,
    template: Arc<EnemyTemplate>,
    constants: Arc<CombatConstants>,
    position: Position,
    hp: i32,
    max_hp: i32,
    /// Zero template max HP; fixed at construction
    is_static: bool,
    conditions: ConditionEffectSet,
    world: Option<WorldId>,
    spawn_point: SpawnPoint,
    /// Non-owning link to the enemy that spawned this one
    parent: Option<ObjectId>,
    ledger: DamageLedger,
    leech: LeechState,
    lifecycle: Lifecycle,
    behavior: Option<Box<dyn BehaviorHook>>,
    death_listeners: Vec<(ListenerId, Box<dyn DeathListener>)>,
    next_listener_id: u32,
}

impl Enemy {
    pub fn new(
        id: ObjectId,
        template: Arc<EnemyTemplate>,
        constants: Arc<CombatConstants>,
        position: Position,
    ) -> Self {
        let is_static = template.is_static();
        Enemy {
            id,
            hp: template.max_hp,
            max_hp: template.max_hp,
            is_static,
            conditions: ConditionEffectSet::with_stasis_immunity(template.stasis_immune),
            template,
            constants,
            position,
            world: None,
            spawn_point: SpawnPoint::Unset,
            parent: None,
            ledger: DamageLedger::new(id),
            leech: LeechState::new(),
            lifecycle: Lifecycle::new(),
            behavior: None,
            death_listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    // === Damage entry points ===

    /// Melee-style hit. Returns damage dealt, clamped to the HP that was left.
    pub fn direct_damage(
        &mut self,
        ctx: &mut CombatContext<'_>,
        attacker: ObjectId,
        raw_damage: i32,
        ignore_defense: bool,
        effects: &[ConditionEffect],
    ) -> i32 {
        self.direct_damage_detailed(ctx, attacker, raw_damage, ignore_defense, effects)
            .effective_damage
    }

    /// Melee-style hit with the full breakdown
    pub fn direct_damage_detailed(
        &mut self,
        ctx: &mut CombatContext<'_>,
        attacker: ObjectId,
        raw_damage: i32,
        ignore_defense: bool,
        effects: &[ConditionEffect],
    ) -> HitReport {
        resolve_direct_hit(self, ctx, attacker, raw_damage, ignore_defense, effects)
    }

    /// Projectile impact. Returns whether the hit got past gating.
    pub fn projectile_damage(
        &mut self,
        ctx: &mut CombatContext<'_>,
        projectile: &Projectile,
        owner: &mut dyn Attacker,
    ) -> bool {
        self.projectile_damage_detailed(ctx, projectile, owner)
            .accepted()
    }

    /// Projectile impact with the full breakdown
    pub fn projectile_damage_detailed(
        &mut self,
        ctx: &mut CombatContext<'_>,
        projectile: &Projectile,
        owner: &mut dyn Attacker,
    ) -> HitReport {
        resolve_projectile_hit(self, ctx, projectile, owner)
    }

    /// How an incoming hit would be gated right now
    pub fn damage_gate(&self) -> DamageGate {
        if self.is_static || !self.in_world() || self.is_dead() {
            return DamageGate::Immune;
        }
        self.conditions.damage_gate()
    }

    // === Observers ===

    /// Attach the AI layer notified first on death
    pub fn set_behavior(&mut self, behavior: Box<dyn BehaviorHook>) {
        self.behavior = Some(behavior);
    }

    /// Register a death listener; listeners run in registration order
    pub fn add_death_listener<L: DeathListener + 'static>(&mut self, listener: L) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.death_listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_death_listener(&mut self, id: ListenerId) -> bool {
        let before = self.death_listeners.len();
        self.death_listeners.retain(|(listener_id, _)| *listener_id != id);
        self.death_listeners.len() != before
    }

    // === Ledger ===

    pub fn ledger(&self) -> &DamageLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut DamageLedger {
        &mut self.ledger
    }

    /// Adopt another ledger, returning the one this enemy held
    ///
    /// The adopted ledger is re-pointed at this enemy, so kill credit for
    /// linked enemies can be pooled without shared mutable aliasing.
    pub fn replace_ledger(&mut self, mut ledger: DamageLedger) -> DamageLedger {
        ledger.transfer_to(self.id);
        std::mem::replace(&mut self.ledger, ledger)
    }

    // === Accessors ===

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn template(&self) -> &EnemyTemplate {
        &self.template
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp;
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Override maximum HP (difficulty scaling, auras). Static enemies keep zero.
    pub fn set_max_hp(&mut self, max_hp: i32) {
        if self.is_static {
            return;
        }
        self.max_hp = max_hp.max(1);
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Where the enemy spawned; the current position until the first tick
    pub fn spawn_point(&self) -> Position {
        self.spawn_point.resolve(self.position)
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<ObjectId>) {
        self.parent = parent;
    }

    pub fn world(&self) -> Option<WorldId> {
        self.world
    }

    pub fn in_world(&self) -> bool {
        self.world.is_some()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_dead(&self) -> bool {
        self.lifecycle.state() == LifecycleState::Dead
    }

    pub fn conditions(&self) -> &ConditionEffectSet {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut ConditionEffectSet {
        &mut self.conditions
    }

    pub fn leech(&self) -> &LeechState {
        &self.leech
    }

    pub(crate) fn leech_mut(&mut self) -> &mut LeechState {
        &mut self.leech
    }
}

impl fmt::Debug for Enemy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enemy")
            .field("id", &self.id)
            .field("name", &self.template.name)
            .field("hp", &self.hp)
            .field("max_hp", &self.max_hp)
            .field("state", &self.lifecycle.state())
            .field("world", &self.world)
            .field("conditions", &self.conditions.mask())
            .finish_non_exhaustive()
    }
}
