//! enemy_core - Combat resolution library for hostile world entities
//!
//! This library provides:
//! - ConditionEffectSet: Timed status conditions and damage gating
//! - Defense mitigation: Flat defense against incoming hits
//! - DamageLedger: Per-attacker damage attribution and kill credit
//! - Leech: Life and mana steal with fractional rates
//! - Enemy: Spawning -> Active -> Dead lifecycle, bleeding and death notification

pub mod attacker;
pub mod combat;
pub mod condition;
pub mod config;
pub mod defense;
pub mod enemy;
pub mod ledger;
pub mod leech;
pub mod prelude;
pub mod template;
pub mod types;
pub mod world;

// Re-export core types for convenience
pub use attacker::{Attacker, PlayerState};
pub use combat::{CombatContext, DamageNotification, HitReport, Projectile};
pub use condition::{ConditionEffect, ConditionEffectKind, ConditionEffectSet, ConditionEffects, DamageGate};
pub use config::{CombatConstants, ConfigError};
pub use defense::{mitigate, MitigationModel};
pub use enemy::{Enemy, LifecycleState, TickOutcome};
pub use ledger::{DamageLedger, KillCredit};
pub use leech::{LeechPolicy, StealRates};
pub use template::{EnemyTemplate, ProjectileDesc, TemplateStore};
pub use types::{ObjectId, ObjectType, Position, WorldId};
pub use world::{BehaviorHook, DeathEvent, DeathListener, LocalWorld, World, WorldTime};
