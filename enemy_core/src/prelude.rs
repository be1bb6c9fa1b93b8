//! Prelude module for convenient imports
//!
//! ```rust
//! use enemy_core::prelude::*;
//! ```

// Core types
pub use crate::types::{ObjectId, ObjectType, Position, WorldId};
pub use crate::enemy::{Enemy, LifecycleState};

// Conditions
pub use crate::condition::{ConditionEffect, ConditionEffectKind, ConditionEffectSet, ConditionEffects, PERMANENT};

// Combat
pub use crate::attacker::{Attacker, PlayerState};
pub use crate::combat::{CombatContext, HitReport, Projectile};
pub use crate::ledger::KillCredit;
pub use crate::leech::StealRates;

// World
pub use crate::world::{DeathEvent, LocalWorld, World, WorldTime};

// Config
pub use crate::config::CombatConstants;
pub use crate::template::{EnemyTemplate, ProjectileDesc, TemplateStore};
