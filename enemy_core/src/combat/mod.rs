//! Combat resolution - Apply melee hits and projectile impacts to enemies

mod projectile;
mod resolution;
mod result;

pub use projectile::{roll_secondary_effect, Projectile};
pub use resolution::{resolve_direct_hit, resolve_projectile_hit};
pub use result::{DamageNotification, HitReport};

use crate::world::{World, WorldTime};
use rand::RngCore;

/// Per-step handles a hit needs from its world
///
/// The RNG belongs to the world (or the caller's step), never to a single hit.
pub struct CombatContext<'a> {
    pub world: &'a mut dyn World,
    pub time: WorldTime,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> CombatContext<'a> {
    pub fn new(world: &'a mut dyn World, time: WorldTime, rng: &'a mut dyn RngCore) -> Self {
        CombatContext { world, time, rng }
    }
}
