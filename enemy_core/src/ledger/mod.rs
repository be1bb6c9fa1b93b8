//! Damage attribution ledger - Who hurt an enemy, and by how much

mod credit;

pub use credit::{Contribution, KillCredit};

use crate::types::ObjectId;
use crate::world::WorldTime;
use std::collections::HashMap;

/// Per-enemy record of damage dealt by each attacking player
///
/// Created with the enemy and finalized exactly once when it dies. An enemy
/// can adopt another ledger through [`DamageLedger::transfer_to`], which
/// re-points the owner instead of aliasing it.
#[derive(Debug, Clone)]
pub struct DamageLedger {
    owner: ObjectId,
    /// Accumulated damage per attacker
    damage: HashMap<ObjectId, i64>,
    /// Order in which attackers first landed a hit
    first_hit_order: Vec<ObjectId>,
    last_hitter: Option<ObjectId>,
    last_hit_ms: Option<i64>,
    last_projectile: Option<u8>,
    finalized: bool,
}

impl DamageLedger {
    pub fn new(owner: ObjectId) -> Self {
        DamageLedger {
            owner,
            damage: HashMap::new(),
            first_hit_order: Vec::new(),
            last_hitter: None,
            last_hit_ms: None,
            last_projectile: None,
            finalized: false,
        }
    }

    /// The enemy this ledger currently attributes damage to
    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    /// Hand this ledger to a different enemy, keeping accumulated damage
    pub fn transfer_to(&mut self, new_owner: ObjectId) {
        if new_owner != self.owner {
            tracing::debug!(from = %self.owner, to = %new_owner, "damage ledger transferred");
        }
        self.owner = new_owner;
    }

    /// Record a hit. Ignored once the ledger has been finalized.
    pub fn hit_by(&mut self, attacker: ObjectId, time: &WorldTime, projectile: Option<u8>, amount: i32) {
        if self.finalized {
            tracing::warn!(enemy = %self.owner, attacker = %attacker, "hit recorded after death ignored");
            return;
        }
        if !self.damage.contains_key(&attacker) {
            self.first_hit_order.push(attacker);
        }
        *self.damage.entry(attacker).or_insert(0) += i64::from(amount.max(0));
        self.last_hitter = Some(attacker);
        self.last_hit_ms = Some(time.total_elapsed_ms);
        self.last_projectile = projectile;
    }

    /// Damage attributed to one attacker so far
    pub fn damage_by(&self, attacker: ObjectId) -> i64 {
        self.damage.get(&attacker).copied().unwrap_or(0)
    }

    pub fn total_damage(&self) -> i64 {
        self.damage.values().sum()
    }

    pub fn attacker_count(&self) -> usize {
        self.damage.len()
    }

    pub fn last_hitter(&self) -> Option<ObjectId> {
        self.last_hitter
    }

    pub fn last_projectile(&self) -> Option<u8> {
        self.last_projectile
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Close the ledger and summarize kill credit
    ///
    /// Returns `None` if the ledger was already finalized.
    pub fn finalize(&mut self, time: &WorldTime) -> Option<KillCredit> {
        if self.finalized {
            return None;
        }
        self.finalized = true;

        let mut contributors: Vec<Contribution> = self
            .first_hit_order
            .iter()
            .map(|attacker| Contribution {
                attacker: *attacker,
                damage: self.damage_by(*attacker),
            })
            .collect();
        // Stable sort keeps first-hit order among equal contributions
        contributors.sort_by(|a, b| b.damage.cmp(&a.damage));

        Some(KillCredit {
            enemy: self.owner,
            died_at_ms: time.total_elapsed_ms,
            total_damage: self.total_damage(),
            last_hitter: self.last_hitter,
            contributors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> WorldTime {
        WorldTime::new(0, ms, 0)
    }

    #[test]
    fn test_accumulates_per_attacker() {
        let mut ledger = DamageLedger::new(ObjectId(1));
        ledger.hit_by(ObjectId(10), &at(0), None, 30);
        ledger.hit_by(ObjectId(11), &at(5), Some(3), 12);
        ledger.hit_by(ObjectId(10), &at(9), None, 20);

        assert_eq!(ledger.damage_by(ObjectId(10)), 50);
        assert_eq!(ledger.damage_by(ObjectId(11)), 12);
        assert_eq!(ledger.damage_by(ObjectId(99)), 0);
        assert_eq!(ledger.total_damage(), 62);
        assert_eq!(ledger.attacker_count(), 2);
        assert_eq!(ledger.last_hitter(), Some(ObjectId(10)));
        assert_eq!(ledger.last_projectile(), None);
    }

    #[test]
    fn test_finalize_once() {
        let mut ledger = DamageLedger::new(ObjectId(1));
        ledger.hit_by(ObjectId(10), &at(0), None, 5);

        let credit = ledger.finalize(&at(100)).unwrap();
        assert_eq!(credit.enemy, ObjectId(1));
        assert_eq!(credit.died_at_ms, 100);
        assert!(ledger.is_finalized());
        assert!(ledger.finalize(&at(200)).is_none());
    }

    #[test]
    fn test_hits_after_finalize_ignored() {
        let mut ledger = DamageLedger::new(ObjectId(1));
        ledger.finalize(&at(0));
        ledger.hit_by(ObjectId(10), &at(1), None, 5);
        assert_eq!(ledger.total_damage(), 0);
    }

    #[test]
    fn test_contributors_sorted_with_first_hit_tiebreak() {
        let mut ledger = DamageLedger::new(ObjectId(1));
        ledger.hit_by(ObjectId(12), &at(0), None, 10);
        ledger.hit_by(ObjectId(11), &at(1), None, 40);
        ledger.hit_by(ObjectId(13), &at(2), None, 10);

        let credit = ledger.finalize(&at(3)).unwrap();
        let order: Vec<ObjectId> = credit.contributors.iter().map(|c| c.attacker).collect();
        assert_eq!(order, vec![ObjectId(11), ObjectId(12), ObjectId(13)]);
        assert_eq!(credit.top_damager(), Some(ObjectId(11)));
        assert_eq!(credit.last_hitter, Some(ObjectId(13)));
    }

    #[test]
    fn test_transfer_keeps_damage() {
        let mut ledger = DamageLedger::new(ObjectId(1));
        ledger.hit_by(ObjectId(10), &at(0), None, 25);
        ledger.transfer_to(ObjectId(2));

        assert_eq!(ledger.owner(), ObjectId(2));
        let credit = ledger.finalize(&at(1)).unwrap();
        assert_eq!(credit.enemy, ObjectId(2));
        assert_eq!(credit.total_damage, 25);
    }

    #[test]
    fn test_negative_amount_not_credited() {
        let mut ledger = DamageLedger::new(ObjectId(1));
        ledger.hit_by(ObjectId(10), &at(0), None, -5);
        assert_eq!(ledger.damage_by(ObjectId(10)), 0);
        assert_eq!(ledger.last_hitter(), Some(ObjectId(10)));
    }
}
