//! KillCredit - Final attribution summary handed to death listeners

use crate::types::ObjectId;
use serde::{Deserialize, Serialize};

/// Damage one attacker contributed to a kill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub attacker: ObjectId,
    pub damage: i64,
}

/// Summary of a finalized ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillCredit {
    /// Enemy the ledger belonged to when it died
    pub enemy: ObjectId,
    pub died_at_ms: i64,
    pub total_damage: i64,
    pub last_hitter: Option<ObjectId>,
    /// Highest damage first; ties keep first-hit order
    pub contributors: Vec<Contribution>,
}

impl KillCredit {
    /// The attacker with the largest share, if anyone hit at all
    pub fn top_damager(&self) -> Option<ObjectId> {
        self.contributors.first().map(|c| c.attacker)
    }

    /// Share of total damage in `0.0..=1.0`
    pub fn share_of(&self, attacker: ObjectId) -> f64 {
        if self.total_damage <= 0 {
            return 0.0;
        }
        self.contributors
            .iter()
            .find(|c| c.attacker == attacker)
            .map(|c| c.damage as f64 / self.total_damage as f64)
            .unwrap_or(0.0)
    }

    /// Attackers whose share reaches `min_share`
    pub fn qualifying(&self, min_share: f64) -> impl Iterator<Item = ObjectId> + '_ {
        self.contributors
            .iter()
            .filter(move |c| self.share_of(c.attacker) >= min_share)
            .map(|c| c.attacker)
    }
}
