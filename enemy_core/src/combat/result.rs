//! HitReport and DamageNotification - Outcome of one resolved hit

use crate::condition::{ConditionEffect, ConditionEffects, DamageGate};
use crate::types::ObjectId;
use serde::{Deserialize, Serialize};

/// Damage event broadcast to nearby players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageNotification {
    pub target_id: ObjectId,
    /// Guaranteed effects of the projectile, empty for direct hits
    pub effects: ConditionEffects,
    pub damage_amount: u16,
    /// Whether the hit left the target below zero HP
    pub kill: bool,
    /// Projectile id, 0 for direct hits
    pub bullet_id: u8,
    pub object_id: ObjectId,
}

impl DamageNotification {
    pub(crate) fn wire_amount(mitigated: i32) -> u16 {
        u16::try_from(mitigated.max(0)).unwrap_or(u16::MAX)
    }
}

/// Full breakdown of one hit against an enemy
#[derive(Debug, Clone, PartialEq)]
pub struct HitReport {
    /// How conditions gated the hit
    pub gate: DamageGate,
    /// Damage before defense
    pub raw_damage: i32,
    /// Defense the hit faced
    pub defense: i32,
    /// Damage after defense, what the ledger and broadcast carry
    pub mitigated_damage: i32,
    /// Mitigated damage clamped to the HP the target had left
    pub effective_damage: i32,
    pub hp_before: i32,
    pub hp_after: i32,
    /// Effects that landed on the target
    pub effects_applied: Vec<ConditionEffect>,
    /// HP granted to the attacker by life steal
    pub life_stolen: i32,
    /// MP granted to the attacker by mana steal
    pub mana_stolen: i32,
    /// Whether the hit left the target below zero HP
    pub is_killing_blow: bool,
    /// Whether this hit ran the death transition
    pub death_fired: bool,
}

impl HitReport {
    /// Report for a hit that never got past gating
    pub fn blocked(gate: DamageGate, raw_damage: i32, hp: i32) -> Self {
        HitReport {
            gate,
            raw_damage,
            defense: 0,
            mitigated_damage: 0,
            effective_damage: 0,
            hp_before: hp,
            hp_after: hp,
            effects_applied: Vec::new(),
            life_stolen: 0,
            mana_stolen: 0,
            is_killing_blow: false,
            death_fired: false,
        }
    }

    /// Whether the hit was accepted by gating
    pub fn accepted(&self) -> bool {
        self.gate.passes()
    }

    /// Damage removed by defense
    pub fn damage_reduced_by_defense(&self) -> i32 {
        (self.raw_damage - self.mitigated_damage).max(0)
    }

    /// HP change on the target (0 when invulnerable)
    pub fn hp_change(&self) -> i32 {
        self.hp_after - self.hp_before
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        match self.gate {
            DamageGate::Immune => return "Immune".to_string(),
            DamageGate::Suppressed => return "Suppressed".to_string(),
            _ => {}
        }

        let mut parts = vec![format!("{} damage", self.mitigated_damage)];

        if self.damage_reduced_by_defense() > 0 {
            parts.push(format!("{} blocked by defense", self.damage_reduced_by_defense()));
        }

        if self.gate == DamageGate::Invulnerable {
            parts.push("invulnerable".to_string());
        }

        if !self.effects_applied.is_empty() {
            let names: Vec<String> = self
                .effects_applied
                .iter()
                .map(|e| format!("{:?}", e.kind))
                .collect();
            parts.push(format!("applied {}", names.join("/")));
        }

        if self.life_stolen > 0 {
            parts.push(format!("{} life stolen", self.life_stolen));
        }

        if self.mana_stolen > 0 {
            parts.push(format!("{} mana stolen", self.mana_stolen));
        }

        if self.is_killing_blow {
            parts.push("FATAL".to_string());
        }

        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionEffectKind;

    #[test]
    fn test_wire_amount_saturates() {
        assert_eq!(DamageNotification::wire_amount(20), 20);
        assert_eq!(DamageNotification::wire_amount(-3), 0);
        assert_eq!(DamageNotification::wire_amount(70_000), u16::MAX);
    }

    #[test]
    fn test_blocked_report() {
        let report = HitReport::blocked(DamageGate::Suppressed, 30, 50);
        assert!(!report.accepted());
        assert_eq!(report.hp_change(), 0);
        assert_eq!(report.summary(), "Suppressed");
    }

    #[test]
    fn test_summary_parts() {
        let mut report = HitReport::blocked(DamageGate::Open, 30, 15);
        report.defense = 10;
        report.mitigated_damage = 20;
        report.effective_damage = 15;
        report.hp_after = -5;
        report.is_killing_blow = true;
        report.effects_applied = vec![ConditionEffect::new(ConditionEffectKind::Slowed, 1000)];

        let summary = report.summary();
        assert!(summary.contains("20 damage"));
        assert!(summary.contains("10 blocked by defense"));
        assert!(summary.contains("Slowed"));
        assert!(summary.contains("FATAL"));
    }

    #[test]
    fn test_notification_serializes() {
        let notification = DamageNotification {
            target_id: ObjectId(5),
            effects: ConditionEffects::BLEEDING,
            damage_amount: 12,
            kill: false,
            bullet_id: 3,
            object_id: ObjectId(9),
        };
        let json = serde_json::to_string(&notification).unwrap();
        assert!(json.contains("\"damage_amount\":12"));
        let back: DamageNotification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, notification);
    }
}
