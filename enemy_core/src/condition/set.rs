//! ConditionEffectSet - Active conditions on one entity, keyed by kind

use super::{ConditionEffect, ConditionEffectKind, ConditionEffects, DamageGate, PERMANENT};
use std::collections::BTreeMap;

/// Active conditions with their remaining duration in milliseconds
#[derive(Debug, Clone, Default)]
pub struct ConditionEffectSet {
    /// Remaining milliseconds per kind ([`PERMANENT`] never expires)
    active: BTreeMap<ConditionEffectKind, i32>,
    /// Template-level stasis immunity, checked at apply time
    stasis_immune: bool,
}

impl ConditionEffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty set for an entity whose template rejects stasis
    pub fn with_stasis_immunity(stasis_immune: bool) -> Self {
        ConditionEffectSet {
            active: BTreeMap::new(),
            stasis_immune,
        }
    }

    pub fn has(&self, kind: ConditionEffectKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Remaining duration of an active condition
    pub fn remaining(&self, kind: ConditionEffectKind) -> Option<i32> {
        self.active.get(&kind).copied()
    }

    pub fn is_stasis_immune(&self) -> bool {
        self.stasis_immune || self.has(ConditionEffectKind::StasisImmune)
    }

    /// Insert or overwrite a condition. Last applied duration wins.
    ///
    /// Returns false when the effect was rejected (no-op descriptor or stasis immunity).
    pub fn apply(&mut self, effect: ConditionEffect) -> bool {
        if effect.is_noop() {
            return false;
        }
        if effect.kind == ConditionEffectKind::Stasis && self.is_stasis_immune() {
            tracing::debug!("stasis rejected by immunity");
            return false;
        }
        let duration = if effect.duration_ms < 0 {
            PERMANENT
        } else {
            effect.duration_ms
        };
        self.active.insert(effect.kind, duration);
        true
    }

    /// Apply several effects in order, returning the ones that landed
    pub fn apply_all(&mut self, effects: &[ConditionEffect]) -> Vec<ConditionEffect> {
        effects
            .iter()
            .copied()
            .filter(|effect| self.apply(*effect))
            .collect()
    }

    pub fn remove(&mut self, kind: ConditionEffectKind) -> bool {
        self.active.remove(&kind).is_some()
    }

    /// Advance timed conditions by `elapsed_ms`, returning the kinds that expired
    pub fn tick(&mut self, elapsed_ms: i32) -> Vec<ConditionEffectKind> {
        let mut expired = Vec::new();
        for (kind, remaining) in self.active.iter_mut() {
            if *remaining == PERMANENT {
                continue;
            }
            *remaining -= elapsed_ms;
            if *remaining <= 0 {
                expired.push(*kind);
            }
        }
        for kind in &expired {
            self.active.remove(kind);
        }
        expired
    }

    /// Bitmask of everything currently active
    pub fn mask(&self) -> ConditionEffects {
        self.active.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Classify how the current conditions gate an incoming hit
    pub fn damage_gate(&self) -> DamageGate {
        if self.has(ConditionEffectKind::Invincible) {
            DamageGate::Immune
        } else if self.has(ConditionEffectKind::Paused) || self.has(ConditionEffectKind::Stasis) {
            DamageGate::Suppressed
        } else if self.has(ConditionEffectKind::Invulnerable) {
            DamageGate::Invulnerable
        } else {
            DamageGate::Open
        }
    }
}
