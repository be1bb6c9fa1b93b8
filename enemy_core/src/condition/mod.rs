//! Condition effects - Timed status flags and the gates they put on damage

mod set;

pub use set::ConditionEffectSet;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Duration value meaning "until explicitly removed"
pub const PERMANENT: i32 = -1;

/// Every status an entity can carry. Discriminants double as bit indices on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ConditionEffectKind {
    Dead = 0,
    Quiet = 1,
    Weak = 2,
    Slowed = 3,
    Sick = 4,
    Dazed = 5,
    Stunned = 6,
    Blind = 7,
    Hallucinating = 8,
    Drunk = 9,
    Confused = 10,
    StunImmune = 11,
    Invisible = 12,
    Paralyzed = 13,
    Speedy = 14,
    Bleeding = 15,
    Healing = 17,
    Damaging = 18,
    Berserk = 19,
    Paused = 20,
    Stasis = 21,
    StasisImmune = 22,
    Invincible = 23,
    Invulnerable = 24,
    Armored = 25,
    ArmorBroken = 26,
    Hexed = 27,
    NinjaSpeedy = 28,
}

impl ConditionEffectKind {
    /// Bit position of this kind in a [`ConditionEffects`] mask
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Single-bit mask for this kind
    pub fn flag(self) -> ConditionEffects {
        ConditionEffects::from_bits_retain(1u64 << self.index())
    }
}

bitflags! {
    /// Wire bitmask of condition effects, one bit per [`ConditionEffectKind`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ConditionEffects: u64 {
        const DEAD          = 1 << 0;
        const QUIET         = 1 << 1;
        const WEAK          = 1 << 2;
        const SLOWED        = 1 << 3;
        const SICK          = 1 << 4;
        const DAZED         = 1 << 5;
        const STUNNED       = 1 << 6;
        const BLIND         = 1 << 7;
        const HALLUCINATING = 1 << 8;
        const DRUNK         = 1 << 9;
        const CONFUSED      = 1 << 10;
        const STUN_IMMUNE   = 1 << 11;
        const INVISIBLE     = 1 << 12;
        const PARALYZED     = 1 << 13;
        const SPEEDY        = 1 << 14;
        const BLEEDING      = 1 << 15;
        const HEALING       = 1 << 17;
        const DAMAGING      = 1 << 18;
        const BERSERK       = 1 << 19;
        const PAUSED        = 1 << 20;
        const STASIS        = 1 << 21;
        const STASIS_IMMUNE = 1 << 22;
        const INVINCIBLE    = 1 << 23;
        const INVULNERABLE  = 1 << 24;
        const ARMORED       = 1 << 25;
        const ARMOR_BROKEN  = 1 << 26;
        const HEXED         = 1 << 27;
        const NINJA_SPEEDY  = 1 << 28;
    }
}

impl FromIterator<ConditionEffectKind> for ConditionEffects {
    fn from_iter<I: IntoIterator<Item = ConditionEffectKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ConditionEffects::empty(), |mask, kind| mask | kind.flag())
    }
}

/// A status to apply, with its duration in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionEffect {
    pub kind: ConditionEffectKind,
    /// Milliseconds; [`PERMANENT`] keeps it until removed, 0 is a no-op descriptor
    #[serde(default)]
    pub duration_ms: i32,
}

impl ConditionEffect {
    pub fn new(kind: ConditionEffectKind, duration_ms: i32) -> Self {
        ConditionEffect { kind, duration_ms }
    }

    pub fn permanent(kind: ConditionEffectKind) -> Self {
        ConditionEffect {
            kind,
            duration_ms: PERMANENT,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.duration_ms == PERMANENT
    }

    /// Zero-duration descriptors carry nothing and are skipped everywhere
    pub fn is_noop(&self) -> bool {
        self.duration_ms == 0
    }
}

/// How an entity's current conditions gate an incoming hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageGate {
    /// Normal resolution
    Open,
    /// Everything resolves except the HP subtraction
    Invulnerable,
    /// Paused or in stasis: no damage and no side effects, sentinel result
    Suppressed,
    /// Invincible: nothing happens at all
    Immune,
}

impl DamageGate {
    /// Whether the hit proceeds past gating
    pub fn passes(self) -> bool {
        matches!(self, DamageGate::Open | DamageGate::Invulnerable)
    }
}
