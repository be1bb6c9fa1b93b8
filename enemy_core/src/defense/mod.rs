//! Defense system - Flat defense mitigation of incoming hits

mod mitigation;

pub use mitigation::{effective_defense, mitigate, MitigationModel};

/// Defense calculation constants
pub mod constants {
    /// Share of raw damage that always gets through defense
    pub const MINIMUM_DAMAGE_FRACTION: f32 = 0.15;

    /// Defense multiplier while Armored
    pub const ARMORED_MULTIPLIER: i32 = 2;
}
