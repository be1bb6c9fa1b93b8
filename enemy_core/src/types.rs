//! Core identifiers and positions shared across the combat core

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime object id of anything living in a world (enemy, player, projectile owner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub i32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i32> for ObjectId {
    fn from(id: i32) -> Self {
        ObjectId(id)
    }
}

/// Identifier of the world instance an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// Template key for an enemy or projectile kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectType(pub u16);

/// World-space position in tiles
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Fixed point an enemy returns to, captured lazily on its first tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SpawnPoint {
    #[default]
    Unset,
    Fixed(Position),
}

impl SpawnPoint {
    /// Resolve to a concrete position, using `fallback` while unset
    pub fn resolve(&self, fallback: Position) -> Position {
        match self {
            SpawnPoint::Unset => fallback,
            SpawnPoint::Fixed(pos) => *pos,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, SpawnPoint::Fixed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_point_resolve() {
        let here = Position::new(3.0, 4.0);
        assert_eq!(SpawnPoint::Unset.resolve(here), here);

        let fixed = SpawnPoint::Fixed(Position::new(1.0, 1.0));
        assert_eq!(fixed.resolve(here), Position::new(1.0, 1.0));
        assert!(fixed.is_set());
        assert!(!SpawnPoint::default().is_set());
    }

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < f32::EPSILON);
    }
}
