//! World collaborators - The surfaces the combat core calls out to

use crate::combat::DamageNotification;
use crate::ledger::KillCredit;
use crate::types::{ObjectId, ObjectType, Position, WorldId};
use serde::{Deserialize, Serialize};

/// Simulation clock for one world step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorldTime {
    pub tick_count: i64,
    /// Milliseconds since the world started
    pub total_elapsed_ms: i64,
    /// Milliseconds since the previous tick
    pub elapsed_ms_delta: i32,
}

impl WorldTime {
    pub fn new(tick_count: i64, total_elapsed_ms: i64, elapsed_ms_delta: i32) -> Self {
        WorldTime {
            tick_count,
            total_elapsed_ms,
            elapsed_ms_delta,
        }
    }

    /// The next step after this one, `delta_ms` later
    pub fn advance(&self, delta_ms: i32) -> Self {
        WorldTime {
            tick_count: self.tick_count + 1,
            total_elapsed_ms: self.total_elapsed_ms + i64::from(delta_ms),
            elapsed_ms_delta: delta_ms,
        }
    }
}

/// Delivery priority of a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketPriority {
    High,
    Normal,
    Low,
}

/// The world an enemy lives in
///
/// Broadcasts are fire-and-forget: implementations queue and return.
pub trait World {
    fn id(&self) -> WorldId;

    /// Send a damage event to players near `origin`, skipping `excluded`
    fn broadcast_nearby(
        &mut self,
        notification: DamageNotification,
        origin: ObjectId,
        excluded: Option<ObjectId>,
        priority: PacketPriority,
    );

    /// Remove a dead entity from the world
    fn leave_world(&mut self, entity: ObjectId);
}

/// Everything observers learn about a death
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathEvent {
    pub enemy: ObjectId,
    pub object_type: ObjectType,
    pub position: Position,
    pub time: WorldTime,
    /// `None` only if the ledger was somehow closed already
    pub kill_credit: Option<KillCredit>,
}

/// The AI/behavior layer attached to an enemy. Observational only.
pub trait BehaviorHook: Send {
    fn on_death(&mut self, event: &DeathEvent);
}

/// External subscriber to an enemy's death
pub trait DeathListener: Send {
    fn on_death(&mut self, event: &DeathEvent);
}

impl<F> DeathListener for F
where
    F: FnMut(&DeathEvent) + Send,
{
    fn on_death(&mut self, event: &DeathEvent) {
        self(event)
    }
}

/// Handle returned when registering a death listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u32);

/// A world that queues broadcasts and departures in memory
#[derive(Debug, Clone)]
pub struct LocalWorld {
    id: WorldId,
    /// Broadcasts in the order they were sent
    pub broadcasts: Vec<Broadcast>,
    /// Entities that left the world, in order
    pub departed: Vec<ObjectId>,
}

/// One queued broadcast
#[derive(Debug, Clone, PartialEq)]
pub struct Broadcast {
    pub notification: DamageNotification,
    pub origin: ObjectId,
    pub excluded: Option<ObjectId>,
    pub priority: PacketPriority,
}

impl LocalWorld {
    pub fn new(id: WorldId) -> Self {
        LocalWorld {
            id,
            broadcasts: Vec::new(),
            departed: Vec::new(),
        }
    }

    /// Take every queued broadcast, leaving the queue empty
    pub fn drain_broadcasts(&mut self) -> Vec<Broadcast> {
        std::mem::take(&mut self.broadcasts)
    }
}

impl World for LocalWorld {
    fn id(&self) -> WorldId {
        self.id
    }

    fn broadcast_nearby(
        &mut self,
        notification: DamageNotification,
        origin: ObjectId,
        excluded: Option<ObjectId>,
        priority: PacketPriority,
    ) {
        self.broadcasts.push(Broadcast {
            notification,
            origin,
            excluded,
            priority,
        });
    }

    fn leave_world(&mut self, entity: ObjectId) {
        self.departed.push(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_time_advance() {
        let time = WorldTime::default().advance(200).advance(150);
        assert_eq!(time.tick_count, 2);
        assert_eq!(time.total_elapsed_ms, 350);
        assert_eq!(time.elapsed_ms_delta, 150);
    }

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |event: &DeathEvent| seen.push(event.enemy);
            let event = DeathEvent {
                enemy: ObjectId(4),
                object_type: ObjectType(1),
                position: Position::default(),
                time: WorldTime::default(),
                kill_credit: None,
            };
            DeathListener::on_death(&mut listener, &event);
        }
        assert_eq!(seen, vec![ObjectId(4)]);
    }

    #[test]
    fn test_local_world_records() {
        let mut world = LocalWorld::new(WorldId(1));
        world.leave_world(ObjectId(3));
        assert_eq!(world.departed, vec![ObjectId(3)]);
        assert_eq!(world.id(), WorldId(1));
        assert!(world.drain_broadcasts().is_empty());
    }
}
