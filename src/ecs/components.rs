//! Components attached to agent entities.

use crate::agent::AgentSnapshot;
use crate::response::{CollisionResponseState, PostCrashVelocity};

/// Current snapshot of an agent, refreshed by the caller every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent(pub AgentSnapshot);

/// Something an agent has collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionPartner {
    Agent(hecs::Entity),
    /// Static world object, by its external id.
    Object(u64),
}

/// Everything an agent has collided with, directly or through a chain of
/// collisions, in the order the partners were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionPartners(Vec<CollisionPartner>);

impl CollisionPartners {
    /// Add a partner. Returns false if it was already known.
    pub fn insert(&mut self, partner: CollisionPartner) -> bool {
        if self.0.contains(&partner) {
            return false;
        }
        self.0.push(partner);
        true
    }

    pub fn contains(&self, partner: &CollisionPartner) -> bool {
        self.0.contains(partner)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollisionPartner> {
        self.0.iter()
    }
}

/// Spawn an agent entity with all collision components.
pub fn spawn_agent(world: &mut hecs::World, snapshot: AgentSnapshot) -> hecs::Entity {
    world.spawn((
        Agent(snapshot),
        CollisionPartners::default(),
        PostCrashVelocity::default(),
        CollisionResponseState::default(),
    ))
}
