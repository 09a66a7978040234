//! Per-cycle systems over agent entities.

use hecs::Entity;

use crate::response::{CollisionResponseState, DynamicsSignal, PostCrashResponse, PostCrashVelocity};

use super::components::{Agent, CollisionPartners};

/// Run the post-crash response for every agent and return the signals of
/// the agents that are in, or have been in, a collision.
pub fn post_crash_response_system(
    world: &mut hecs::World,
    response: &PostCrashResponse,
    cycle_time_ms: i32,
) -> Vec<(Entity, DynamicsSignal)> {
    let mut signals = Vec::new();
    for (entity, (agent, partners, post_crash, state)) in world.query_mut::<(
        &Agent,
        &CollisionPartners,
        &mut PostCrashVelocity,
        &mut CollisionResponseState,
    )>() {
        let signal = response.trigger(&agent.0, state, partners.len(), post_crash, cycle_time_ms);
        if state.active {
            signals.push((entity, signal));
        }
    }
    signals
}
