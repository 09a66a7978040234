//! hecs integration: agents as entities, collision partner bookkeeping and
//! the per-cycle collision systems.

pub mod components;
pub mod manipulator;
pub mod systems;

pub mod prelude {
    pub use super::components::{spawn_agent, Agent, CollisionPartner, CollisionPartners};
    pub use super::manipulator::{CollisionEvent, CollisionManipulator, CollisionOpponent};
    pub use super::systems::post_crash_response_system;
}
