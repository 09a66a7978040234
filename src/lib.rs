//! Collision detection and post-crash dynamics for traffic simulation.
//!
//! Given two vehicle agents whose rectangular footprints overlap, the crate
//! finds the moment and location of first contact and resolves the impact
//! with 2D impulse-momentum mechanics.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **geometry** - Vectors, convex polygons, Sutherland–Hodgman clipping
//! 2. **agent** - Read-only agent snapshots
//! 3. **collision** - First-contact search, contact plane, impulse solve
//! 4. **report** - Flat crash report of one collision
//! 5. **response** - Per-cycle dynamics signal after a collision
//! 6. **ecs** - hecs integration and collision manipulator (feature = "ecs")

pub mod agent;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod report;
pub mod response;

#[cfg(feature = "ecs")]
pub mod ecs;

pub use agent::{AgentSnapshot, VehicleModelParameters};

pub use collision::{
    CollisionAngles, CollisionDetectionPostCrash, PlaneOfContact, PostCrashConfig,
    PostCrashDynamic, PostCrashOutcome, PreCrashYawRate,
};

pub use error::{CollisionError, CollisionResult};

pub use geometry::{Polygon, Vec2Ext, VertexType};

pub use report::{CrashReport, ReportValue};

pub use response::{
    CollisionPhase, CollisionResponseState, ComponentState, DynamicsSignal, PostCrashResponse,
    PostCrashVelocity, ResponseConfig,
};

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

// Re-export glam for convenience
pub use glam;
