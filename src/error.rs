//! Error types for collision detection and the post-crash solve.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type CollisionResult<T> = Result<T, CollisionError>;

/// Reasons why no collision response can be computed for a pair of agents.
///
/// None of these are fatal for the simulation: the caller skips the collision
/// response for this cycle and may retry on the next one while the pair is
/// still flagged as colliding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    /// A polygon has fewer than three vertices or (almost) zero area, or no
    /// contact plane direction can be extracted from it.
    #[error("degenerate geometry: {0}")]
    GeometricDegeneracy(&'static str),

    /// The agents barely move relative to each other, or the backward search
    /// hit its step bound before the footprints separated.
    #[error("first contact search did not converge (relative speed {relative_speed} m/s)")]
    NoConvergence { relative_speed: f64 },

    /// The bisection never observed overlapping footprints.
    #[error("no overlap observed while searching for first contact")]
    NoContactFound,

    /// The 2x2 impulse system is (nearly) singular.
    #[error("impulse system is singular (determinant {determinant})")]
    SolveDegeneracy { determinant: f64 },

    /// An agent snapshot carries a physically meaningless value.
    #[error("invalid agent: {0}")]
    InvalidAgent(String),

    /// A tunable is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
