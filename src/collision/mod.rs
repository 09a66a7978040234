//! Collision detection and post-crash dynamics for pairs of agents.
//!
//! # Pipeline
//!
//! For two agents flagged as colliding:
//!
//! 1. Search backwards in time for the first contact of both footprints
//! 2. Record the collision angles at that moment (diagnostic)
//! 3. Advance by the penetration time and extract the contact plane
//! 4. Solve the impulse-momentum equations for both agents

pub mod angles;
pub mod contact_time;
pub mod footprint;
pub mod plane;
pub mod solver;

use tracing::{debug, info};

use crate::agent::AgentSnapshot;
use crate::error::{CollisionError, CollisionResult};

pub use angles::{collision_angles, opponent_yaw_angle, CollisionAngles};
pub use contact_time::first_contact;
pub use footprint::{agent_corners, footprint, footprint_at, Corner};
pub use plane::{collision_position, plane_of_contact, CollisionPosition, PlaneOfContact};
pub use solver::{post_crash_dynamic, PostCrashDynamic};

/// Source of the pre-crash yaw rate used by the momentum solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreCrashYawRate {
    /// Assume both agents do not rotate before the impact.
    #[default]
    Zero,
    /// Use the yaw rate of the agent snapshot.
    FromAgent,
}

/// Tunables of the collision computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PostCrashConfig {
    /// Coefficient of restitution in `[0, 1]`. Default: 0.2.
    pub coefficient_of_restitution: f64,
    /// Friction coefficient between the two vehicles. Default: 0.2.
    pub inter_friction: f64,
    /// Time after first contact at which the contact plane is taken [ms].
    /// Default: 20.
    pub penetration_time_ms: i32,
    /// Coarse step of the first-contact search [ms]. Default: 100.
    pub cycle_time_ms: i32,
    /// Maximum number of coarse steps before the search gives up.
    /// Default: 1000.
    pub max_backward_cycles: u32,
    /// Default: [`PreCrashYawRate::Zero`].
    pub pre_crash_yaw_rate: PreCrashYawRate,
}

impl Default for PostCrashConfig {
    fn default() -> Self {
        Self {
            coefficient_of_restitution: 0.2,
            inter_friction: 0.2,
            penetration_time_ms: 20,
            cycle_time_ms: 100,
            max_backward_cycles: 1000,
            pre_crash_yaw_rate: PreCrashYawRate::Zero,
        }
    }
}

impl PostCrashConfig {
    pub fn validate(&self) -> CollisionResult<()> {
        if !(0.0..=1.0).contains(&self.coefficient_of_restitution) {
            return Err(CollisionError::InvalidConfig(format!(
                "coefficient of restitution {} outside [0, 1]",
                self.coefficient_of_restitution
            )));
        }
        if !(self.inter_friction >= 0.0) {
            return Err(CollisionError::InvalidConfig(format!(
                "inter-agent friction {} is negative",
                self.inter_friction
            )));
        }
        if self.cycle_time_ms <= 0 {
            return Err(CollisionError::InvalidConfig(format!(
                "cycle time {} ms is not positive",
                self.cycle_time_ms
            )));
        }
        if self.penetration_time_ms < 0 {
            return Err(CollisionError::InvalidConfig(format!(
                "penetration time {} ms is negative",
                self.penetration_time_ms
            )));
        }
        Ok(())
    }
}

/// Result of a successful collision computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostCrashOutcome {
    pub agent1: PostCrashDynamic,
    pub agent2: PostCrashDynamic,
    /// Offset of the first contact relative to the snapshot time [ms].
    pub time_of_first_contact_ms: i32,
}

/// Entry point of the collision computation.
///
/// Holds the tunables and the collision angles of the last computed pair.
#[derive(Debug, Clone, Default)]
pub struct CollisionDetectionPostCrash {
    config: PostCrashConfig,
    angles: CollisionAngles,
}

impl CollisionDetectionPostCrash {
    pub fn new(config: PostCrashConfig) -> Self {
        Self {
            config,
            angles: CollisionAngles::default(),
        }
    }

    pub fn config(&self) -> &PostCrashConfig {
        &self.config
    }

    /// Collision angles of the most recent call to
    /// [`create_post_crash_dynamics`](Self::create_post_crash_dynamics).
    pub fn collision_angles(&self) -> CollisionAngles {
        self.angles
    }

    /// Compute the post-crash dynamics of two colliding agents.
    ///
    /// Both snapshots are taken at the current time and their footprints are
    /// expected to overlap.
    pub fn create_post_crash_dynamics(
        &mut self,
        agent1: &AgentSnapshot,
        agent2: &AgentSnapshot,
    ) -> CollisionResult<PostCrashOutcome> {
        self.config.validate()?;
        agent1.validate()?;
        agent2.validate()?;

        let time_of_first_contact_ms = first_contact(agent1, agent2, &self.config)?;

        self.angles = match collision_angles(agent1, agent2, time_of_first_contact_ms) {
            Ok(angles) => angles,
            Err(err) => {
                debug!(%err, "collision point angles unavailable");
                CollisionAngles {
                    oya: opponent_yaw_angle(agent1, agent2),
                    ..CollisionAngles::default()
                }
            }
        };

        let evaluation_time_ms = time_of_first_contact_ms
            .checked_add(self.config.penetration_time_ms)
            .ok_or_else(|| {
                CollisionError::InvalidConfig(format!(
                    "penetration time {} ms overflows the contact time",
                    self.config.penetration_time_ms
                ))
            })?;
        let position = collision_position(agent1, agent2, evaluation_time_ms)?;

        let (dynamic1, dynamic2) = post_crash_dynamic(
            position.cog1,
            agent1,
            position.cog2,
            agent2,
            &position.plane,
            &self.config,
        )?;

        info!(
            time_of_first_contact_ms,
            phi = position.plane.phi,
            velocity1 = dynamic1.velocity,
            velocity2 = dynamic2.velocity,
            sliding = dynamic1.sliding,
            "post-crash dynamics computed"
        );

        Ok(PostCrashOutcome {
            agent1: dynamic1,
            agent2: dynamic2,
            time_of_first_contact_ms,
        })
    }
}
