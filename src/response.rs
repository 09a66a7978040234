//! Per-agent dynamics after a collision.
//!
//! On the cycle a new collision partner shows up, the agent is set onto the
//! post-crash velocity computed by the collision code. Afterwards it keeps
//! sliding along that direction while decelerating at a constant rate.

use glam::DVec2;
use tracing::debug;

use crate::agent::AgentSnapshot;
use crate::collision::PostCrashDynamic;

/// Post-crash velocity handed from the collision computation to the agent's
/// dynamics. Consumed (deactivated) by the first response that reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PostCrashVelocity {
    pub is_active: bool,
    /// Speed [m/s].
    pub velocity_absolute: f64,
    /// Direction of travel [rad].
    pub velocity_direction: f64,
    /// Yaw rate [rad/s].
    pub yaw_velocity: f64,
}

impl From<&PostCrashDynamic> for PostCrashVelocity {
    fn from(dynamic: &PostCrashDynamic) -> Self {
        Self {
            is_active: true,
            velocity_absolute: dynamic.velocity,
            velocity_direction: dynamic.velocity_direction,
            yaw_velocity: dynamic.yaw_velocity,
        }
    }
}

/// Whether the response currently drives the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentState {
    #[default]
    Disabled,
    Acting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPhase {
    #[default]
    NoCollision,
    /// The cycle in which the post-crash velocity was applied.
    CollisionImpulse,
    /// Fading out after the impulse.
    Collision,
}

/// Collision state of one agent, owned by the caller across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResponseState {
    /// Number of collision partners already responded to.
    pub known_partners: usize,
    /// A collision has happened at some point.
    pub active: bool,
    pub phase: CollisionPhase,
    /// Current fading speed [m/s].
    pub velocity: f64,
    /// Direction of the fading motion [rad].
    pub moving_direction: f64,
    pub component_state: ComponentState,
}

/// Dynamics output for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DynamicsSignal {
    pub component_state: ComponentState,
    pub yaw: f64,
    pub yaw_rate: f64,
    pub yaw_acceleration: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub travel_distance: f64,
}

/// Tunables of the post-crash response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseConfig {
    /// Constant deceleration while fading out [m/s²]. Default: 10.
    pub fading_deceleration: f64,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            fading_deceleration: 10.0,
        }
    }
}

/// Turns stored post-crash velocities into per-cycle dynamics signals.
#[derive(Debug, Clone, Default)]
pub struct PostCrashResponse {
    config: ResponseConfig,
}

impl PostCrashResponse {
    pub fn new(config: ResponseConfig) -> Self {
        Self { config }
    }

    /// Compute this cycle's dynamics signal for `agent`.
    ///
    /// `partner_count` is the agent's current number of collision partners.
    /// When it grew since the last call and `post_crash` is active, the
    /// post-crash velocity is applied and consumed. In every other case the
    /// agent fades out along its last post-crash direction.
    pub fn trigger(
        &self,
        agent: &AgentSnapshot,
        state: &mut CollisionResponseState,
        partner_count: usize,
        post_crash: &mut PostCrashVelocity,
        cycle_time_ms: i32,
    ) -> DynamicsSignal {
        let dt = f64::from(cycle_time_ms) / 1000.0;

        if partner_count > state.known_partners {
            state.known_partners = partner_count;
            state.active = true;
            state.component_state = ComponentState::Acting;

            if post_crash.is_active {
                let signal = self.impulse(agent, state, post_crash, dt);
                *post_crash = PostCrashVelocity::default();
                return signal;
            }
            debug!(partner_count, "new collision partner without post-crash velocity");
        }

        self.fading(agent, state, dt)
    }

    fn impulse(
        &self,
        agent: &AgentSnapshot,
        state: &mut CollisionResponseState,
        post_crash: &PostCrashVelocity,
        dt: f64,
    ) -> DynamicsSignal {
        let position = agent.position + agent.velocity * dt;
        let yaw_rate_previous = agent.yaw_rate;

        state.velocity = post_crash.velocity_absolute;
        state.moving_direction = post_crash.velocity_direction;
        state.phase = CollisionPhase::CollisionImpulse;

        DynamicsSignal {
            component_state: state.component_state,
            yaw: agent.yaw + yaw_rate_previous * dt,
            yaw_rate: post_crash.yaw_velocity,
            yaw_acceleration: (post_crash.yaw_velocity - yaw_rate_previous) / dt,
            velocity: state.velocity,
            acceleration: 0.0,
            position_x: position.x,
            position_y: position.y,
            travel_distance: state.velocity * dt,
        }
    }

    fn fading(
        &self,
        agent: &AgentSnapshot,
        state: &mut CollisionResponseState,
        dt: f64,
    ) -> DynamicsSignal {
        state.velocity = (state.velocity - self.config.fading_deceleration * dt).max(0.0);
        if state.active {
            state.phase = CollisionPhase::Collision;
        }

        let ds = state.velocity * dt;
        let position = agent.position
            + DVec2::new(state.moving_direction.cos(), state.moving_direction.sin()) * ds;

        DynamicsSignal {
            component_state: state.component_state,
            yaw: agent.yaw,
            yaw_rate: agent.yaw_rate,
            yaw_acceleration: agent.yaw_acceleration,
            velocity: state.velocity,
            acceleration: 0.0,
            position_x: position.x,
            position_y: position.y,
            travel_distance: ds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn agent() -> AgentSnapshot {
        let mut agent = AgentSnapshot::centered(DVec2::new(10.0, 5.0), 0.0, 4.5, 1.8, 1500.0)
            .with_speed(10.0);
        agent.yaw_rate = 0.1;
        agent
    }

    fn post_crash() -> PostCrashVelocity {
        PostCrashVelocity {
            is_active: true,
            velocity_absolute: 4.0,
            velocity_direction: PI,
            yaw_velocity: 0.6,
        }
    }

    #[test]
    fn test_no_collision_stays_disabled() {
        let response = PostCrashResponse::default();
        let mut state = CollisionResponseState::default();
        let mut velocity = PostCrashVelocity::default();

        let signal = response.trigger(&agent(), &mut state, 0, &mut velocity, 100);
        assert_eq!(signal.component_state, ComponentState::Disabled);
        assert_eq!(state.phase, CollisionPhase::NoCollision);
        assert_eq!(signal.velocity, 0.0);
        assert!((signal.position_x - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_new_collision_applies_impulse() {
        let response = PostCrashResponse::default();
        let mut state = CollisionResponseState::default();
        let mut velocity = post_crash();

        let signal = response.trigger(&agent(), &mut state, 1, &mut velocity, 100);
        assert_eq!(signal.component_state, ComponentState::Acting);
        assert_eq!(state.phase, CollisionPhase::CollisionImpulse);
        assert_eq!(state.known_partners, 1);
        // Position advances with the pre-crash velocity.
        assert!((signal.position_x - 11.0).abs() < 1e-12);
        assert!((signal.yaw - 0.01).abs() < 1e-12);
        assert!((signal.yaw_rate - 0.6).abs() < 1e-12);
        assert!((signal.yaw_acceleration - 5.0).abs() < 1e-9);
        assert!((signal.velocity - 4.0).abs() < 1e-12);
        assert!((signal.travel_distance - 0.4).abs() < 1e-12);
        // Consumed.
        assert_eq!(velocity, PostCrashVelocity::default());
    }

    #[test]
    fn test_fading_after_impulse() {
        let response = PostCrashResponse::default();
        let mut state = CollisionResponseState::default();
        let mut velocity = post_crash();
        let agent = agent();

        response.trigger(&agent, &mut state, 1, &mut velocity, 100);
        let signal = response.trigger(&agent, &mut state, 1, &mut velocity, 100);
        assert_eq!(state.phase, CollisionPhase::Collision);
        assert_eq!(signal.component_state, ComponentState::Acting);
        // 4 m/s - 10 m/s² * 0.1 s, moving towards -x.
        assert!((signal.velocity - 3.0).abs() < 1e-12);
        assert!((signal.travel_distance - 0.3).abs() < 1e-12);
        assert!((signal.position_x - 9.7).abs() < 1e-12);
        assert!((signal.yaw_rate - agent.yaw_rate).abs() < 1e-12);

        for _ in 0..10 {
            response.trigger(&agent, &mut state, 1, &mut velocity, 100);
        }
        assert_eq!(state.velocity, 0.0);
    }

    #[test]
    fn test_new_partner_without_velocity_fades() {
        let response = PostCrashResponse::default();
        let mut state = CollisionResponseState::default();
        let mut velocity = PostCrashVelocity::default();

        let signal = response.trigger(&agent(), &mut state, 1, &mut velocity, 100);
        assert_eq!(signal.component_state, ComponentState::Acting);
        assert_eq!(state.phase, CollisionPhase::Collision);
        assert_eq!(signal.velocity, 0.0);
    }

    #[test]
    fn test_second_partner_applies_again() {
        let response = PostCrashResponse::new(ResponseConfig {
            fading_deceleration: 5.0,
        });
        let mut state = CollisionResponseState::default();
        let agent = agent();

        let mut first = post_crash();
        response.trigger(&agent, &mut state, 1, &mut first, 100);

        let mut second = PostCrashVelocity {
            velocity_absolute: 7.0,
            ..post_crash()
        };
        let signal = response.trigger(&agent, &mut state, 2, &mut second, 100);
        assert_eq!(state.known_partners, 2);
        assert!((signal.velocity - 7.0).abs() < 1e-12);

        let signal = response.trigger(&agent, &mut state, 2, &mut second, 100);
        assert!((signal.velocity - 6.5).abs() < 1e-12);
    }
}
