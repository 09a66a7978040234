//! Impulse-momentum solution of a planar two-body impact.
//!
//! The impact is resolved in the coordinate frame of the contact plane
//! (tangent `t`, normal `n`). The compression impulse brings the relative
//! velocity of the point of impact to zero; the total impulse scales it by
//! `1 + e`, with `e` the coefficient of restitution.

use glam::DVec2;
use tracing::warn;

use crate::agent::AgentSnapshot;
use crate::error::{CollisionError, CollisionResult};
use crate::geometry::Vec2Ext;

use super::plane::PlaneOfContact;
use super::{PostCrashConfig, PreCrashYawRate};

/// Relative size of the system determinant below which the solve is refused.
const DETERMINANT_TOLERANCE: f64 = 1e-12;

/// Post-compression relative velocity above which the solve is reported [m/s].
const RESIDUAL_TOLERANCE: f64 = 1e-3;

/// Post-crash state of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PostCrashDynamic {
    /// Post-crash speed of the COG [m/s].
    pub velocity: f64,
    /// Magnitude of the velocity change (delta-v) [m/s].
    pub velocity_change: f64,
    /// Direction of the post-crash velocity [rad].
    pub velocity_direction: f64,
    /// Post-crash yaw rate [rad/s].
    pub yaw_velocity: f64,
    /// Collision impulse in the global frame [N·s].
    pub pulse: DVec2,
    /// Direction of the impulse [rad].
    pub pulse_direction: f64,
    /// Impulse acting on this agent in its own frame [N·s].
    pub pulse_local: DVec2,
    /// Point of impact relative to the COG in the agent frame [m].
    pub point_of_contact_local: DVec2,
    /// Pre-crash speed [m/s].
    pub collision_velocity: f64,
    /// Tangential impulse exceeded the friction limit; the no-slip result is
    /// an approximation.
    pub sliding: bool,
}

/// Kinematic input of one body, expressed relative to the point of impact.
struct Body {
    mass: f64,
    inertia: f64,
    yaw: f64,
    yaw_rate: f64,
    speed: f64,
    velocity: DVec2,
    /// COG offset from the point of impact along the plane normal.
    n: f64,
    /// COG offset from the point of impact along the plane tangent.
    t: f64,
}

impl Body {
    fn new(
        cog: DVec2,
        agent: &AgentSnapshot,
        plane: &PlaneOfContact,
        yaw_rate: PreCrashYawRate,
        tangent: DVec2,
        normal: DVec2,
    ) -> Self {
        // The heading stands in for the direction of travel.
        let speed = agent.speed();
        let offset = cog - plane.point_of_impact;
        Self {
            mass: agent.mass(),
            inertia: agent.moment_of_inertia_yaw(),
            yaw: agent.yaw,
            yaw_rate: match yaw_rate {
                PreCrashYawRate::Zero => 0.0,
                PreCrashYawRate::FromAgent => agent.yaw_rate,
            },
            speed,
            velocity: DVec2::new(agent.yaw.cos(), agent.yaw.sin()) * speed,
            n: normal.dot(offset),
            t: tangent.dot(offset),
        }
    }

    /// Velocity of the point of impact as (tangential, normal) components.
    fn poi_velocity(&self, tangent: DVec2, normal: DVec2) -> (f64, f64) {
        (
            tangent.dot(self.velocity) + self.yaw_rate * self.n,
            normal.dot(self.velocity) - self.yaw_rate * self.t,
        )
    }
}

/// Compute the post-crash dynamics of both agents.
///
/// `cog1` and `cog2` are the footprint centroids at the time of evaluation,
/// `plane` the contact plane between them. Sliding collisions are flagged,
/// not rejected.
pub fn post_crash_dynamic(
    cog1: DVec2,
    agent1: &AgentSnapshot,
    cog2: DVec2,
    agent2: &AgentSnapshot,
    plane: &PlaneOfContact,
    config: &PostCrashConfig,
) -> CollisionResult<(PostCrashDynamic, PostCrashDynamic)> {
    let phi = plane.phi;
    let tangent = DVec2::new(phi.cos(), phi.sin());
    let normal = DVec2::new(-phi.sin(), phi.cos());

    let b1 = Body::new(cog1, agent1, plane, config.pre_crash_yaw_rate, tangent, normal);
    let b2 = Body::new(cog2, agent2, plane, config.pre_crash_yaw_rate, tangent, normal);

    let (v1_tang, v1_norm) = b1.poi_velocity(tangent, normal);
    let (v2_tang, v2_norm) = b2.poi_velocity(tangent, normal);
    let vrel_tang = v1_tang - v2_tang;
    let vrel_norm = v1_norm - v2_norm;

    let inv_mass = 1.0 / b1.mass + 1.0 / b2.mass;
    let c1 = inv_mass + b1.n * b1.n / b1.inertia + b2.n * b2.n / b2.inertia;
    let c2 = inv_mass + b1.t * b1.t / b1.inertia + b2.t * b2.t / b2.inertia;
    let c3 = b1.t * b1.n / b1.inertia + b2.t * b2.n / b2.inertia;
    let determinant = c3 * c3 - c1 * c2;
    if !(determinant.abs() > DETERMINANT_TOLERANCE * (c1 * c2).abs()) {
        return Err(CollisionError::SolveDegeneracy { determinant });
    }

    // Compression phase
    let tc = (c3 * vrel_norm + c2 * vrel_tang) / determinant;
    let nc = (c1 * vrel_norm + c3 * vrel_tang) / determinant;
    let sliding = tc.abs() > (config.inter_friction * nc).abs();

    let residual_tang = vrel_tang + c1 * tc - c3 * nc;
    let residual_norm = vrel_norm - c3 * tc + c2 * nc;
    if residual_tang.abs() > RESIDUAL_TOLERANCE || residual_norm.abs() > RESIDUAL_TOLERANCE {
        warn!(
            residual_tang,
            residual_norm, "relative post-compression velocity is not zero"
        );
    }

    let scale = 1.0 + config.coefficient_of_restitution;
    let t_total = tc * scale;
    let n_total = nc * scale;

    let pulse = DVec2::new(t_total, n_total).rotated(phi);
    let pulse_direction = pulse.angle();

    let v1_post = DVec2::new(
        t_total / b1.mass + tangent.dot(b1.velocity),
        n_total / b1.mass + normal.dot(b1.velocity),
    )
    .rotated(phi);
    let v2_post = DVec2::new(
        -t_total / b2.mass + tangent.dot(b2.velocity),
        -n_total / b2.mass + normal.dot(b2.velocity),
    )
    .rotated(phi);

    let yaw_velocity1 = (t_total * b1.n - n_total * b1.t) / b1.inertia + b1.yaw_rate;
    let yaw_velocity2 = (-t_total * b2.n + n_total * b2.t) / b2.inertia + b2.yaw_rate;

    let dynamic = |body: &Body, cog: DVec2, post: DVec2, yaw_velocity: f64, sign: f64| {
        PostCrashDynamic {
            velocity: post.length(),
            velocity_change: (body.velocity - post).length(),
            velocity_direction: post.angle(),
            yaw_velocity,
            pulse,
            pulse_direction,
            pulse_local: pulse.rotated(-body.yaw) * sign,
            point_of_contact_local: (plane.point_of_impact - cog).rotated(-body.yaw),
            collision_velocity: body.speed,
            sliding,
        }
    };

    Ok((
        dynamic(&b1, cog1, v1_post, yaw_velocity1, 1.0),
        dynamic(&b2, cog2, v2_post, yaw_velocity2, -1.0),
    ))
}
