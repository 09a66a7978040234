//! Oriented rectangular footprints of agents.

use glam::DVec2;

use crate::agent::AgentSnapshot;
use crate::geometry::{Polygon, Vec2Ext};

/// Corner indices, counter-clockwise as required by the clipping routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpperLeft = 0,
    LowerLeft = 1,
    LowerRight = 2,
    UpperRight = 3,
}

/// The four global-frame corners of an agent's footprint, in [`Corner`]
/// order.
///
/// In the body frame the rectangle spans `[d - length, d]` longitudinally,
/// where `d` is the distance from the reference point to the leading edge,
/// and `±width / 2` laterally. The corners are rotated by the yaw and placed
/// at the reference point advanced by half the wheelbase along the heading.
pub fn agent_corners(agent: &AgentSnapshot) -> [DVec2; 4] {
    let heading = DVec2::new(agent.yaw.cos(), agent.yaw.sin());
    let center = agent.position + heading * (0.5 * agent.wheelbase());

    let front = agent.distance_reference_point_to_leading_edge;
    let rear = front - agent.length;
    let half_width = 0.5 * agent.width;

    let mut corners = [DVec2::ZERO; 4];
    corners[Corner::UpperLeft as usize] = DVec2::new(rear, half_width);
    corners[Corner::LowerLeft as usize] = DVec2::new(rear, -half_width);
    corners[Corner::LowerRight as usize] = DVec2::new(front, -half_width);
    corners[Corner::UpperRight as usize] = DVec2::new(front, half_width);

    for corner in &mut corners {
        *corner = corner.rotated(agent.yaw) + center;
    }
    corners
}

/// Footprint polygon of an agent.
pub fn footprint(agent: &AgentSnapshot) -> Polygon {
    Polygon::new(agent_corners(agent).to_vec())
}

/// Footprint extrapolated along the agent's velocity by `time_ms`
/// milliseconds (negative values look into the past).
pub fn footprint_at(agent: &AgentSnapshot, time_ms: i32) -> Polygon {
    footprint(agent).translated(displacement(agent, time_ms))
}

/// Distance travelled at constant velocity in `time_ms` milliseconds.
#[inline]
pub(crate) fn displacement(agent: &AgentSnapshot, time_ms: i32) -> DVec2 {
    agent.velocity * (f64::from(time_ms) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_corners_axis_aligned() {
        let agent = AgentSnapshot::centered(DVec2::new(1.0, 2.0), 0.0, 4.0, 2.0, 1000.0);
        let c = agent_corners(&agent);
        assert!((c[Corner::UpperLeft as usize] - DVec2::new(-1.0, 3.0)).length() < 1e-12);
        assert!((c[Corner::LowerLeft as usize] - DVec2::new(-1.0, 1.0)).length() < 1e-12);
        assert!((c[Corner::LowerRight as usize] - DVec2::new(3.0, 1.0)).length() < 1e-12);
        assert!((c[Corner::UpperRight as usize] - DVec2::new(3.0, 3.0)).length() < 1e-12);
        assert!(footprint(&agent).signed_area() > 0.0);
    }

    #[test]
    fn test_corners_asymmetric_reference_point() {
        // Reference point on the rear axle, 1 m in front of the rear bumper,
        // wheelbase 2.6 m.
        let mut agent = AgentSnapshot::centered(DVec2::ZERO, FRAC_PI_2, 4.5, 1.8, 1500.0);
        agent.distance_reference_point_to_leading_edge = 3.5;
        agent.vehicle.front_axle_x = 2.6;
        agent.vehicle.rear_axle_x = 0.0;

        let c = agent_corners(&agent);
        // Center shifted 1.3 m north, longitudinal span [-1.0, 3.5] rotated onto y.
        let front_y = 1.3 + 3.5;
        let rear_y = 1.3 - 1.0;
        assert!((c[Corner::UpperRight as usize] - DVec2::new(-0.9, front_y)).length() < 1e-12);
        assert!((c[Corner::LowerRight as usize] - DVec2::new(0.9, front_y)).length() < 1e-12);
        assert!((c[Corner::UpperLeft as usize] - DVec2::new(-0.9, rear_y)).length() < 1e-12);
        assert!((c[Corner::LowerLeft as usize] - DVec2::new(0.9, rear_y)).length() < 1e-12);
        assert!(footprint(&agent).signed_area() > 0.0);
    }

    #[test]
    fn test_footprint_at_extrapolates_velocity() {
        let agent = AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.0, 2.0, 1000.0)
            .with_velocity(DVec2::new(10.0, -5.0));
        let c = footprint_at(&agent, -200).centroid().unwrap();
        assert!((c - DVec2::new(-2.0, 1.0)).length() < 1e-12);
    }
}
