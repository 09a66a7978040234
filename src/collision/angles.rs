//! Collision angles describing where and at which relative heading two
//! agents first touched. Reporting only; the dynamics do not depend on them.

use glam::DVec2;

use crate::agent::AgentSnapshot;
use crate::error::{CollisionError, CollisionResult};
use crate::geometry::{intersection_points, Polygon, Vec2Ext};

use super::footprint::footprint_at;

/// Collision angles in degrees. "Host" is agent 1, "opponent" agent 2.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionAngles {
    /// Opponent yaw angle relative to the host.
    pub oya: f64,
    /// Host collision point angle, untransformed.
    pub hcpa_o: f64,
    /// Opponent collision point angle, untransformed.
    pub ocpa_o: f64,
    /// Host collision point angle, normalized by the host footprint.
    pub hcpa: f64,
    /// Opponent collision point angle, normalized by the opponent footprint.
    pub ocpa: f64,
}

/// Untransformed and footprint-normalized angle of the first point of
/// contact as seen from an agent's centroid.
fn contact_point_angles(first_point: DVec2, centroid: DVec2, agent: &AgentSnapshot) -> (f64, f64) {
    let local = (first_point - centroid).rotated(-agent.yaw);
    let original = local.angle().to_degrees();
    let transformed = (local.y / agent.width).atan2(local.x / agent.length).to_degrees();
    (original, transformed)
}

/// Heading of agent 2 relative to agent 1 [deg].
#[inline]
pub fn opponent_yaw_angle(agent1: &AgentSnapshot, agent2: &AgentSnapshot) -> f64 {
    (agent2.yaw - agent1.yaw).to_degrees()
}

/// Centroid of the intersection, or the mean of its vertices when the
/// footprints only touch along an edge or at a corner.
fn first_point_of_contact(intersection: Vec<DVec2>) -> CollisionResult<DVec2> {
    if intersection.is_empty() {
        return Err(CollisionError::GeometricDegeneracy(
            "footprints do not touch",
        ));
    }
    let count = intersection.len() as f64;
    let polygon = Polygon::new(intersection);
    Ok(polygon
        .centroid()
        .unwrap_or_else(|_| polygon.vertices().iter().sum::<DVec2>() / count))
}

/// Collision angles of both agents extrapolated by `time_shift_ms`.
///
/// The first contact usually is a touch with zero overlap area; the
/// contact point is then taken on the touching edge.
pub fn collision_angles(
    agent1: &AgentSnapshot,
    agent2: &AgentSnapshot,
    time_shift_ms: i32,
) -> CollisionResult<CollisionAngles> {
    let polygon1 = footprint_at(agent1, time_shift_ms);
    let polygon2 = footprint_at(agent2, time_shift_ms);
    let centroid1 = polygon1.centroid()?;
    let centroid2 = polygon2.centroid()?;

    let intersection = intersection_points(polygon1.vertices(), polygon2.vertices());
    let first_point = first_point_of_contact(intersection)?;

    let (hcpa_o, hcpa) = contact_point_angles(first_point, centroid1, agent1);
    let (ocpa_o, ocpa) = contact_point_angles(first_point, centroid2, agent2);

    Ok(CollisionAngles {
        oya: opponent_yaw_angle(agent1, agent2),
        hcpa_o,
        ocpa_o,
        hcpa,
        ocpa,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_head_on_angles() {
        let a = AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.5, 1.8, 1500.0).with_speed(10.0);
        let b = AgentSnapshot::centered(DVec2::new(4.1, 0.0), PI, 4.5, 1.8, 1500.0)
            .with_speed(10.0);
        let angles = collision_angles(&a, &b, 0).unwrap();
        assert!((angles.oya - 180.0).abs() < 1e-9);
        // Both agents are hit dead ahead.
        assert!(angles.hcpa_o.abs() < 1e-6);
        assert!(angles.hcpa.abs() < 1e-6);
        assert!(angles.ocpa_o.abs() < 1e-6);
        assert!(angles.ocpa.abs() < 1e-6);
    }

    #[test]
    fn test_side_impact_angles() {
        // Agent 1 drives into the left flank of agent 2.
        let a = AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.0, 2.0, 1500.0).with_speed(10.0);
        let b = AgentSnapshot::centered(DVec2::new(2.5, 0.0), FRAC_PI_2, 4.0, 2.0, 1500.0);
        let angles = collision_angles(&a, &b, 0).unwrap();
        assert!((angles.oya - 90.0).abs() < 1e-9);
        assert!(angles.hcpa_o.abs() < 1e-6);
        assert!((angles.ocpa_o - 90.0).abs() < 1e-6);
        assert!((angles.ocpa - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_angles_without_overlap_fail() {
        let a = AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.5, 1.8, 1500.0);
        let b = AgentSnapshot::centered(DVec2::new(50.0, 0.0), 0.0, 4.5, 1.8, 1500.0);
        assert!(matches!(
            collision_angles(&a, &b, 0),
            Err(CollisionError::GeometricDegeneracy(_))
        ));
    }

    #[test]
    fn test_touching_footprints() {
        // Front bumper of agent 1 flush with the rear bumper of agent 2.
        let a = AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.5, 1.8, 1500.0).with_speed(10.0);
        let b = AgentSnapshot::centered(DVec2::new(4.5, 0.0), 0.0, 4.5, 1.8, 1500.0);
        let angles = collision_angles(&a, &b, 0).unwrap();
        assert!(angles.oya.abs() < 1e-12);
        assert!(angles.hcpa_o.abs() < 1e-6);
        assert!(angles.hcpa.abs() < 1e-6);
        assert!((angles.ocpa_o.abs() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_first_point_of_degenerate_intersection() {
        let edge = vec![
            DVec2::new(2.0, 1.0),
            DVec2::new(2.0, -1.0),
            DVec2::new(2.0, -1.0),
            DVec2::new(2.0, 1.0),
        ];
        let point = first_point_of_contact(edge).unwrap();
        assert!((point - DVec2::new(2.0, 0.0)).length() < 1e-12);

        let corner = first_point_of_contact(vec![DVec2::new(1.0, 3.0)]).unwrap();
        assert!((corner - DVec2::new(1.0, 3.0)).length() < 1e-12);

        assert!(first_point_of_contact(Vec::new()).is_err());
    }

    #[test]
    fn test_normalized_angle_uses_footprint() {
        let agent = AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.0, 2.0, 1000.0);
        // Front-left corner: 26.57° untransformed, 45° normalized.
        let (original, transformed) =
            contact_point_angles(DVec2::new(2.0, 1.0), DVec2::ZERO, &agent);
        assert!((original - 0.5f64.atan().to_degrees()).abs() < 1e-9);
        assert!((transformed - 45.0).abs() < 1e-9);
    }
}
