//! Contact plane and point of impact of two overlapping footprints.

use glam::DVec2;

use crate::agent::AgentSnapshot;
use crate::error::{CollisionError, CollisionResult};
use crate::geometry::{
    fold_half_turn, intersection_points, vertex_types, Polygon, Vec2Ext, VertexType,
    VERTEX_TOLERANCE,
};

use super::footprint::footprint_at;

/// Contact plane between two agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneOfContact {
    /// Centroid of the footprint intersection, global frame [m].
    pub point_of_impact: DVec2,
    /// Orientation of the contact plane in `[0, π)` [rad].
    pub phi: f64,
}

/// Geometry of both agents at the moment the impulse is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPosition {
    /// Footprint centroid of agent 1 [m].
    pub cog1: DVec2,
    /// Footprint centroid of agent 2 [m].
    pub cog2: DVec2,
    pub plane: PlaneOfContact,
}

/// Vertices of the given type, with repeated points dropped.
fn distinct_of_type(
    vertices: &[DVec2],
    types: &[VertexType],
    wanted: VertexType,
) -> Vec<DVec2> {
    let mut picked: Vec<DVec2> = Vec::with_capacity(2);
    for (vertex, _) in vertices
        .iter()
        .zip(types)
        .filter(|(_, vertex_type)| **vertex_type == wanted)
    {
        if picked
            .iter()
            .all(|p| p.distance(*vertex) >= VERTEX_TOLERANCE)
        {
            picked.push(*vertex);
        }
    }
    picked
}

/// Extract point of impact and plane orientation from an intersection
/// polygon and its vertex types.
///
/// The plane runs through the two edge-crossing vertices. Without exactly
/// two of them, the straight-impact vertices are used instead.
pub fn plane_of_contact(
    intersection: &Polygon,
    types: &[VertexType],
) -> CollisionResult<PlaneOfContact> {
    let point_of_impact = intersection.centroid()?;

    if intersection.len() != types.len() {
        return Err(CollisionError::GeometricDegeneracy(
            "vertex types do not match the intersection",
        ));
    }

    let vertices = intersection.vertices();
    let crossings = distinct_of_type(vertices, types, VertexType::EdgeCrossing);
    let straight = distinct_of_type(vertices, types, VertexType::StraightImpact);

    let direction = if crossings.len() == 2 {
        crossings[0] - crossings[1]
    } else if straight.len() >= 2 {
        straight[0] - straight[1]
    } else {
        return Err(CollisionError::GeometricDegeneracy(
            "no contact plane direction in intersection",
        ));
    };

    Ok(PlaneOfContact {
        point_of_impact,
        phi: fold_half_turn(direction.angle()),
    })
}

/// Centroids and contact plane of both agents extrapolated by `time_ms`.
pub fn collision_position(
    agent1: &AgentSnapshot,
    agent2: &AgentSnapshot,
    time_ms: i32,
) -> CollisionResult<CollisionPosition> {
    let polygon1 = footprint_at(agent1, time_ms);
    let polygon2 = footprint_at(agent2, time_ms);

    let cog1 = polygon1.centroid()?;
    let cog2 = polygon2.centroid()?;

    let points = intersection_points(polygon1.vertices(), polygon2.vertices());
    let types = vertex_types(polygon1.vertices(), polygon2.vertices(), &points);
    let plane = plane_of_contact(&Polygon::new(points), &types)?;

    Ok(CollisionPosition { cog1, cog2, plane })
}
