//! Sutherland–Hodgman clipping of convex polygons and classification of the
//! resulting vertices.

use glam::DVec2;

use super::VERTEX_TOLERANCE;

/// Origin of a vertex of an intersection polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexType {
    /// Coincides with a corner of one of the input polygons.
    Original = 1,
    /// Created where an edge of one polygon crosses an edge of the other.
    EdgeCrossing = 2,
    /// Corner of the first polygon in a perfectly straight impact, i.e. when
    /// the intersection has no edge crossings at all.
    StraightImpact = 3,
}

/// Unit normal of the edge `a → b` pointing out of a CCW polygon.
#[inline]
fn outward_normal(a: DVec2, b: DVec2) -> DVec2 {
    let edge = b - a;
    DVec2::new(edge.y, -edge.x).normalize_or_zero()
}

/// Component-wise equal or opposite normals.
#[inline]
fn is_parallel(n1: DVec2, n2: DVec2) -> bool {
    let eps = f64::EPSILON;
    let parallel = (n1.x - n2.x).abs() < eps && (n1.y - n2.y).abs() < eps;
    let anti_parallel = (n1.x + n2.x).abs() < eps && (n1.y + n2.y).abs() < eps;
    parallel || anti_parallel
}

/// Point where the segment `p → q` crosses the clip line, given the signed
/// distances of its end points.
#[inline]
fn crossing(p: DVec2, q: DVec2, dist_p: f64, dist_q: f64) -> DVec2 {
    let t = dist_p / (dist_p - dist_q);
    p + (q - p) * t
}

/// Intersection of two convex CCW polygons.
///
/// `subject` is clipped against every edge of `clip` in turn. The result is
/// empty when the polygons do not overlap; touching edges produce a
/// zero-area polygon. Near-duplicate vertices may appear where the clip line
/// runs through a subject vertex.
pub fn intersection_points(clip: &[DVec2], subject: &[DVec2]) -> Vec<DVec2> {
    let mut output = subject.to_vec();
    let clip_count = clip.len();

    for i1 in 0..clip_count {
        if output.is_empty() {
            break;
        }

        // Hesse normal form of the clip edge: normal · x = offset
        let a = clip[i1];
        let b = clip[(i1 + 1) % clip_count];
        let normal = outward_normal(a, b);
        let offset = normal.dot(a);

        let input = std::mem::take(&mut output);
        let count = input.len();
        for i2 in 0..count {
            let p = input[i2];
            let q = input[(i2 + 1) % count];
            let dist_p = normal.dot(p) - offset;

            if dist_p <= 0.0 && is_parallel(normal, outward_normal(p, q)) {
                output.push(p);
                continue;
            }

            let dist_q = normal.dot(q) - offset;
            match (dist_p <= 0.0, dist_q <= 0.0) {
                // inside -> inside
                (true, true) => output.push(p),
                // inside -> outside
                (true, false) => {
                    output.push(p);
                    output.push(crossing(p, q, dist_p, dist_q));
                }
                // outside -> inside
                (false, true) => output.push(crossing(p, q, dist_p, dist_q)),
                // outside -> outside
                (false, false) => {}
            }
        }
    }

    output
}

#[inline]
fn coincides_with_any(point: DVec2, corners: &[DVec2]) -> bool {
    corners
        .iter()
        .any(|corner| point.distance(*corner) < VERTEX_TOLERANCE)
}

/// Tag each vertex of `intersection` with its [`VertexType`].
///
/// When no vertex stems from an edge crossing, the vertices that coincide
/// with corners of `polygon1` are re-tagged [`VertexType::StraightImpact`] so
/// that a contact plane can still be derived from them.
pub fn vertex_types(
    polygon1: &[DVec2],
    polygon2: &[DVec2],
    intersection: &[DVec2],
) -> Vec<VertexType> {
    let mut types: Vec<VertexType> = intersection
        .iter()
        .map(|&vertex| {
            if coincides_with_any(vertex, polygon1) || coincides_with_any(vertex, polygon2) {
                VertexType::Original
            } else {
                VertexType::EdgeCrossing
            }
        })
        .collect();

    let has_crossing = types.contains(&VertexType::EdgeCrossing);
    if !types.is_empty() && !has_crossing {
        for (vertex_type, vertex) in types.iter_mut().zip(intersection) {
            if coincides_with_any(*vertex, polygon1) {
                *vertex_type = VertexType::StraightImpact;
            }
        }
    }

    types
}
