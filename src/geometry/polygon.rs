//! Convex polygons with counter-clockwise vertex order.

use glam::DVec2;

use crate::error::{CollisionError, CollisionResult};

/// Signed areas below this are treated as zero.
const AREA_EPSILON: f64 = 1e-12;

/// An ordered, convex, counter-clockwise vertex sequence.
///
/// The clipping routines rely on the CCW order; a clockwise polygon silently
/// produces wrong or empty intersections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<DVec2>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn into_vertices(self) -> Vec<DVec2> {
        self.vertices
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: DVec2) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    /// Copy of this polygon moved by `offset`.
    pub fn translated(&self, offset: DVec2) -> Self {
        let mut moved = self.clone();
        moved.translate(offset);
        moved
    }

    /// Signed area (positive for counter-clockwise order).
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| self.vertices[i].perp_dot(self.vertices[(i + 1) % n]))
            .sum();
        0.5 * twice
    }

    /// Area-weighted centroid.
    ///
    /// Fails for fewer than three vertices or a vanishing signed area, which
    /// callers read as "no meaningful contact".
    pub fn centroid(&self) -> CollisionResult<DVec2> {
        let n = self.vertices.len();
        if n < 3 {
            return Err(CollisionError::GeometricDegeneracy(
                "polygon has fewer than three vertices",
            ));
        }

        let mut area = 0.0;
        let mut weighted = DVec2::ZERO;
        for i in 0..n {
            let p = self.vertices[i];
            let q = self.vertices[(i + 1) % n];
            let cross = p.perp_dot(q);
            area += cross;
            weighted += (p + q) * cross;
        }
        area *= 0.5;

        if area.abs() < AREA_EPSILON {
            return Err(CollisionError::GeometricDegeneracy("polygon has zero area"));
        }

        Ok(weighted / (6.0 * area))
    }
}

impl From<Vec<DVec2>> for Polygon {
    fn from(vertices: Vec<DVec2>) -> Self {
        Self::new(vertices)
    }
}
