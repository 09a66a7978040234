//! 2D geometry primitives: vectors, convex polygons and polygon clipping.
//!
//! All vectors are `glam::DVec2`. The few operations the collision code needs
//! beyond glam's own API live on [`Vec2Ext`].

pub mod clipping;
pub mod polygon;

use std::f64::consts::PI;

use glam::DVec2;

pub use clipping::{intersection_points, vertex_types, VertexType};
pub use polygon::Polygon;

/// Distance below which two points are treated as the same vertex.
pub const VERTEX_TOLERANCE: f64 = 1e-12;

/// Extra vector operations on [`DVec2`].
pub trait Vec2Ext {
    /// Rotate counter-clockwise by `angle` radians.
    fn rotated(self, angle: f64) -> Self;
    /// Angle of the vector against the x axis, in `(-π, π]`.
    fn angle(self) -> f64;
}

impl Vec2Ext for DVec2 {
    #[inline]
    fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        DVec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }
}

/// Fold an angle of a line direction into `[0, π)`.
///
/// A line has no orientation, so `a` and `a ± π` describe the same plane.
#[inline]
pub fn fold_half_turn(angle: f64) -> f64 {
    let mut folded = angle % PI;
    if folded < 0.0 {
        folded += PI;
    }
    if folded >= PI {
        folded -= PI;
    }
    folded
}
