//! Oriented surface sample.

use nalgebra::{Point3, Vector3};

/// A point on a surface together with its unit normal.
///
/// Canonical-frame surfels are warped into the live frame; the point receives
/// the full rigid motion, the normal only its rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surfel {
    /// Position in meters
    pub point: Point3<f32>,
    /// Unit normal (zero when unknown)
    pub normal: Vector3<f32>,
}

impl Surfel {
    /// Create a new surfel.
    #[inline]
    pub fn new(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { point, normal }
    }

    /// Surfel at the origin with a zero normal.
    #[inline]
    pub fn origin() -> Self {
        Self {
            point: Point3::origin(),
            normal: Vector3::zeros(),
        }
    }

    /// Check that every coordinate of the point is finite.
    #[inline]
    pub fn has_finite_point(&self) -> bool {
        crate::core::math::is_finite_point(&self.point)
    }
}

impl Default for Surfel {
    fn default() -> Self {
        Self::origin()
    }
}
