//! Deformation node.

use nalgebra::{Point3, UnitDualQuaternion};

/// A control point of the warp field.
///
/// The canonical `vertex` never changes after creation. The `transform` is
/// written only by the external solver (through the field), and `valid` is
/// cleared when the graph builder retires the node.
#[derive(Debug, Clone, PartialEq)]
pub struct DeformationNode {
    /// Position in the canonical frame
    pub vertex: Point3<f32>,
    /// Canonical → live rigid motion
    pub transform: UnitDualQuaternion<f32>,
    /// Influence radius, always > 0
    pub weight: f32,
    /// Soft-delete marker
    pub valid: bool,
}

impl DeformationNode {
    /// Create a valid node with the identity transform.
    pub fn new(vertex: Point3<f32>, weight: f32) -> Self {
        Self {
            vertex,
            transform: UnitDualQuaternion::identity(),
            weight,
            valid: true,
        }
    }

    /// Set the initial transform.
    pub fn with_transform(mut self, transform: UnitDualQuaternion<f32>) -> Self {
        self.transform = transform;
        self
    }

    /// Canonical position as a coordinate array.
    #[inline]
    pub fn position(&self) -> [f32; 3] {
        [self.vertex.x, self.vertex.y, self.vertex.z]
    }
}
