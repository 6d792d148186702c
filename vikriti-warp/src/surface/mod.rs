//! Read-only view of the live observation.
//!
//! The data term associates warped canonical points with the live surface by
//! projecting them into an image-organized grid of samples. The grid usually
//! comes from a depth frame or a raycast of the volumetric model; the field
//! never writes to it.

mod vertex_map;

pub use vertex_map::VertexMap;

use nalgebra::{Point3, Vector3};

/// One live surface sample in the camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Surface point in camera coordinates.
    pub point: Point3<f32>,
    /// Unit surface normal in camera coordinates.
    pub normal: Vector3<f32>,
}

impl SurfaceSample {
    /// Create a new sample.
    pub fn new(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { point, normal }
    }
}

/// Image-organized live surface, queried by pixel.
///
/// Implementations are shared across the rayon pool during the data term.
pub trait LiveSurface: Sync {
    /// Image size as `(width, height)`.
    fn dimensions(&self) -> (usize, usize);

    /// Sample at pixel `(u, v)`. `None` for holes and out-of-range pixels.
    fn sample(&self, u: usize, v: usize) -> Option<SurfaceSample>;
}
