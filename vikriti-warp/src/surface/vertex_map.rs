//! Organized vertex/normal map.

use nalgebra::{Point3, Vector3};

use super::{LiveSurface, SurfaceSample};
use crate::core::math::{is_finite_point, is_finite_vector, normalize_or_zero};
use crate::core::types::{CameraIntrinsics, Surfel};
use crate::error::{Result, WarpError, check_batch};

/// Row-major image of optional surface samples.
///
/// Pixel `(u, v)` lives at index `v * width + u`.
#[derive(Clone, Debug)]
pub struct VertexMap {
    width: usize,
    height: usize,
    samples: Vec<Option<SurfaceSample>>,
}

impl VertexMap {
    /// Create a map with every pixel empty.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![None; width * height],
        }
    }

    /// Build from an organized frame (row-major points and normals).
    ///
    /// Pixels with a non-finite point are holes. Normals are normalized;
    /// non-finite normals also mark a hole.
    pub fn from_organized(
        width: usize,
        height: usize,
        points: &[Point3<f32>],
        normals: &[Vector3<f32>],
    ) -> Result<Self> {
        check_batch(points.len(), normals.len())?;
        let expected = width * height;
        if points.len() != expected {
            return Err(WarpError::FrameSizeMismatch {
                width,
                height,
                expected,
                got: points.len(),
            });
        }

        let samples = points
            .iter()
            .zip(normals)
            .map(|(p, n)| {
                (is_finite_point(p) && is_finite_vector(n))
                    .then(|| SurfaceSample::new(*p, normalize_or_zero(n)))
            })
            .collect();

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Render surfels (already in the camera frame) with a z-buffer.
    ///
    /// Each pixel keeps the surfel closest to the camera.
    pub fn render(
        surfels: &[Surfel],
        intrinsics: &CameraIntrinsics,
        width: usize,
        height: usize,
    ) -> Self {
        let mut map = Self::empty(width, height);
        let mut depth = vec![f32::INFINITY; width * height];

        for surfel in surfels {
            let Some((u, v)) = intrinsics.project_to_pixel(&surfel.point, width, height) else {
                continue;
            };
            let idx = v * width + u;
            if surfel.point.z < depth[idx] {
                depth[idx] = surfel.point.z;
                map.samples[idx] = Some(SurfaceSample::new(
                    surfel.point,
                    normalize_or_zero(&surfel.normal),
                ));
            }
        }

        log::trace!(
            "Rendered {} of {} surfels into {}x{} vertex map",
            map.valid_count(),
            surfels.len(),
            width,
            height
        );
        map
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of non-empty pixels.
    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }

    /// Overwrite one pixel. Out-of-range pixels are ignored.
    pub fn set(&mut self, u: usize, v: usize, sample: Option<SurfaceSample>) {
        if u < self.width && v < self.height {
            self.samples[v * self.width + u] = sample;
        }
    }
}

impl LiveSurface for VertexMap {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn sample(&self, u: usize, v: usize) -> Option<SurfaceSample> {
        if u >= self.width || v >= self.height {
            return None;
        }
        self.samples[v * self.width + u]
    }
}
