//! Pinhole camera intrinsics.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Pinhole camera model parameters in pixels.
///
/// Projects camera-frame points with the usual convention: +Z looks into the
/// scene, +X to the right, +Y down the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length along x (pixels)
    pub fx: f32,
    /// Focal length along y (pixels)
    pub fy: f32,
    /// Principal point x (pixels)
    pub cx: f32,
    /// Principal point y (pixels)
    pub cy: f32,
}

impl CameraIntrinsics {
    /// Create new intrinsics.
    #[inline]
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Project a camera-frame point to continuous pixel coordinates.
    ///
    /// Returns `None` for points on or behind the image plane and for
    /// non-finite input.
    #[inline]
    pub fn project(&self, point: &Point3<f32>) -> Option<(f32, f32)> {
        if !crate::core::math::is_finite_point(point) || point.z <= f32::EPSILON {
            return None;
        }
        let inv_z = 1.0 / point.z;
        Some((
            self.fx * point.x * inv_z + self.cx,
            self.fy * point.y * inv_z + self.cy,
        ))
    }

    /// Project to the nearest integer pixel, if it lies inside `width × height`.
    #[inline]
    pub fn project_to_pixel(
        &self,
        point: &Point3<f32>,
        width: usize,
        height: usize,
    ) -> Option<(usize, usize)> {
        let (u, v) = self.project(point)?;
        let u = u.round();
        let v = v.round();
        if u < 0.0 || v < 0.0 || u >= width as f32 || v >= height as f32 {
            return None;
        }
        Some((u as usize, v as usize))
    }

    /// Back-project a pixel at the given depth into the camera frame.
    #[inline]
    pub fn unproject(&self, u: f32, v: f32, depth: f32) -> Point3<f32> {
        Point3::new(
            (u - self.cx) * depth / self.fx,
            (v - self.cy) * depth / self.fy,
            depth,
        )
    }
}

impl Default for CameraIntrinsics {
    /// Kinect-class VGA sensor.
    fn default() -> Self {
        Self {
            fx: 525.0,
            fy: 525.0,
            cx: 319.5,
            cy: 239.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_project_principal_point() {
        let intr = CameraIntrinsics::new(500.0, 500.0, 320.0, 240.0);
        let (u, v) = intr.project(&Point3::new(0.0, 0.0, 2.0)).unwrap();
        assert_relative_eq!(u, 320.0);
        assert_relative_eq!(v, 240.0);
    }

    #[test]
    fn test_project_behind_camera() {
        let intr = CameraIntrinsics::default();
        assert!(intr.project(&Point3::new(0.0, 0.0, -1.0)).is_none());
        assert!(intr.project(&Point3::new(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_project_to_pixel_bounds() {
        let intr = CameraIntrinsics::new(100.0, 100.0, 5.0, 5.0);
        assert_eq!(
            intr.project_to_pixel(&Point3::new(0.0, 0.0, 1.0), 10, 10),
            Some((5, 5))
        );
        // 1m to the right at 1m depth lands at u = 105
        assert!(
            intr.project_to_pixel(&Point3::new(1.0, 0.0, 1.0), 10, 10)
                .is_none()
        );
    }

    #[test]
    fn test_unproject_inverts_project() {
        let intr = CameraIntrinsics::default();
        let p = Point3::new(0.3, -0.2, 1.7);
        let (u, v) = intr.project(&p).unwrap();
        let back = intr.unproject(u, v, p.z);
        assert_relative_eq!(back.x, p.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-6);
    }
}
