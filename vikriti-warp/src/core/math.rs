//! Mathematical primitives shared across the warp stack.

use nalgebra::{Point3, Vector3};

/// Check that every coordinate of a point is finite.
#[inline]
pub fn is_finite_point(p: &Point3<f32>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// Check that every component of a vector is finite.
#[inline]
pub fn is_finite_vector(v: &Vector3<f32>) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Squared Euclidean distance between two points (avoids sqrt).
///
/// Computed component-wise in a fixed order so that the spatial index and
/// brute-force scans agree bit-for-bit on ties.
#[inline]
pub fn distance_squared(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Point as a plain coordinate array.
#[inline]
pub fn to_array(p: &Point3<f32>) -> [f32; 3] {
    [p.x, p.y, p.z]
}

/// Normalize a vector, returning zero for degenerate input.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use vikriti_warp::core::math::normalize_or_zero;
///
/// let n = normalize_or_zero(&Vector3::new(0.0, 3.0, 4.0));
/// assert!((n.norm() - 1.0).abs() < 1e-6);
/// assert_eq!(normalize_or_zero(&Vector3::zeros()), Vector3::zeros());
/// ```
#[inline]
pub fn normalize_or_zero(v: &Vector3<f32>) -> Vector3<f32> {
    let n = v.norm();
    if n > f32::EPSILON && n.is_finite() {
        v / n
    } else {
        Vector3::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_squared() {
        assert_relative_eq!(distance_squared(&[0.0, 0.0, 0.0], &[1.0, 2.0, 2.0]), 9.0);
        assert_eq!(distance_squared(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_finite_checks() {
        assert!(is_finite_point(&Point3::new(1.0, 2.0, 3.0)));
        assert!(!is_finite_point(&Point3::new(1.0, f32::INFINITY, 3.0)));
        assert!(!is_finite_vector(&Vector3::new(f32::NAN, 0.0, 0.0)));
    }

    #[test]
    fn test_normalize_or_zero_nan() {
        let v = Vector3::new(f32::NAN, 1.0, 0.0);
        assert_eq!(normalize_or_zero(&v), Vector3::zeros());
    }
}
