//! Unit dual quaternion helpers.
//!
//! Node transforms are stored as `nalgebra::UnitDualQuaternion<f32>`. Blending
//! works on the raw 8 coefficients (real part, dual part), so this module
//! provides the coefficient-level operations the blender and the
//! regularization term share:
//!
//! - hemisphere alignment (`q` and `-q` encode the same rigid motion)
//! - renormalization back onto the unit manifold
//! - a coefficient distance used to score relative motion
//!
//! Coefficients are `Vector4` in nalgebra's `(i, j, k, w)` order.

use nalgebra::{DualQuaternion, Quaternion, UnitDualQuaternion, Vector4};

/// Smallest real-part norm accepted during renormalization.
pub const MIN_REAL_NORM: f32 = 1e-6;

/// Real and dual coefficient vectors of a dual quaternion.
#[inline]
pub fn coefficients(dq: &UnitDualQuaternion<f32>) -> (Vector4<f32>, Vector4<f32>) {
    let inner = dq.as_ref();
    (inner.real.coords, inner.dual.coords)
}

/// Check that all 8 coefficients are finite.
#[inline]
pub fn is_finite(dq: &DualQuaternion<f32>) -> bool {
    dq.real.coords.iter().all(|c| c.is_finite()) && dq.dual.coords.iter().all(|c| c.is_finite())
}

/// Project raw coefficients back onto the unit dual quaternion manifold.
///
/// Divides by the norm of the real part and removes the component of the
/// dual part parallel to the real part, so that `|real| = 1` and
/// `real · dual = 0`. Returns `None` for non-finite input or a vanishing
/// real part.
pub fn renormalize_coefficients(
    real: &Vector4<f32>,
    dual: &Vector4<f32>,
) -> Option<UnitDualQuaternion<f32>> {
    if !real.iter().chain(dual.iter()).all(|c| c.is_finite()) {
        return None;
    }

    let norm = real.norm();
    if !norm.is_finite() || norm < MIN_REAL_NORM {
        return None;
    }

    let r = real / norm;
    let d = dual / norm;
    let d = d - r * r.dot(&d);

    Some(UnitDualQuaternion::new_unchecked(
        DualQuaternion::from_real_and_dual(Quaternion::from(r), Quaternion::from(d)),
    ))
}

/// Renormalize an arbitrary dual quaternion.
#[inline]
pub fn renormalize(dq: &DualQuaternion<f32>) -> Option<UnitDualQuaternion<f32>> {
    renormalize_coefficients(&dq.real.coords, &dq.dual.coords)
}

/// Sign that puts `real` into the same hemisphere as `reference`.
#[inline]
pub fn hemisphere_sign(real: &Vector4<f32>, reference: &Vector4<f32>) -> f32 {
    if real.dot(reference) < 0.0 { -1.0 } else { 1.0 }
}

/// Coefficient distance of a unit dual quaternion from the identity.
///
/// The input is first flipped into the identity's hemisphere, so the result
/// is zero exactly when `dq` encodes the identity motion.
pub fn deviation_from_identity(dq: &UnitDualQuaternion<f32>) -> f32 {
    let (real, dual) = coefficients(dq);
    let identity_real = Vector4::new(0.0, 0.0, 0.0, 1.0);
    let sign = hemisphere_sign(&real, &identity_real);
    let dr = real * sign - identity_real;
    let dd = dual * sign;
    (dr.norm_squared() + dd.norm_squared()).sqrt()
}

/// Magnitude of the relative motion `a⁻¹ · b`.
///
/// Zero when both transforms are identical; grows with the rotation angle
/// and translation that separate them.
#[inline]
pub fn relative_deviation(a: &UnitDualQuaternion<f32>, b: &UnitDualQuaternion<f32>) -> f32 {
    deviation_from_identity(&(a.inverse() * b))
}
