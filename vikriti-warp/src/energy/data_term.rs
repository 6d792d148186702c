//! Projective point-to-plane data term.

use rayon::prelude::*;

use super::robust::tukey_penalty;
use crate::config::EnergySection;
use crate::core::types::{CameraIntrinsics, Surfel};
use crate::surface::LiveSurface;

/// Result of one data term evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataTerm {
    /// Mean Tukey penalty over valid correspondences (0 when there are none).
    pub value: f32,
    /// Number of warped surfels with a valid live match.
    pub correspondences: usize,
    /// Number of warped surfels without one.
    pub misses: usize,
    /// Signed point-to-plane residual per input surfel, `None` on a miss.
    pub residuals: Vec<Option<f32>>,
}

impl DataTerm {
    /// Fraction of surfels that found a correspondence.
    pub fn inlier_ratio(&self) -> f32 {
        let total = self.correspondences + self.misses;
        if total == 0 {
            0.0
        } else {
            self.correspondences as f32 / total as f32
        }
    }
}

/// Association gates derived from [`EnergySection`].
#[derive(Clone, Copy, Debug)]
struct Gates {
    max_distance_sq: f32,
    min_normal_cos: f32,
}

impl Gates {
    fn new(params: &EnergySection) -> Self {
        Self {
            max_distance_sq: params.max_correspondence_distance * params.max_correspondence_distance,
            min_normal_cos: params.max_normal_angle.cos(),
        }
    }
}

/// Match one warped surfel against the live surface.
///
/// Returns the signed residual `n_live · (p - q)`, or `None` when the surfel
/// is behind the camera, projects outside the image, lands on a hole, is too
/// far from the live point, or disagrees with the live normal.
fn associate<S: LiveSurface + ?Sized>(
    surfel: &Surfel,
    intrinsics: &CameraIntrinsics,
    surface: &S,
    gates: Gates,
) -> Option<f32> {
    let (width, height) = surface.dimensions();
    let (u, v) = intrinsics.project_to_pixel(&surfel.point, width, height)?;
    let live = surface.sample(u, v)?;

    let diff = surfel.point - live.point;
    if diff.norm_squared() > gates.max_distance_sq {
        return None;
    }
    if live.normal.norm_squared() == 0.0 {
        return None;
    }
    // Surfels without a normal skip the angle gate
    if surfel.normal.norm_squared() > 0.0 && surfel.normal.dot(&live.normal) < gates.min_normal_cos {
        return None;
    }

    let residual = live.normal.dot(&diff);
    residual.is_finite().then_some(residual)
}

/// Evaluate the data term for surfels already warped into the live frame.
///
/// Association runs on the rayon pool; the penalty sum is accumulated in
/// input order so the result is deterministic.
pub fn energy_data<S: LiveSurface + ?Sized>(
    warped: &[Surfel],
    intrinsics: &CameraIntrinsics,
    surface: &S,
    params: &EnergySection,
) -> DataTerm {
    let gates = Gates::new(params);
    let residuals: Vec<Option<f32>> = warped
        .par_iter()
        .map(|surfel| associate(surfel, intrinsics, surface, gates))
        .collect();

    let mut sum = 0.0f32;
    let mut correspondences = 0usize;
    for r in residuals.iter().flatten() {
        sum += tukey_penalty(*r, params.tukey_c);
        correspondences += 1;
    }
    let misses = residuals.len() - correspondences;
    let value = if correspondences > 0 {
        sum / correspondences as f32
    } else {
        0.0
    };

    log::trace!(
        "Data term: {:.6} over {} correspondences ({} misses)",
        value,
        correspondences,
        misses
    );

    DataTerm {
        value,
        correspondences,
        misses,
        residuals,
    }
}
