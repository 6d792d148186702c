//! Dual quaternion blending (DQB).
//!
//! Turns the discrete per-node transforms into a continuous warp field. For a
//! query point with nearest nodes `n_1..n_k`:
//!
//! ```text
//! w_i  = exp(-|p - v_i|² / (2 · weight_i²))
//! q̂_i  = sign_i · q_i         (sign_i puts q_i in q_1's hemisphere)
//! DQB  = normalize(Σ w_i · q̂_i)
//! ```
//!
//! `q` and `-q` encode the same rigid motion, so without the sign flip two
//! nearby nodes with nearly identical motion could cancel each other out.
//!
//! # Degenerate cases
//!
//! | Situation | Result |
//! |-----------|--------|
//! | No neighbours | identity |
//! | One neighbour | that node's transform, unchanged |
//! | All weights underflow to 0 | nearest node's transform |
//! | Non-finite blend | identity |

use nalgebra::{UnitDualQuaternion, Vector4};

use crate::core::dual_quat;
use crate::graph::NodeStore;
use crate::index::Neighbor;

/// Default number of blended neighbours.
pub const DEFAULT_NEIGHBORS: usize = 8;

/// Gaussian falloff of a node's influence.
///
/// `weight` is the node's influence radius and is always positive, so the
/// denominator never vanishes. Very small radii drive the result to zero
/// instead of dividing by zero.
///
/// # Example
/// ```
/// use vikriti_warp::blend::weighting;
///
/// assert_eq!(weighting(0.0, 0.5), 1.0);
/// assert!(weighting(1.0, 0.5) < weighting(0.25, 0.5));
/// ```
#[inline]
pub fn weighting(squared_distance: f32, weight: f32) -> f32 {
    (-squared_distance / (2.0 * weight * weight)).exp()
}

/// Blends node transforms around a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blender {
    neighbors: usize,
}

impl Blender {
    /// Create a blender that mixes up to `neighbors` nodes (at least 1).
    pub fn new(neighbors: usize) -> Self {
        Self {
            neighbors: neighbors.max(1),
        }
    }

    /// Number of nearest nodes blended per query.
    #[inline]
    pub fn neighbors(&self) -> usize {
        self.neighbors
    }

    /// Gaussian weights of each neighbour, in neighbour order.
    pub fn weights(&self, store: &NodeStore, neighbors: &[Neighbor]) -> Vec<f32> {
        neighbors
            .iter()
            .map(|n| match store.get(n.index) {
                Some(node) => weighting(n.distance_sq, node.weight),
                None => 0.0,
            })
            .collect()
    }

    /// Blend the transforms of the given neighbours.
    ///
    /// `neighbors` must be ordered nearest first, as returned by the index.
    pub fn blend(&self, store: &NodeStore, neighbors: &[Neighbor]) -> UnitDualQuaternion<f32> {
        let Some(nearest) = neighbors.first().and_then(|n| store.get(n.index)) else {
            return UnitDualQuaternion::identity();
        };

        if neighbors.len() == 1 {
            return nearest.transform;
        }

        let (reference, _) = dual_quat::coefficients(&nearest.transform);
        let mut real = Vector4::zeros();
        let mut dual = Vector4::zeros();
        let mut total_weight = 0.0f32;

        for n in neighbors {
            let Some(node) = store.get(n.index) else {
                continue;
            };
            let w = weighting(n.distance_sq, node.weight);
            let (r, d) = dual_quat::coefficients(&node.transform);
            let signed_w = w * dual_quat::hemisphere_sign(&r, &reference);

            real += r * signed_w;
            dual += d * signed_w;
            total_weight += w;
        }

        if total_weight <= f32::MIN_POSITIVE {
            // Every node is far outside its radius; fall back to the closest one
            return nearest.transform;
        }

        // Scale back to unit total weight so small but finite sums survive
        // the real-part norm check
        real /= total_weight;
        dual /= total_weight;

        match dual_quat::renormalize_coefficients(&real, &dual) {
            Some(blended) => blended,
            None => {
                log::warn!(
                    "Non-finite dual quaternion blend over {} nodes, using identity",
                    neighbors.len()
                );
                UnitDualQuaternion::identity()
            }
        }
    }
}

impl Default for Blender {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORS)
    }
}
