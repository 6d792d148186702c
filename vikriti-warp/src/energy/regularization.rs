//! As-rigid-as-possible regularization over node adjacency.

use nalgebra::UnitDualQuaternion;

use super::robust::huber_penalty;
use crate::core::dual_quat::relative_deviation;

/// The transforms at both ends of one adjacency edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformPair {
    pub a: UnitDualQuaternion<f32>,
    pub b: UnitDualQuaternion<f32>,
}

impl TransformPair {
    /// Create a new pair.
    pub fn new(a: UnitDualQuaternion<f32>, b: UnitDualQuaternion<f32>) -> Self {
        Self { a, b }
    }

    /// Magnitude of the relative motion between the two ends.
    #[inline]
    pub fn deviation(&self) -> f32 {
        relative_deviation(&self.a, &self.b)
    }
}

/// Result of one regularization term evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegularizationTerm {
    /// Sum of Huber penalties over all edges (0 when there are none).
    pub value: f32,
    /// Number of edges evaluated.
    pub edges: usize,
}

/// Penalize incoherent motion between adjacent nodes.
pub fn energy_reg(edges: &[TransformPair], huber_delta: f32) -> RegularizationTerm {
    let value = edges
        .iter()
        .map(|pair| huber_penalty(pair.deviation(), huber_delta))
        .filter(|p| p.is_finite())
        .sum();

    RegularizationTerm {
        value,
        edges: edges.len(),
    }
}
