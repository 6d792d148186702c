//! Energy model.
//!
//! Scores a candidate set of node transforms:
//!
//! ```text
//! E = E_data + λ · E_reg
//! ```
//!
//! - [`energy_data`]: projective point-to-plane residuals against the live
//!   surface, passed through the Tukey biweight
//! - [`energy_reg`]: relative motion between adjacent nodes, passed through Huber
//!
//! Only scalar values are produced. Updating transforms is left to an external
//! solver, which may use [`RobustPenalty::weight`] for IRLS.

mod data_term;
mod regularization;
mod robust;

pub use data_term::{DataTerm, energy_data};
pub use regularization::{RegularizationTerm, TransformPair, energy_reg};
pub use robust::{
    DEFAULT_HUBER_DELTA, DEFAULT_TUKEY_C, RobustPenalty, huber_penalty, tukey_penalty,
};

/// Combined result of one energy evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnergyTerms {
    /// Data term details.
    pub data: DataTerm,
    /// Regularization term details.
    pub regularization: RegularizationTerm,
    /// Weight λ applied to the regularization term.
    pub regularization_weight: f32,
    /// `data.value + λ · regularization.value`.
    pub total: f32,
}

impl EnergyTerms {
    /// Combine both terms with weight `lambda`.
    pub fn new(data: DataTerm, regularization: RegularizationTerm, lambda: f32) -> Self {
        let total = data.value + lambda * regularization.value;
        Self {
            data,
            regularization,
            regularization_weight: lambda,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        let data = DataTerm {
            value: 0.5,
            correspondences: 2,
            misses: 0,
            residuals: vec![Some(0.1), Some(-0.1)],
        };
        let reg = RegularizationTerm {
            value: 0.01,
            edges: 4,
        };
        let terms = EnergyTerms::new(data, reg, 200.0);
        approx::assert_relative_eq!(terms.total, 2.5, epsilon = 1e-6);
        assert_eq!(terms.regularization.edges, 4);
    }
}
