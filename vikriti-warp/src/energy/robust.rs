//! Robust penalty functions (M-estimators).
//!
//! The data term uses the Tukey biweight so that a single gross mismatch
//! cannot dominate a frame. The regularization term uses Huber: quadratic for
//! small relative motion, linear for the occasional discontinuity.
//!
//! # Usage
//!
//! ```
//! use vikriti_warp::energy::RobustPenalty;
//!
//! let tukey = RobustPenalty::default_tukey();
//! assert_eq!(tukey.penalty(0.0), 0.0);
//!
//! // IRLS weight for an external solver
//! let w = tukey.weight(1.0);
//! assert!(w > 0.0 && w < 1.0);
//! ```
//!
//! | Penalty | ρ(r) | IRLS weight |
//! |---------|------|-------------|
//! | Quadratic | r²/2 | 1 |
//! | Huber | r²/2 for \|r\| ≤ δ, δ(\|r\| − δ/2) beyond | 1 or δ/\|r\| |
//! | Tukey | c²/6 · (1 − (1 − (r/c)²)³) for \|r\| ≤ c, c²/6 beyond | (1 − (r/c)²)² or 0 |

/// Default Tukey cutoff (95% efficiency under Gaussian noise).
pub const DEFAULT_TUKEY_C: f32 = 4.685;

/// Default Huber threshold.
pub const DEFAULT_HUBER_DELTA: f32 = 1e-4;

/// Tukey biweight penalty.
///
/// Bounded by `c²/6`, reached for every `|x| ≥ c`.
#[inline]
pub fn tukey_penalty(x: f32, c: f32) -> f32 {
    let bound = c * c / 6.0;
    if x.abs() >= c {
        return bound;
    }
    let u = x / c;
    let v = 1.0 - u * u;
    bound * (1.0 - v * v * v)
}

/// Huber penalty.
///
/// Continuous and once differentiable at `|a| = delta`.
#[inline]
pub fn huber_penalty(a: f32, delta: f32) -> f32 {
    let r = a.abs();
    if r <= delta {
        0.5 * a * a
    } else {
        delta * (r - 0.5 * delta)
    }
}

/// Robust penalty selector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RobustPenalty {
    /// Plain least squares.
    Quadratic,

    /// Huber loss: quadratic near zero, linear beyond `delta`.
    Huber {
        /// Transition point between the quadratic and linear regimes.
        delta: f32,
    },

    /// Tukey biweight: constant beyond `c`.
    Tukey {
        /// Cutoff. Residuals beyond it get zero weight.
        c: f32,
    },
}

impl RobustPenalty {
    /// Penalty value ρ(r).
    #[inline]
    pub fn penalty(&self, residual: f32) -> f32 {
        match self {
            Self::Quadratic => 0.5 * residual * residual,
            Self::Huber { delta } => huber_penalty(residual, *delta),
            Self::Tukey { c } => tukey_penalty(residual, *c),
        }
    }

    /// IRLS weight ρ'(r)/r in [0, 1].
    #[inline]
    pub fn weight(&self, residual: f32) -> f32 {
        let r = residual.abs();
        match self {
            Self::Quadratic => 1.0,
            Self::Huber { delta } => {
                if r <= *delta {
                    1.0
                } else {
                    *delta / r
                }
            }
            Self::Tukey { c } => {
                if r < *c {
                    let u = r / c;
                    let v = 1.0 - u * u;
                    v * v
                } else {
                    0.0
                }
            }
        }
    }

    /// Huber with the default regularization threshold.
    #[inline]
    pub fn default_huber() -> Self {
        Self::Huber {
            delta: DEFAULT_HUBER_DELTA,
        }
    }

    /// Tukey with the default cutoff.
    #[inline]
    pub fn default_tukey() -> Self {
        Self::Tukey { c: DEFAULT_TUKEY_C }
    }
}

impl Default for RobustPenalty {
    /// Tukey, as used by the data term.
    fn default() -> Self {
        Self::default_tukey()
    }
}
