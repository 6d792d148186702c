//! Core foundation layer.
//!
//! This is the bottom layer of the warp stack with no internal dependencies.
//! All other layers depend on core.
//!
//! # Contents
//!
//! - [`types`]: Core data types (surfels, camera intrinsics)
//! - [`math`]: Scalar and vector helpers (finiteness checks, distances)
//! - [`dual_quat`]: Unit dual quaternion helpers used by blending and regularization

pub mod dual_quat;
pub mod math;
pub mod types;
