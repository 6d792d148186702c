//! Core data types for warp field operations.
//!
//! - [`Surfel`]: Oriented surface sample (point + normal)
//! - [`CameraIntrinsics`]: Pinhole projection parameters

mod intrinsics;
mod surfel;

pub use intrinsics::CameraIntrinsics;
pub use surfel::Surfel;
