//! Batch warp application.
//!
//! Host and device-resident containers share one capability trait. Both run
//! the same per-surfel function supplied by the field; they differ only in
//! where the data lives and how the batch is scheduled.
//!
//! - [`SurfelBatch`]: host memory, rewritten in place
//! - [`DeviceCloud`]: staged input with a separate output buffer, processed
//!   on the rayon pool

mod batch;

pub use batch::{DeviceCloud, PointBatch, Residency, SurfelBatch};
