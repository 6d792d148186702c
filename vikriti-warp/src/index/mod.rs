//! Spatial indexing over deformation node positions.
//!
//! - [`NodeIndex`]: versioned R-tree over valid node vertices
//! - [`Neighbor`]: k-nearest-neighbour result entry
//! - [`brute_force_knn`]: reference scan with identical ordering rules
//! - [`derive_adjacency`]: k-nearest-node edge list for regularization

mod adjacency;
mod spatial_index;

pub use adjacency::derive_adjacency;
pub use spatial_index::{IndexedNode, Neighbor, NodeIndex, brute_force_knn};
