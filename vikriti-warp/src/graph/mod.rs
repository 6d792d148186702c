//! Deformation graph.
//!
//! The graph is an ordered store of deformation nodes. Insertion order is the
//! stable node identity: it breaks ties in nearest-neighbour queries and is
//! the key the spatial index stores for each entry.
//!
//! - [`DeformationNode`]: canonical position, transform, influence radius, validity
//! - [`NodeStore`]: ordered node storage with a mutation generation counter
//! - [`GraphBuilder`]: seeds and grows the graph under a coverage rule

mod builder;
mod node;
mod store;

pub use builder::{GraphBuilder, InsertStats};
pub use node::DeformationNode;
pub use store::NodeStore;
