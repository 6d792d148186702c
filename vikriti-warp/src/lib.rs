//! VikritiWarp - Deformation-node warp field for non-rigid dense reconstruction
//!
//! Maps a fixed canonical surface into the live sensor frame with a sparse
//! graph of deformation nodes. Each node carries a rigid motion as a unit
//! dual quaternion; the motion at any canonical point is the dual quaternion
//! blend (DQB) of its nearest nodes, followed by a global rigid pose.
//!
//! # Architecture
//!
//! The crate is organized into 5 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     field                           │  ← Facade
//! │        (WarpField: lifecycle, warp, energy)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │               energy/   warp/                       │  ← Evaluation
//! │     (Tukey data term, Huber reg, point batches)     │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     blend/                          │  ← DQB
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              graph/   index/   surface/             │  ← Structures
//! │   (node store, builder, R-tree, live vertex map)    │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              core/   config/   error                │  ← Foundation
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Per-frame flow
//!
//! 1. The pose tracker supplies a rigid estimate (`set_warp_to_live`)
//! 2. `energy` warps the canonical surfels and scores them against the live
//!    surface plus the node adjacency
//! 3. An external solver writes new transforms back (`set_node_transform`)
//!    and repeats step 2 until it converges
//! 4. `insert_new_nodes` grows the graph over newly observed surface
//!
//! # Example
//!
//! ```
//! use nalgebra::{Isometry3, Point3, Vector3};
//! use vikriti_warp::{WarpConfig, WarpField};
//!
//! let mut field = WarpField::new(WarpConfig::with_node_spacing(2.0));
//! let points: Vec<_> = (0..100)
//!     .map(|i| Point3::new((i % 10) as f32, (i / 10) as f32, 0.0))
//!     .collect();
//! let normals = vec![Vector3::z(); points.len()];
//!
//! let added = field.init(&points, &normals).unwrap();
//! assert_eq!(added, 25);
//!
//! field.set_warp_to_live(Isometry3::translation(0.0, 0.0, 1.0));
//! assert_eq!(field.warp_point(&Point3::origin()), Point3::new(0.0, 0.0, 1.0));
//! ```

// ============================================================================
// Layer 1: Foundation (no internal deps)
// ============================================================================
pub mod config;
pub mod core;
pub mod error;

// ============================================================================
// Layer 2: Structures (depends on core)
// ============================================================================
pub mod graph;
pub mod index;
pub mod surface;

// ============================================================================
// Layer 3: Blending (depends on graph, index)
// ============================================================================
pub mod blend;

// ============================================================================
// Layer 4: Evaluation (depends on blend, surface)
// ============================================================================
pub mod energy;
pub mod warp;

// ============================================================================
// Layer 5: Facade
// ============================================================================
mod field;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::types::{CameraIntrinsics, Surfel};

// Configuration and errors
pub use config::{ConfigLoadError, WarpConfig};
pub use error::{Result, WarpError};

// Structures
pub use graph::{DeformationNode, GraphBuilder, InsertStats, NodeStore};
pub use index::{Neighbor, NodeIndex};
pub use surface::{LiveSurface, SurfaceSample, VertexMap};

// Blending and evaluation
pub use blend::Blender;
pub use energy::{
    DataTerm, EnergyTerms, RegularizationTerm, RobustPenalty, TransformPair, huber_penalty,
    tukey_penalty,
};
pub use warp::{DeviceCloud, PointBatch, Residency, SurfelBatch};

// Facade
pub use field::{FieldState, WarpField};
