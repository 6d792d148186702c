//! Errors reported by graph-mutation entry points.
//!
//! Only calls that change the node set can fail. Query and evaluation paths
//! (`knn`, `dqb`, `warp`, `energy`) resolve degenerate cases locally and
//! never return an error.

use thiserror::Error;

/// Warp field errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WarpError {
    #[error("Point/normal batch size mismatch ({points} points, {normals} normals)")]
    BatchSizeMismatch { points: usize, normals: usize },

    #[error("Node index {index} out of range (graph has {len} nodes)")]
    NodeOutOfRange { index: usize, len: usize },

    #[error("Degenerate transform for node {index} (non-finite or zero real part)")]
    DegenerateTransform { index: usize },

    #[error("Transform snapshot has {got} entries, graph has {expected} nodes")]
    SnapshotSizeMismatch { expected: usize, got: usize },

    #[error("Organized frame of {width}x{height} needs {expected} samples, got {got}")]
    FrameSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, WarpError>;

/// Check that a point batch and its normals line up.
#[inline]
pub(crate) fn check_batch(points: usize, normals: usize) -> Result<()> {
    if points != normals {
        return Err(WarpError::BatchSizeMismatch { points, normals });
    }
    Ok(())
}
