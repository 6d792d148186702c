//! Ordered node storage with a mutation generation.
//!
//! Every topology change (append, invalidate, clear) bumps the generation.
//! Derived views such as the spatial index remember the generation they were
//! built from and are stale as soon as it moves on. Transform writes leave
//! the generation untouched: the index only depends on positions and
//! validity.

use nalgebra::{Point3, UnitDualQuaternion};

use super::DeformationNode;
use crate::core::dual_quat;
use crate::error::{Result, WarpError};

/// Owned storage for all deformation nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: Vec<DeformationNode>,
    generation: u64,
    valid_count: usize,
}

impl NodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mutation generation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total number of nodes, including retired ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the store holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes still marked valid.
    #[inline]
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Get a node by insertion index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&DeformationNode> {
        self.nodes.get(index)
    }

    /// Read-only view of all nodes in insertion order.
    #[inline]
    pub fn nodes(&self) -> &[DeformationNode] {
        &self.nodes
    }

    /// Iterate valid nodes with their insertion index.
    pub fn iter_valid(&self) -> impl Iterator<Item = (usize, &DeformationNode)> + '_ {
        self.nodes.iter().enumerate().filter(|(_, n)| n.valid)
    }

    /// Canonical positions of all nodes in insertion order.
    pub fn positions(&self) -> Vec<Point3<f32>> {
        self.nodes.iter().map(|n| n.vertex).collect()
    }

    /// Append a node, returning its insertion index.
    pub fn push(&mut self, node: DeformationNode) -> usize {
        let index = self.nodes.len();
        if node.valid {
            self.valid_count += 1;
        }
        self.nodes.push(node);
        self.generation += 1;
        index
    }

    /// Mark a node as retired.
    ///
    /// Returns `true` if the node was valid before the call.
    pub fn invalidate(&mut self, index: usize) -> Result<bool> {
        let len = self.nodes.len();
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(WarpError::NodeOutOfRange { index, len })?;

        if !node.valid {
            return Ok(false);
        }
        node.valid = false;
        self.valid_count -= 1;
        self.generation += 1;
        Ok(true)
    }

    /// Replace a node transform, renormalizing it onto the unit manifold.
    pub fn set_transform(&mut self, index: usize, transform: &UnitDualQuaternion<f32>) -> Result<()> {
        let len = self.nodes.len();
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(WarpError::NodeOutOfRange { index, len })?;

        let normalized = dual_quat::renormalize(transform.as_ref())
            .ok_or(WarpError::DegenerateTransform { index })?;
        node.transform = normalized;
        Ok(())
    }

    /// Copy of every node transform in insertion order.
    pub fn transforms(&self) -> Vec<UnitDualQuaternion<f32>> {
        self.nodes.iter().map(|n| n.transform).collect()
    }

    /// Remove all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.valid_count = 0;
        self.generation += 1;
    }
}
