//! Graph seeding and growth.
//!
//! A candidate point becomes a new node only when no existing node covers it.
//! Node `j` covers point `p` when `|p - v_j| < weight_j`, checked against the
//! candidate's nearest graph nodes and against nodes accepted earlier in the
//! same batch.

use nalgebra::{Point3, Vector3};
use rstar::RTree;

use crate::blend::Blender;
use crate::config::WarpConfig;
use crate::core::math::{is_finite_point, to_array};
use crate::error::{Result, check_batch};
use crate::index::{IndexedNode, NodeIndex};

use super::{DeformationNode, NodeStore};

/// Outcome of one seeding or growth batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertStats {
    /// Nodes appended to the graph.
    pub added: usize,
    /// Candidates already covered by an existing or pending node.
    pub covered: usize,
    /// Candidates dropped for non-finite coordinates.
    pub skipped: usize,
}

/// Grows a [`NodeStore`] from candidate surface points.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    node_weight: f32,
    coverage_neighbors: usize,
    adjacency_neighbors: usize,
}

impl GraphBuilder {
    /// Create a builder from the field configuration.
    pub fn new(config: &WarpConfig) -> Self {
        Self {
            node_weight: config.graph.default_node_weight(),
            coverage_neighbors: config.blend.neighbors.max(1),
            adjacency_neighbors: config.adjacency.neighbors,
        }
    }

    /// Influence radius given to every new node.
    #[inline]
    pub fn node_weight(&self) -> f32 {
        self.node_weight
    }

    /// Append nodes for every uncovered candidate, then rebuild the index.
    ///
    /// New nodes start from the blended transform of the graph as it was
    /// before the batch, so they follow the motion already estimated around
    /// them. `index` is expected to be fresh relative to `store`.
    pub fn insert(
        &self,
        store: &mut NodeStore,
        index: &mut NodeIndex,
        blender: &Blender,
        points: &[Point3<f32>],
        normals: &[Vector3<f32>],
    ) -> Result<InsertStats> {
        check_batch(points.len(), normals.len())?;
        debug_assert!(index.is_fresh(store) || store.valid_count() == 0);

        let radius_sq = self.node_weight * self.node_weight;
        let mut pending: RTree<IndexedNode> = RTree::new();
        let mut accepted: Vec<DeformationNode> = Vec::new();
        let mut stats = InsertStats::default();

        for point in points {
            if !is_finite_point(point) {
                stats.skipped += 1;
                continue;
            }

            let neighbors = index.knn_unchecked(point, self.coverage_neighbors);
            let covered_by_graph = neighbors.iter().any(|n| {
                store
                    .get(n.index)
                    .is_some_and(|node| n.distance_sq < node.weight * node.weight)
            });

            // Pending nodes share one radius, so the nearest one decides
            let query = to_array(point);
            let covered_by_pending = pending
                .nearest_neighbor_iter_with_distance_2(&query)
                .next()
                .is_some_and(|(_, distance_sq)| distance_sq < radius_sq);

            if covered_by_graph || covered_by_pending {
                stats.covered += 1;
                continue;
            }

            let transform = blender.blend(store, &neighbors);
            pending.insert(IndexedNode::new(query, store.len() + accepted.len()));
            accepted.push(DeformationNode::new(*point, self.node_weight).with_transform(transform));
        }

        stats.added = accepted.len();
        for node in accepted {
            store.push(node);
        }

        if stats.added > 0 || !index.is_fresh(store) {
            index.rebuild(store, self.adjacency_neighbors);
        }

        log::debug!(
            "Graph batch: {} candidates, {} added, {} covered, {} skipped ({} nodes total)",
            points.len(),
            stats.added,
            stats.covered,
            stats.skipped,
            store.len()
        );

        Ok(stats)
    }
}
