//! Versioned spatial index for nearest-node queries.
//!
//! Uses an R-tree over the canonical positions of valid nodes:
//! - k nearest nodes to a point (blending, coverage tests)
//! - cached derived adjacency (regularization)
//!
//! The index is a derived view of the [`NodeStore`]. It records the store
//! generation it was built from and refuses to answer once the store has
//! moved on; callers rebuild before querying again.
//!
//! # Ordering
//!
//! Results are ascending by squared distance, ties broken by ascending
//! insertion index. All entries tied with the k-th distance are gathered
//! before ordering, so the tie-break is exact rather than tree-order
//! dependent.

use nalgebra::Point3;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::adjacency::derive_adjacency;
use crate::core::math::{distance_squared, is_finite_point, to_array};
use crate::graph::NodeStore;

/// A node position stored in the R-tree.
#[derive(Clone, Debug)]
pub struct IndexedNode {
    /// Canonical node position.
    pub position: [f32; 3],
    /// Insertion index of this node in the store.
    pub index: usize,
}

impl IndexedNode {
    /// Create a new indexed node.
    pub fn new(position: [f32; 3], index: usize) -> Self {
        Self { position, index }
    }
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedNode {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        distance_squared(&self.position, point)
    }
}

/// One k-nearest-neighbour result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Insertion index of the node
    pub index: usize,
    /// Squared distance from the query point
    pub distance_sq: f32,
}

impl Neighbor {
    /// Create a new neighbour entry.
    #[inline]
    pub fn new(index: usize, distance_sq: f32) -> Self {
        Self { index, distance_sq }
    }
}

/// Order by squared distance, then by insertion index.
#[inline]
fn sort_neighbors(neighbors: &mut [Neighbor]) {
    neighbors.sort_by(|a, b| {
        a.distance_sq
            .total_cmp(&b.distance_sq)
            .then(a.index.cmp(&b.index))
    });
}

/// Spatial index over valid node positions.
///
/// # Example
/// ```rust
/// use nalgebra::Point3;
/// use vikriti_warp::graph::{DeformationNode, NodeStore};
/// use vikriti_warp::index::NodeIndex;
///
/// let mut store = NodeStore::new();
/// store.push(DeformationNode::new(Point3::new(0.0, 0.0, 0.0), 1.0));
/// store.push(DeformationNode::new(Point3::new(2.0, 0.0, 0.0), 1.0));
///
/// let mut index = NodeIndex::empty();
/// index.rebuild(&store, 1);
///
/// let nearest = index.knn(&store, &Point3::new(1.8, 0.0, 0.0), 1).unwrap();
/// assert_eq!(nearest[0].index, 1);
/// ```
#[derive(Clone)]
pub struct NodeIndex {
    tree: RTree<IndexedNode>,
    built_generation: Option<u64>,
    adjacency: Vec<(usize, usize)>,
}

impl NodeIndex {
    /// Create an empty index that has never been built.
    pub fn empty() -> Self {
        Self {
            tree: RTree::new(),
            built_generation: None,
            adjacency: Vec::new(),
        }
    }

    /// Rebuild from the store's current valid nodes.
    ///
    /// O(n log n) bulk load, followed by the derived adjacency refresh.
    pub fn rebuild(&mut self, store: &NodeStore, adjacency_neighbors: usize) {
        let indexed: Vec<IndexedNode> = store
            .iter_valid()
            .map(|(i, node)| IndexedNode::new(node.position(), i))
            .collect();

        self.tree = RTree::bulk_load(indexed);
        self.built_generation = Some(store.generation());
        self.adjacency = derive_adjacency(self, store, adjacency_neighbors);

        log::debug!(
            "Rebuilt node index: {} valid nodes, {} adjacency edges (generation {})",
            self.tree.size(),
            self.adjacency.len(),
            store.generation()
        );
    }

    /// Drop all entries and forget the build generation.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Check whether the index reflects the store's current generation.
    #[inline]
    pub fn is_fresh(&self, store: &NodeStore) -> bool {
        self.built_generation == Some(store.generation())
    }

    /// Generation this index was built from.
    #[inline]
    pub fn built_generation(&self) -> Option<u64> {
        self.built_generation
    }

    /// Number of indexed (valid) nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Cached undirected adjacency `(i, j)` with `i < j`.
    #[inline]
    pub fn adjacency(&self) -> &[(usize, usize)] {
        &self.adjacency
    }

    /// Find the k nearest valid nodes to a point.
    ///
    /// Returns `None` when the index is stale relative to `store`. An empty
    /// vector means there is nothing to return: no valid nodes, `k == 0`, or
    /// a non-finite query point.
    pub fn knn(&self, store: &NodeStore, point: &Point3<f32>, k: usize) -> Option<Vec<Neighbor>> {
        if !self.is_fresh(store) {
            return None;
        }
        Some(self.knn_unchecked(point, k))
    }

    /// k-nearest query without the freshness check.
    pub(crate) fn knn_unchecked(&self, point: &Point3<f32>, k: usize) -> Vec<Neighbor> {
        if k == 0 || self.is_empty() || !is_finite_point(point) {
            return Vec::new();
        }

        let query = to_array(point);
        let mut result = Vec::with_capacity(k.min(self.len()));
        let mut kth_distance: Option<f32> = None;

        // The iterator is ascending, so after the k-th entry only ties remain
        for (indexed, distance_sq) in self.tree.nearest_neighbor_iter_with_distance_2(&query) {
            if let Some(limit) = kth_distance
                && distance_sq > limit
            {
                break;
            }
            result.push(Neighbor::new(indexed.index, distance_sq));
            if kth_distance.is_none() && result.len() == k {
                kth_distance = Some(distance_sq);
            }
        }

        sort_neighbors(&mut result);
        result.truncate(k);

        log::trace!(
            "knn({:.3}, {:.3}, {:.3}) -> {} of {} nodes",
            point.x,
            point.y,
            point.z,
            result.len(),
            self.tree.size()
        );
        result
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeIndex")
            .field("len", &self.tree.size())
            .field("built_generation", &self.built_generation)
            .field("adjacency_edges", &self.adjacency.len())
            .finish()
    }
}

/// Linear-scan k-nearest query with the same ordering rules as the index.
///
/// O(n log n) per query; used when no fresh index is available and as a
/// reference in tests.
pub fn brute_force_knn(store: &NodeStore, point: &Point3<f32>, k: usize) -> Vec<Neighbor> {
    if k == 0 || !is_finite_point(point) {
        return Vec::new();
    }

    let query = to_array(point);
    let mut all: Vec<Neighbor> = store
        .iter_valid()
        .map(|(i, node)| Neighbor::new(i, distance_squared(&node.position(), &query)))
        .collect();

    sort_neighbors(&mut all);
    all.truncate(k);
    all
}
