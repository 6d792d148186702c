//! Derived node adjacency for the regularization term.
//!
//! Each valid node is linked to its `k` nearest other valid nodes. Links are
//! undirected and stored once as `(i, j)` with `i < j`, sorted.

use super::NodeIndex;
use crate::graph::NodeStore;

/// Build the k-nearest-node edge list from a freshly built index.
pub fn derive_adjacency(index: &NodeIndex, store: &NodeStore, k: usize) -> Vec<(usize, usize)> {
    if k == 0 || index.len() < 2 {
        return Vec::new();
    }

    let mut edges = Vec::with_capacity(index.len().saturating_mul(k.min(index.len())));
    for (i, node) in store.iter_valid() {
        // One extra neighbour: the node itself comes back at distance zero
        let neighbors = index.knn_unchecked(&node.vertex, k.saturating_add(1));
        for n in neighbors.iter().filter(|n| n.index != i).take(k) {
            edges.push((i.min(n.index), i.max(n.index)));
        }
    }

    edges.sort_unstable();
    edges.dedup();
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DeformationNode;
    use nalgebra::Point3;

    fn line_store(n: usize) -> NodeStore {
        let mut store = NodeStore::new();
        for i in 0..n {
            store.push(DeformationNode::new(Point3::new(i as f32, 0.0, 0.0), 1.0));
        }
        store
    }

    #[test]
    fn test_chain_adjacency() {
        let store = line_store(4);
        let mut index = NodeIndex::empty();
        index.rebuild(&store, 1);

        // Node 1 is equidistant to 0 and 2 and picks 0; node 2 picks 1
        assert_eq!(index.adjacency(), &[(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_adjacency_is_deduplicated() {
        let store = line_store(5);
        let mut index = NodeIndex::empty();
        index.rebuild(&store, 2);

        let edges = index.adjacency();
        let mut sorted = edges.to_vec();
        sorted.dedup();
        assert_eq!(sorted.len(), edges.len());
        assert!(edges.iter().all(|(i, j)| i < j));
    }

    #[test]
    fn test_no_adjacency_for_single_node() {
        let store = line_store(1);
        let mut index = NodeIndex::empty();
        index.rebuild(&store, 4);
        assert!(index.adjacency().is_empty());
    }

    #[test]
    fn test_adjacency_skips_invalid() {
        let mut store = line_store(3);
        store.invalidate(1).unwrap();
        let mut index = NodeIndex::empty();
        index.rebuild(&store, 1);
        assert_eq!(index.adjacency(), &[(0, 2)]);
    }

    #[test]
    fn test_unbounded_k_links_every_pair() {
        let store = line_store(3);
        let mut index = NodeIndex::empty();
        index.rebuild(&store, usize::MAX);
        assert_eq!(index.adjacency(), &[(0, 1), (0, 2), (1, 2)]);
    }
}
