//! Warp field facade.
//!
//! [`WarpField`] owns the deformation graph, its spatial index and the rigid
//! `warp_to_live` pose, and exposes every per-frame operation:
//!
//! ```text
//! canonical surfel ──DQB──> blended motion ──warp_to_live──> live surfel
//! ```
//!
//! Mutations (`init`, `insert_new_nodes`, `invalidate_node`, `clear`) rebuild
//! the index before returning, so queries always see a fresh index. Transform
//! writes from the solver leave node positions untouched and need no rebuild.

use nalgebra::{Isometry3, Matrix3xX, Point3, UnitDualQuaternion, Vector3};
use rayon::prelude::*;

use crate::blend::{self, Blender};
use crate::config::WarpConfig;
use crate::core::dual_quat;
use crate::core::math::normalize_or_zero;
use crate::core::types::{CameraIntrinsics, Surfel};
use crate::energy::{
    DataTerm, EnergyTerms, RegularizationTerm, TransformPair, energy_data, energy_reg,
};
use crate::error::{Result, WarpError, check_batch};
use crate::graph::{DeformationNode, GraphBuilder, NodeStore};
use crate::index::{Neighbor, NodeIndex, brute_force_knn};
use crate::surface::LiveSurface;
use crate::warp::{DeviceCloud, PointBatch};

/// Lifecycle of a warp field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState {
    /// No graph has been seeded since creation or the last `clear`.
    Uninitialized,
    /// The graph holds nodes and the field can be evaluated.
    Ready,
}

/// Non-rigid warp field over a deformation node graph.
#[derive(Debug, Clone)]
pub struct WarpField {
    config: WarpConfig,
    store: NodeStore,
    index: NodeIndex,
    blender: Blender,
    builder: GraphBuilder,
    warp_to_live: Isometry3<f32>,
    latest_squared: Vec<f32>,
    state: FieldState,
}

impl WarpField {
    /// Create an empty field.
    pub fn new(config: WarpConfig) -> Self {
        let store = NodeStore::new();
        let mut index = NodeIndex::empty();
        index.rebuild(&store, config.adjacency.neighbors);

        Self {
            blender: Blender::new(config.blend.neighbors),
            builder: GraphBuilder::new(&config),
            config,
            store,
            index,
            warp_to_live: Isometry3::identity(),
            latest_squared: Vec::new(),
            state: FieldState::Uninitialized,
        }
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &WarpConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> FieldState {
        self.state
    }

    /// Check if the field has been seeded.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == FieldState::Ready
    }

    // ========================================================================
    // Graph mutation
    // ========================================================================

    /// Replace the graph with nodes seeded from a first observation.
    ///
    /// Returns the number of nodes created. On a batch size mismatch the
    /// existing graph is left untouched.
    pub fn init(&mut self, points: &[Point3<f32>], normals: &[Vector3<f32>]) -> Result<usize> {
        check_batch(points.len(), normals.len())?;

        self.store.clear();
        self.index.rebuild(&self.store, self.config.adjacency.neighbors);
        self.latest_squared.clear();

        let stats = self.builder.insert(
            &mut self.store,
            &mut self.index,
            &self.blender,
            points,
            normals,
        )?;
        self.latest_squared.resize(self.store.len(), 0.0);
        self.state = FieldState::Ready;

        log::info!(
            "Warp field initialized: {} nodes from {} points (spacing {:.4})",
            stats.added,
            points.len(),
            self.builder.node_weight()
        );
        Ok(stats.added)
    }

    /// Grow the graph where the candidates are not yet covered.
    ///
    /// Returns the number of nodes created.
    pub fn insert_new_nodes(
        &mut self,
        points: &[Point3<f32>],
        normals: &[Vector3<f32>],
    ) -> Result<usize> {
        self.ensure_fresh();
        let stats = self.builder.insert(
            &mut self.store,
            &mut self.index,
            &self.blender,
            points,
            normals,
        )?;
        self.latest_squared.resize(self.store.len(), 0.0);

        if stats.added > 0 && self.state == FieldState::Uninitialized {
            self.state = FieldState::Ready;
        }
        Ok(stats.added)
    }

    /// Retire a node. It keeps its slot but no longer takes part in queries.
    ///
    /// Returns `true` if the node was valid before the call.
    pub fn invalidate_node(&mut self, index: usize) -> Result<bool> {
        let changed = self.store.invalidate(index)?;
        if changed {
            self.index.rebuild(&self.store, self.config.adjacency.neighbors);
        }
        Ok(changed)
    }

    /// Write back a solver update for one node.
    ///
    /// The transform is renormalized. Degenerate input is rejected and the
    /// node keeps its previous transform.
    pub fn set_node_transform(
        &mut self,
        index: usize,
        transform: &UnitDualQuaternion<f32>,
    ) -> Result<()> {
        self.store.set_transform(index, transform)
    }

    /// Snapshot of every node transform, in insertion order.
    pub fn node_transforms(&self) -> Vec<UnitDualQuaternion<f32>> {
        self.store.transforms()
    }

    /// Roll every node transform back to a snapshot.
    ///
    /// Either all transforms are restored or none are.
    pub fn restore_node_transforms(&mut self, snapshot: &[UnitDualQuaternion<f32>]) -> Result<()> {
        if snapshot.len() != self.store.len() {
            return Err(WarpError::SnapshotSizeMismatch {
                expected: self.store.len(),
                got: snapshot.len(),
            });
        }
        if let Some(index) = snapshot
            .iter()
            .position(|t| dual_quat::renormalize(t.as_ref()).is_none())
        {
            return Err(WarpError::DegenerateTransform { index });
        }

        for (i, transform) in snapshot.iter().enumerate() {
            self.store.set_transform(i, transform)?;
        }
        Ok(())
    }

    /// Drop every node and return to the uninitialized state.
    pub fn clear(&mut self) {
        let dropped = self.store.len();
        self.store.clear();
        self.index.rebuild(&self.store, self.config.adjacency.neighbors);
        self.warp_to_live = Isometry3::identity();
        self.latest_squared.clear();
        self.state = FieldState::Uninitialized;

        log::info!("Warp field cleared ({} nodes dropped)", dropped);
    }

    fn ensure_fresh(&mut self) {
        if !self.index.is_fresh(&self.store) {
            self.index.rebuild(&self.store, self.config.adjacency.neighbors);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// k nearest valid nodes, ascending by distance, ties by insertion index.
    pub fn knn(&self, point: &Point3<f32>, k: usize) -> Vec<Neighbor> {
        debug_assert!(
            self.index.is_fresh(&self.store),
            "node index queried while stale"
        );
        self.index.knn(&self.store, point, k).unwrap_or_else(|| {
            log::warn!("Stale node index, falling back to linear scan");
            brute_force_knn(&self.store, point, k)
        })
    }

    /// Blended node motion at a canonical point (identity on an empty graph).
    pub fn dqb(&self, point: &Point3<f32>) -> UnitDualQuaternion<f32> {
        let neighbors = self.knn(point, self.blender.neighbors());
        self.blender.blend(&self.store, &neighbors)
    }

    /// Gaussian influence falloff used by the blend.
    #[inline]
    pub fn weighting(&self, squared_distance: f32, weight: f32) -> f32 {
        blend::weighting(squared_distance, weight)
    }

    /// Full canonical to live transform at a point: `warp_to_live ∘ DQB`.
    pub fn transform_at(&self, point: &Point3<f32>) -> Isometry3<f32> {
        self.warp_to_live * self.dqb(point).to_isometry()
    }

    /// Warp one canonical point into the live frame.
    pub fn warp_point(&self, point: &Point3<f32>) -> Point3<f32> {
        if !crate::core::math::is_finite_point(point) {
            return *point;
        }
        self.transform_at(point) * point
    }

    /// Warp one canonical surfel.
    ///
    /// Non-finite points pass through unchanged; the normal only rotates.
    pub fn warp_surfel(&self, surfel: &Surfel) -> Surfel {
        if !surfel.has_finite_point() {
            return *surfel;
        }
        let iso = self.transform_at(&surfel.point);
        Surfel::new(
            iso * surfel.point,
            normalize_or_zero(&(iso.rotation * surfel.normal)),
        )
    }

    /// Warp every surfel of a host or device batch.
    pub fn warp<B: PointBatch + ?Sized>(&self, batch: &mut B) {
        let warp = |s: &Surfel| self.warp_surfel(s);
        batch.apply(&warp);

        log::trace!(
            "Warped {} surfels ({:?} batch, {} nodes)",
            batch.len(),
            batch.residency(),
            self.store.valid_count()
        );
    }

    /// Replace the rigid pose composed after the non-rigid blend.
    #[inline]
    pub fn set_warp_to_live(&mut self, pose: Isometry3<f32>) {
        self.warp_to_live = pose;
    }

    /// Current rigid canonical to live pose.
    #[inline]
    pub fn warp_to_live(&self) -> &Isometry3<f32> {
        &self.warp_to_live
    }

    // ========================================================================
    // Energy
    // ========================================================================

    /// Evaluate the total energy of the current transforms for one frame.
    ///
    /// Sets `warp_to_live` to `pose`, warps `frame` (canonical surfels) into
    /// the live frame and scores it against `surface`. When `edges` is `None`
    /// the derived k-nearest-node adjacency is regularized.
    pub fn energy<S: LiveSurface + ?Sized>(
        &mut self,
        frame: &[Surfel],
        pose: &Isometry3<f32>,
        surface: &S,
        intrinsics: &CameraIntrinsics,
        edges: Option<&[(usize, usize)]>,
    ) -> EnergyTerms {
        self.set_warp_to_live(*pose);

        let mut cloud = DeviceCloud::upload(frame.to_vec());
        self.warp(&mut cloud);

        let data = self.energy_data(cloud.output(), intrinsics, surface);
        let pairs = self.edge_transforms(edges.unwrap_or(self.index.adjacency()));
        let regularization = self.energy_reg(&pairs);

        self.latest_squared = self.accumulate_squared(frame, &data.residuals);

        let terms = EnergyTerms::new(data, regularization, self.config.energy.regularization_weight);
        log::debug!(
            "Energy {:.6} (data {:.6} over {} matches, reg {:.6} over {} edges)",
            terms.total,
            terms.data.value,
            terms.data.correspondences,
            terms.regularization.value,
            terms.regularization.edges
        );
        terms
    }

    /// Data term for surfels already in the live frame.
    pub fn energy_data<S: LiveSurface + ?Sized>(
        &self,
        warped: &[Surfel],
        intrinsics: &CameraIntrinsics,
        surface: &S,
    ) -> DataTerm {
        energy_data(warped, intrinsics, surface, &self.config.energy)
    }

    /// Regularization term over explicit transform pairs.
    pub fn energy_reg(&self, edges: &[TransformPair]) -> RegularizationTerm {
        energy_reg(edges, self.config.energy.huber_delta)
    }

    /// Resolve node index pairs to transform pairs.
    ///
    /// Pairs that reference a missing or retired node are skipped.
    pub fn edge_transforms(&self, edges: &[(usize, usize)]) -> Vec<TransformPair> {
        edges
            .iter()
            .filter_map(|&(i, j)| {
                let a = self.store.get(i).filter(|n| n.valid)?;
                let b = self.store.get(j).filter(|n| n.valid)?;
                Some(TransformPair::new(a.transform, b.transform))
            })
            .collect()
    }

    /// Per-node squared data residuals from the last `energy` call.
    ///
    /// Each entry is the blend-weighted mean of the squared residuals of the
    /// surfels the node influences, or 0 without support.
    #[inline]
    pub fn latest_squared(&self) -> &[f32] {
        &self.latest_squared
    }

    fn accumulate_squared(&self, frame: &[Surfel], residuals: &[Option<f32>]) -> Vec<f32> {
        let n = self.store.len();
        let zeros = || (vec![0.0f32; n], vec![0.0f32; n]);

        let (weighted, support) = frame
            .par_iter()
            .zip(residuals)
            .filter_map(|(surfel, &residual)| residual.map(|r| (surfel, r)))
            .fold(zeros, |(mut weighted, mut support), (surfel, r)| {
                let neighbors = self.knn(&surfel.point, self.blender.neighbors());
                let weights = self.blender.weights(&self.store, &neighbors);
                for (neighbor, w) in neighbors.iter().zip(weights) {
                    weighted[neighbor.index] += w * r * r;
                    support[neighbor.index] += w;
                }
                (weighted, support)
            })
            .reduce(zeros, |(mut weighted, mut support), (w, s)| {
                weighted.iter_mut().zip(&w).for_each(|(a, b)| *a += b);
                support.iter_mut().zip(&s).for_each(|(a, b)| *a += b);
                (weighted, support)
            });

        weighted
            .iter()
            .zip(&support)
            .map(|(&s, &w)| if w > f32::MIN_POSITIVE { s / w } else { 0.0 })
            .collect()
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// All nodes in insertion order, including retired ones.
    #[inline]
    pub fn nodes(&self) -> &[DeformationNode] {
        self.store.nodes()
    }

    /// Total node count, including retired nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.store.len()
    }

    /// Number of valid nodes.
    #[inline]
    pub fn valid_node_count(&self) -> usize {
        self.store.valid_count()
    }

    /// Canonical node positions in insertion order.
    pub fn node_positions(&self) -> Vec<Point3<f32>> {
        self.store.positions()
    }

    /// Node positions as a 3×N matrix, one column per node.
    pub fn node_matrix(&self) -> Matrix3xX<f32> {
        let nodes = self.store.nodes();
        Matrix3xX::from_iterator(
            nodes.len(),
            nodes.iter().flat_map(|n| [n.vertex.x, n.vertex.y, n.vertex.z]),
        )
    }

    /// Derived k-nearest-node adjacency `(i, j)` with `i < j`.
    #[inline]
    pub fn adjacency(&self) -> &[(usize, usize)] {
        self.index.adjacency()
    }
}

impl Default for WarpField {
    fn default() -> Self {
        Self::new(WarpConfig::default())
    }
}
