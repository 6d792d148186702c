//! Point batch containers.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::core::types::Surfel;
use crate::error::{Result, check_batch};

/// Where a batch's data lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Residency {
    /// Ordinary host memory, updated in place.
    Host,
    /// Staged buffers with a distinct output, processed in parallel.
    Device,
}

/// A set of surfels the field can warp.
pub trait PointBatch {
    /// Where this batch's data lives.
    fn residency(&self) -> Residency;

    /// Number of surfels.
    fn len(&self) -> usize;

    /// Check if the batch is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map every surfel through `f`.
    fn apply(&mut self, f: &(dyn Fn(&Surfel) -> Surfel + Sync));
}

/// Host-resident surfels, warped in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfelBatch {
    surfels: Vec<Surfel>,
}

impl SurfelBatch {
    /// Pair points with their normals.
    pub fn new(points: &[Point3<f32>], normals: &[Vector3<f32>]) -> Result<Self> {
        check_batch(points.len(), normals.len())?;
        Ok(Self {
            surfels: points
                .iter()
                .zip(normals)
                .map(|(p, n)| Surfel::new(*p, *n))
                .collect(),
        })
    }

    /// Wrap existing surfels.
    pub fn from_surfels(surfels: Vec<Surfel>) -> Self {
        Self { surfels }
    }

    /// Current surfels.
    #[inline]
    pub fn surfels(&self) -> &[Surfel] {
        &self.surfels
    }

    /// Current points, in order.
    pub fn points(&self) -> Vec<Point3<f32>> {
        self.surfels.iter().map(|s| s.point).collect()
    }

    /// Current normals, in order.
    pub fn normals(&self) -> Vec<Vector3<f32>> {
        self.surfels.iter().map(|s| s.normal).collect()
    }

    /// Take the surfels out of the batch.
    pub fn into_surfels(self) -> Vec<Surfel> {
        self.surfels
    }
}

impl PointBatch for SurfelBatch {
    fn residency(&self) -> Residency {
        Residency::Host
    }

    fn len(&self) -> usize {
        self.surfels.len()
    }

    fn apply(&mut self, f: &(dyn Fn(&Surfel) -> Surfel + Sync)) {
        for surfel in &mut self.surfels {
            *surfel = f(surfel);
        }
    }
}

/// Device-style cloud: input stays untouched, results land in `output`.
///
/// The output stays empty until the first [`PointBatch::apply`].
#[derive(Clone, Debug, Default)]
pub struct DeviceCloud {
    input: Vec<Surfel>,
    output: Vec<Surfel>,
}

impl DeviceCloud {
    /// Stage surfels for processing.
    pub fn upload(surfels: Vec<Surfel>) -> Self {
        Self {
            input: surfels,
            output: Vec::new(),
        }
    }

    /// Stage points with their normals.
    pub fn from_points(points: &[Point3<f32>], normals: &[Vector3<f32>]) -> Result<Self> {
        Ok(Self::upload(SurfelBatch::new(points, normals)?.into_surfels()))
    }

    /// Staged input surfels.
    #[inline]
    pub fn input(&self) -> &[Surfel] {
        &self.input
    }

    /// Output buffer of the last run.
    #[inline]
    pub fn output(&self) -> &[Surfel] {
        &self.output
    }

    /// Take the output buffer.
    pub fn download(self) -> Vec<Surfel> {
        self.output
    }
}

impl PointBatch for DeviceCloud {
    fn residency(&self) -> Residency {
        Residency::Device
    }

    fn len(&self) -> usize {
        self.input.len()
    }

    fn apply(&mut self, f: &(dyn Fn(&Surfel) -> Surfel + Sync)) {
        self.input.par_iter().map(f).collect_into_vec(&mut self.output);
    }
}
