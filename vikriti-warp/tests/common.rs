//! Test utilities for warp field integration tests.
//!
//! Helpers for building canonical grids, live planes and seeded fields.

#![allow(dead_code)]

use nalgebra::{Point3, Vector3};
use vikriti_warp::{CameraIntrinsics, Surfel, VertexMap, WarpConfig, WarpField};

/// Flat `n × n` grid at z = 0 with unit spacing, row-major.
pub fn unit_grid(n: usize) -> (Vec<Point3<f32>>, Vec<Vector3<f32>>) {
    let mut points = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            points.push(Point3::new(x as f32, y as f32, 0.0));
        }
    }
    let normals = vec![Vector3::z(); points.len()];
    (points, normals)
}

/// Field seeded from a 10×10 unit grid.
pub fn grid_field(spacing: f32) -> WarpField {
    let mut field = WarpField::new(WarpConfig::with_node_spacing(spacing));
    let (points, normals) = unit_grid(10);
    field.init(&points, &normals).expect("grid init");
    field
}

/// Small pinhole camera for a `size × size` image.
pub fn camera(size: usize) -> CameraIntrinsics {
    let c = (size - 1) as f32 / 2.0;
    CameraIntrinsics::new(100.0, 100.0, c, c)
}

/// Surfels of a fronto-parallel plane at `depth`, one per pixel, row-major.
pub fn plane_surfels(intrinsics: &CameraIntrinsics, size: usize, depth: f32) -> Vec<Surfel> {
    let mut surfels = Vec::with_capacity(size * size);
    for v in 0..size {
        for u in 0..size {
            let point = intrinsics.unproject(u as f32, v as f32, depth);
            surfels.push(Surfel::new(point, Vector3::new(0.0, 0.0, -1.0)));
        }
    }
    surfels
}

/// Organized live map of the same plane.
pub fn plane_map(intrinsics: &CameraIntrinsics, size: usize, depth: f32) -> VertexMap {
    let surfels = plane_surfels(intrinsics, size, depth);
    let points: Vec<_> = surfels.iter().map(|s| s.point).collect();
    let normals: Vec<_> = surfels.iter().map(|s| s.normal).collect();
    VertexMap::from_organized(size, size, &points, &normals).expect("organized plane")
}

/// Field seeded on the plane surfels with default configuration.
pub fn plane_field(surfels: &[Surfel]) -> WarpField {
    let mut field = WarpField::new(WarpConfig::default());
    let points: Vec<_> = surfels.iter().map(|s| s.point).collect();
    let normals: Vec<_> = surfels.iter().map(|s| s.normal).collect();
    field.init(&points, &normals).expect("plane init");
    field
}

/// Install a test logger once per binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
