//! Warp Field Benchmarks
//!
//! Benchmarks for the per-frame hot path:
//! - Graph seeding and index rebuild
//! - Nearest-node queries and dual quaternion blending
//! - Host and device batch warps
//! - Full energy evaluation
//!
//! Run with: `cargo bench`
//! View HTML reports in: `target/criterion/`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use nalgebra::{Isometry3, Point3, Translation3, UnitDualQuaternion, UnitQuaternion, Vector3};
use vikriti_warp::{
    CameraIntrinsics, DeviceCloud, Surfel, SurfelBatch, VertexMap, WarpConfig, WarpField,
};

// ============================================================================
// Test Fixtures
// ============================================================================

const IMAGE_SIZE: usize = 64;

/// Gently curved sheet in front of the camera, one surfel per pixel.
fn create_sheet(intrinsics: &CameraIntrinsics, size: usize) -> Vec<Surfel> {
    let mut surfels = Vec::with_capacity(size * size);
    for v in 0..size {
        for u in 0..size {
            let r = (u as f32 - size as f32 / 2.0) / size as f32;
            let depth = 1.0 + 0.1 * r * r;
            let point = intrinsics.unproject(u as f32, v as f32, depth);
            surfels.push(Surfel::new(point, Vector3::new(0.0, 0.0, -1.0)));
        }
    }
    surfels
}

fn create_intrinsics() -> CameraIntrinsics {
    let c = (IMAGE_SIZE - 1) as f32 / 2.0;
    CameraIntrinsics::new(80.0, 80.0, c, c)
}

fn split(surfels: &[Surfel]) -> (Vec<Point3<f32>>, Vec<Vector3<f32>>) {
    (
        surfels.iter().map(|s| s.point).collect(),
        surfels.iter().map(|s| s.normal).collect(),
    )
}

/// Seeded field with a small twist on every node.
fn create_field(surfels: &[Surfel]) -> WarpField {
    let (points, normals) = split(surfels);
    let mut field = WarpField::new(WarpConfig::with_node_spacing(0.02));
    field.init(&points, &normals).expect("seed field");

    for i in 0..field.node_count() {
        let angle = 0.001 * i as f32;
        let motion = UnitDualQuaternion::from_parts(
            Translation3::new(0.0, 0.0, 0.002 * (i % 5) as f32),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle),
        );
        field.set_node_transform(i, &motion).expect("node transform");
    }
    field
}

// ============================================================================
// Graph
// ============================================================================

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));
    group.warm_up_time(Duration::from_secs(1));

    let intrinsics = create_intrinsics();
    let surfels = create_sheet(&intrinsics, IMAGE_SIZE);
    let (points, normals) = split(&surfels);

    group.bench_function("init/4096", |b| {
        b.iter(|| {
            let mut field = WarpField::new(WarpConfig::with_node_spacing(0.02));
            black_box(field.init(black_box(&points), &normals).ok())
        })
    });

    let field = create_field(&surfels);
    group.bench_function("insert_covered/4096", |b| {
        b.iter_batched(
            || field.clone(),
            |mut f| black_box(f.insert_new_nodes(&points, &normals).ok()),
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

// ============================================================================
// Queries
// ============================================================================

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));

    let intrinsics = create_intrinsics();
    let surfels = create_sheet(&intrinsics, IMAGE_SIZE);
    let field = create_field(&surfels);
    let query = surfels[IMAGE_SIZE * IMAGE_SIZE / 2 + 7].point;

    group.bench_function("knn/8", |b| b.iter(|| field.knn(black_box(&query), 8)));
    group.bench_function("dqb", |b| b.iter(|| field.dqb(black_box(&query))));
    group.bench_function("warp_point", |b| {
        b.iter(|| field.warp_point(black_box(&query)))
    });

    group.finish();
}

// ============================================================================
// Batch warp
// ============================================================================

fn bench_warp(c: &mut Criterion) {
    let mut group = c.benchmark_group("warp");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));
    group.warm_up_time(Duration::from_secs(1));

    let intrinsics = create_intrinsics();
    let surfels = create_sheet(&intrinsics, IMAGE_SIZE);
    let field = create_field(&surfels);

    group.bench_function("host/4096", |b| {
        b.iter_batched(
            || SurfelBatch::from_surfels(surfels.clone()),
            |mut batch| {
                field.warp(&mut batch);
                batch
            },
            criterion::BatchSize::LargeInput,
        )
    });

    let mut cloud = DeviceCloud::upload(surfels.clone());
    group.bench_function("device/4096", |b| {
        b.iter(|| {
            field.warp(&mut cloud);
            black_box(cloud.output().len())
        })
    });

    group.finish();
}

// ============================================================================
// Energy
// ============================================================================

fn bench_energy(c: &mut Criterion) {
    let mut group = c.benchmark_group("energy");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));
    group.warm_up_time(Duration::from_secs(1));

    let intrinsics = create_intrinsics();
    let surfels = create_sheet(&intrinsics, IMAGE_SIZE);
    let live = VertexMap::render(&surfels, &intrinsics, IMAGE_SIZE, IMAGE_SIZE);
    let mut field = create_field(&surfels);
    let pose = Isometry3::identity();

    group.bench_function("total/4096", |b| {
        b.iter(|| {
            let terms = field.energy(black_box(&surfels), &pose, &live, &intrinsics, None);
            black_box(terms.total)
        })
    });

    let warped = {
        let mut cloud = DeviceCloud::upload(surfels.clone());
        field.warp(&mut cloud);
        cloud.download()
    };
    group.bench_function("data/4096", |b| {
        b.iter(|| black_box(field.energy_data(&warped, &intrinsics, &live).value))
    });

    let pairs = field.edge_transforms(field.adjacency());
    group.bench_function("reg/adjacency", |b| {
        b.iter(|| black_box(field.energy_reg(&pairs).value))
    });

    group.finish();
}

criterion_group!(benches, bench_graph, bench_queries, bench_warp, bench_energy);
criterion_main!(benches);
