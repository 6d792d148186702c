//! Graph seeding, growth and lifecycle tests.

mod common;

use common::{grid_field, init_logging, unit_grid};
use nalgebra::{Point3, UnitDualQuaternion, Vector3};
use vikriti_warp::{FieldState, WarpConfig, WarpError, WarpField};

#[test]
fn test_grid_init_yields_25_identity_nodes() {
    init_logging();
    let field = grid_field(2.0);

    assert_eq!(field.state(), FieldState::Ready);
    assert_eq!(field.node_count(), 25);

    let weight = field.nodes()[0].weight;
    for node in field.nodes() {
        assert!(node.valid);
        assert_eq!(node.transform, UnitDualQuaternion::identity());
        assert_eq!(node.weight, weight);
    }
}

#[test]
fn test_insert_inside_radius_adds_nothing() {
    let mut field = grid_field(2.0);
    let added = field
        .insert_new_nodes(&[Point3::new(2.5, 2.5, 0.0)], &[Vector3::z()])
        .unwrap();
    assert_eq!(added, 0);
    assert_eq!(field.node_count(), 25);
}

#[test]
fn test_insert_far_point_adds_exactly_one() {
    let mut field = grid_field(2.0);
    let far = Point3::new(109.0, 9.0, 0.0);

    let added = field.insert_new_nodes(&[far], &[Vector3::z()]).unwrap();
    assert_eq!(added, 1);
    assert_eq!(field.node_count(), 26);
    assert_eq!(field.nodes()[25].vertex, far);

    // Immediately visible to queries
    let nearest = field.knn(&far, 1);
    assert_eq!(nearest[0].index, 25);
    assert_eq!(nearest[0].distance_sq, 0.0);
}

#[test]
fn test_weights_stay_positive() {
    let mut config = WarpConfig::with_node_spacing(1e-9);
    config.graph.min_node_weight = 1e-3;
    let mut field = WarpField::new(config);

    let (points, normals) = unit_grid(4);
    field.init(&points, &normals).unwrap();
    field
        .insert_new_nodes(&[Point3::new(0.5, 0.5, 0.0)], &[Vector3::z()])
        .unwrap();

    assert!(field.nodes().iter().all(|n| n.weight > 0.0));
    assert!(field.nodes().iter().all(|n| n.weight == 1e-3));
}

#[test]
fn test_insert_mismatch_is_rejected() {
    let mut field = grid_field(2.0);
    let err = field
        .insert_new_nodes(&[Point3::new(50.0, 0.0, 0.0)], &[])
        .unwrap_err();
    assert_eq!(
        err,
        WarpError::BatchSizeMismatch {
            points: 1,
            normals: 0
        }
    );
    assert_eq!(field.node_count(), 25);
}

#[test]
fn test_clear_then_reinit() {
    let mut field = grid_field(2.0);
    field.clear();
    assert_eq!(field.state(), FieldState::Uninitialized);
    assert!(field.knn(&Point3::origin(), 8).is_empty());
    assert_eq!(field.dqb(&Point3::origin()), UnitDualQuaternion::identity());

    let (points, normals) = unit_grid(10);
    assert_eq!(field.init(&points, &normals).unwrap(), 25);
    assert_eq!(field.state(), FieldState::Ready);
}

#[test]
fn test_single_node_dqb_is_node_transform() {
    let mut field = WarpField::new(WarpConfig::with_node_spacing(0.5));
    field.init(&[Point3::origin()], &[Vector3::z()]).unwrap();

    let motion = UnitDualQuaternion::from_parts(
        nalgebra::Translation3::new(0.1, 0.2, 0.3),
        nalgebra::UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.9),
    );
    field.set_node_transform(0, &motion).unwrap();
    let stored = field.nodes()[0].transform;

    for p in [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.3, -0.1, 0.0),
        Point3::new(100.0, 50.0, -20.0),
    ] {
        assert_eq!(field.dqb(&p), stored);
    }
}

#[test]
fn test_degenerate_transform_rejected() {
    let mut field = grid_field(2.0);
    let before = field.nodes()[4].transform;

    let zero = UnitDualQuaternion::new_unchecked(nalgebra::DualQuaternion::from_real_and_dual(
        nalgebra::Quaternion::new(0.0, 0.0, 0.0, 0.0),
        nalgebra::Quaternion::new(0.0, 0.0, 0.0, 0.0),
    ));
    assert_eq!(
        field.set_node_transform(4, &zero),
        Err(WarpError::DegenerateTransform { index: 4 })
    );
    assert_eq!(field.nodes()[4].transform, before);
}

#[test]
fn test_invalidated_node_leaves_adjacency() {
    let mut field = grid_field(2.0);
    assert!(field.adjacency().iter().any(|&(i, j)| i == 12 || j == 12));

    field.invalidate_node(12).unwrap();
    assert!(field.adjacency().iter().all(|&(i, j)| i != 12 && j != 12));
    assert_eq!(field.valid_node_count(), 24);
    assert_eq!(field.node_count(), 25);
}
