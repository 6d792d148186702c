//! Default value functions for serde deserialization.

pub fn node_spacing() -> f32 {
    0.025
}

pub fn min_node_weight() -> f32 {
    1e-4
}

pub fn blend_neighbors() -> usize {
    8
}

pub fn adjacency_neighbors() -> usize {
    4
}

pub fn tukey_c() -> f32 {
    4.685
}

pub fn huber_delta() -> f32 {
    1e-4
}

pub fn regularization_weight() -> f32 {
    200.0
}

pub fn max_correspondence_distance() -> f32 {
    0.1
}

pub fn max_normal_angle() -> f32 {
    // 30 degrees
    std::f32::consts::FRAC_PI_6
}
