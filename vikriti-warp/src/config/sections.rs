//! Configuration sections.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Deformation graph settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphSection {
    /// Distance between seeded nodes in meters.
    ///
    /// Also the default influence radius (node weight) of every new node,
    /// and therefore the coverage radius used when growing the graph.
    #[serde(default = "defaults::node_spacing")]
    pub node_spacing: f32,

    /// Floor applied to computed node weights
    #[serde(default = "defaults::min_node_weight")]
    pub min_node_weight: f32,
}

impl GraphSection {
    /// Weight assigned to new nodes, clipped to the configured floor.
    #[inline]
    pub fn default_node_weight(&self) -> f32 {
        clip_weight(self.node_spacing, self.min_node_weight)
    }
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            node_spacing: defaults::node_spacing(),
            min_node_weight: defaults::min_node_weight(),
        }
    }
}

/// Clip a computed weight to a strictly positive floor.
///
/// Non-finite or non-positive weights collapse to the floor; a non-positive
/// floor falls back to `f32::EPSILON`.
#[inline]
pub(crate) fn clip_weight(weight: f32, floor: f32) -> f32 {
    let floor = if floor.is_finite() && floor > 0.0 {
        floor
    } else {
        f32::EPSILON
    };
    if weight.is_finite() && weight > floor {
        weight
    } else {
        floor
    }
}

/// Dual quaternion blending settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendSection {
    /// Number of nearest nodes blended per query point
    #[serde(default = "defaults::blend_neighbors")]
    pub neighbors: usize,
}

impl Default for BlendSection {
    fn default() -> Self {
        Self {
            neighbors: defaults::blend_neighbors(),
        }
    }
}

/// Energy model settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergySection {
    /// Tukey biweight cutoff for the data term
    #[serde(default = "defaults::tukey_c")]
    pub tukey_c: f32,

    /// Huber transition point for the regularization term
    #[serde(default = "defaults::huber_delta")]
    pub huber_delta: f32,

    /// Weight λ of the regularization term in the total energy
    #[serde(default = "defaults::regularization_weight")]
    pub regularization_weight: f32,

    /// Maximum point-to-point distance for a projective correspondence (meters)
    #[serde(default = "defaults::max_correspondence_distance")]
    pub max_correspondence_distance: f32,

    /// Maximum angle between warped and live normals (radians)
    #[serde(default = "defaults::max_normal_angle")]
    pub max_normal_angle: f32,
}

impl Default for EnergySection {
    fn default() -> Self {
        Self {
            tukey_c: defaults::tukey_c(),
            huber_delta: defaults::huber_delta(),
            regularization_weight: defaults::regularization_weight(),
            max_correspondence_distance: defaults::max_correspondence_distance(),
            max_normal_angle: defaults::max_normal_angle(),
        }
    }
}

/// Derived node adjacency settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjacencySection {
    /// Nearest other nodes linked to each node
    #[serde(default = "defaults::adjacency_neighbors")]
    pub neighbors: usize,
}

impl Default for AdjacencySection {
    fn default() -> Self {
        Self {
            neighbors: defaults::adjacency_neighbors(),
        }
    }
}
