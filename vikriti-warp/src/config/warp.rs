//! Main WarpConfig and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigLoadError;
use super::sections::{AdjacencySection, BlendSection, EnergySection, GraphSection};

/// Default config file location, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "configs/warp.toml";

/// Full warp field configuration loaded from TOML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct WarpConfig {
    /// Deformation graph settings
    #[serde(default)]
    pub graph: GraphSection,

    /// Blending settings
    #[serde(default)]
    pub blend: BlendSection,

    /// Energy model settings
    #[serde(default)]
    pub energy: EnergySection,

    /// Derived adjacency settings
    #[serde(default)]
    pub adjacency: AdjacencySection,
}

impl WarpConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Load from default config path (configs/warp.toml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from TOML string and validate
    pub fn from_toml(contents: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config with a given node spacing and defaults elsewhere.
    pub fn with_node_spacing(node_spacing: f32) -> Self {
        let mut config = Self::default();
        config.graph.node_spacing = node_spacing;
        config
    }

    /// Reject values that would break the weight or neighbour invariants.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        positive("graph.node_spacing", self.graph.node_spacing)?;
        positive("graph.min_node_weight", self.graph.min_node_weight)?;
        positive("energy.tukey_c", self.energy.tukey_c)?;
        positive("energy.huber_delta", self.energy.huber_delta)?;
        positive(
            "energy.max_correspondence_distance",
            self.energy.max_correspondence_distance,
        )?;
        positive("energy.max_normal_angle", self.energy.max_normal_angle)?;

        if !self.energy.regularization_weight.is_finite() || self.energy.regularization_weight < 0.0
        {
            return Err(ConfigLoadError::Invalid {
                field: "energy.regularization_weight",
                reason: format!(
                    "must be finite and non-negative, got {}",
                    self.energy.regularization_weight
                ),
            });
        }
        if self.blend.neighbors == 0 {
            return Err(ConfigLoadError::Invalid {
                field: "blend.neighbors",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigLoadError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigLoadError::Invalid {
            field,
            reason: format!("must be finite and positive, got {}", value),
        })
    }
}
