//! Unified configuration loading for the warp field.
//!
//! Loads all configuration from a single TOML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vikriti_warp::config::WarpConfig;
//!
//! // Load from default path (configs/warp.toml)
//! let config = WarpConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = WarpConfig::default();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`GraphSection`] | Node spacing and weight floor |
//! | [`BlendSection`] | Neighbours used by DQB |
//! | [`EnergySection`] | Robust constants, correspondence gates, λ |
//! | [`AdjacencySection`] | Derived regularization graph |
//!
//! ## Example TOML
//!
//! ```toml
//! [graph]
//! node_spacing = 0.025      # 2.5cm between nodes
//!
//! [blend]
//! neighbors = 8
//!
//! [energy]
//! tukey_c = 4.685
//! huber_delta = 0.0001
//! regularization_weight = 200.0
//!
//! [adjacency]
//! neighbors = 4
//! ```

mod defaults;
mod error;
mod sections;
mod warp;

pub use error::ConfigLoadError;
pub use sections::{AdjacencySection, BlendSection, EnergySection, GraphSection};
pub use warp::WarpConfig;
