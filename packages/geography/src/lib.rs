#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static region boundary registry.
//!
//! Region polygons are authored as TOML files under `regions/` (one per
//! province), embedded at compile time, and parsed once into a shared
//! read-only [`RegionRegistry`]. The registry answers three questions for
//! the map layer: what shape does a region have, what color should it be
//! drawn in, and which region contains a clicked point.
//!
//! Unknown region names are not errors. Investment data can mention a
//! region before its boundary is registered, so lookups return `None` and
//! callers skip the region.

pub mod geometry;
pub mod palette;
pub mod registry;

pub use invest_map_geography_models::normalize_region_name;
pub use registry::{RegionEntry, RegionRegistry, embedded};

use thiserror::Error;

/// Errors that can occur while building a registry from boundary files.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// TOML parsing failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A region's boundary has fewer than three distinct vertices.
    #[error("Region '{region}' has a degenerate boundary")]
    InvalidGeometry {
        /// Region name.
        region: String,
    },

    /// A region's explicit color is not a `#rrggbb` hex string.
    #[error("Region '{region}' has invalid color '{color}'")]
    InvalidColor {
        /// Region name.
        region: String,
        /// The rejected color value.
        color: String,
    },

    /// Two boundary entries normalize to the same region name.
    #[error("Duplicate region '{region}'")]
    Duplicate {
        /// Region name.
        region: String,
    },
}
