#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Visual encoding of region metrics.
//!
//! Converts a scope's [`RegionMetric`](invest_map_analytics_models::RegionMetric)s
//! into per-region styles for the map overlay: a normalized intensity, fill
//! and stroke opacity interpolated from it, the region's categorical color,
//! and an emphasized variant for hover. Also renders popup text.

pub mod config;
pub mod popup;
pub mod style;

pub use config::{EncodingConfig, OpacityRange};
pub use popup::{PopupContent, popup_content};
pub use style::{EmphasisState, RegionStyle, VisualEncoding, encode, normalize};

use thiserror::Error;

/// Errors from validating an [`EncodingConfig`].
#[derive(Debug, Error)]
pub enum EncodingError {
    /// An opacity range is outside `[0, 1]` or inverted.
    #[error("Invalid {field} bounds: floor {floor}, ceiling {ceiling}")]
    InvalidBounds {
        /// Config field name.
        field: &'static str,
        /// Configured floor.
        floor: f64,
        /// Configured ceiling.
        ceiling: f64,
    },

    /// A single value is out of range.
    #[error("Invalid {field}: {value}")]
    InvalidValue {
        /// Config field name.
        field: &'static str,
        /// Configured value.
        value: f64,
    },
}
