#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Regional investment dashboard.
//!
//! Wires the pieces together: a [`FilterCoordinator`] owns the filter and
//! publishes every change, a [`Dashboard`] fetches from a
//! [`RecordStore`](invest_map_store::RecordStore), finishes the metrics with
//! the aggregation engine, and encodes them, and a [`MapLayer`] pushes the
//! result to the map. Tables and metric cards read the same
//! [`DashboardView`], so every view shows the same scope.

pub mod config;
pub mod coordinator;
pub mod map;
pub mod refresh;
pub mod view;

pub use config::{ConfigError, DashboardConfig};
pub use coordinator::{
    FieldUpdate, FilterCoordinator, FilterObserver, FilterPatch, FilterSnapshot, ObserverId,
};
pub use map::{MapLayer, MapRenderer, RenderSummary};
pub use refresh::{Dashboard, LatestRequest, RefreshOutcome, Ticket, load_filter_options};
pub use view::{DashboardState, DashboardView, ViewStyle};
