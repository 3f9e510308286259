#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine for investment records.
//!
//! Every function here is pure: it takes an immutable record set (or
//! pre-aggregated metrics) and a [`FilterState`](invest_map_analytics_models::FilterState)
//! and returns owned results. The record store uses these functions to
//! answer queries, and the dashboard uses them to finish metrics the store
//! hands back, so there is exactly one definition of every total and every
//! growth rate.

pub mod aggregate;
pub mod breakdown;
pub mod filter;
pub mod rank;

pub use aggregate::{ScopeAggregation, aggregate, attach_growth, growth_rate, summarize};
pub use filter::matches;
pub use rank::rank;
