#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record store gateway.
//!
//! The dashboard never touches persistence directly. It talks to a
//! [`RecordStore`], which answers filtered aggregate and paging queries
//! asynchronously. [`InMemoryStore`] serves a fixed record set through the
//! aggregation engine, and [`TimeoutStore`] bounds any store's calls so a
//! stalled backend surfaces as an error instead of an endless spinner.

pub mod memory;
pub mod timeout;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use invest_map_analytics_models::{
    DashboardMetric, FilterState, PageRequest, RecordPage, RegionMetric,
};

pub use memory::InMemoryStore;
pub use timeout::TimeoutStore;

/// Errors that can occur while fetching from a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not serve the request.
    #[error("Record store unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// The request did not complete in time.
    #[error("Record store did not respond within {after:?}")]
    Timeout {
        /// The configured limit.
        after: Duration,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Asynchronous query interface to the investment record store.
///
/// All region and dashboard metrics returned here are raw scope totals;
/// growth rates are finished by the aggregation engine on the caller side.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Totals across the whole scope.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot answer.
    async fn fetch_dashboard_metrics(
        &self,
        filter: &FilterState,
    ) -> Result<DashboardMetric, StoreError>;

    /// One metric per region in the scope.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot answer.
    async fn fetch_region_metrics(
        &self,
        filter: &FilterState,
    ) -> Result<Vec<RegionMetric>, StoreError>;

    /// Every year that has at least one record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot answer.
    async fn fetch_available_years(&self) -> Result<BTreeSet<i32>, StoreError>;

    /// One page of raw records matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot answer.
    async fn fetch_records(
        &self,
        filter: &FilterState,
        page: PageRequest,
    ) -> Result<RecordPage, StoreError>;

    /// Every city or regency that has at least one record, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot answer.
    async fn fetch_cities(&self) -> Result<Vec<String>, StoreError>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn fetch_dashboard_metrics(
        &self,
        filter: &FilterState,
    ) -> Result<DashboardMetric, StoreError> {
        (**self).fetch_dashboard_metrics(filter).await
    }

    async fn fetch_region_metrics(
        &self,
        filter: &FilterState,
    ) -> Result<Vec<RegionMetric>, StoreError> {
        (**self).fetch_region_metrics(filter).await
    }

    async fn fetch_available_years(&self) -> Result<BTreeSet<i32>, StoreError> {
        (**self).fetch_available_years().await
    }

    async fn fetch_records(
        &self,
        filter: &FilterState,
        page: PageRequest,
    ) -> Result<RecordPage, StoreError> {
        (**self).fetch_records(filter, page).await
    }

    async fn fetch_cities(&self) -> Result<Vec<String>, StoreError> {
        (**self).fetch_cities().await
    }
}
