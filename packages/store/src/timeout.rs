//! Per-call time limit for any [`RecordStore`].

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use invest_map_analytics_models::{
    DashboardMetric, FilterState, PageRequest, RecordPage, RegionMetric,
};

use crate::{RecordStore, StoreError};

/// Default limit for a single store call.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Wraps a store so every call fails with [`StoreError::Timeout`] once it
/// runs longer than the configured limit.
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    limit: Duration,
}

impl<S: RecordStore> TimeoutStore<S> {
    /// Wraps `inner` with the given per-call limit.
    pub const fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    /// Wraps `inner` with [`DEFAULT_FETCH_TIMEOUT`].
    pub const fn with_default_timeout(inner: S) -> Self {
        Self::new(inner, DEFAULT_FETCH_TIMEOUT)
    }

    /// The wrapped store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// The per-call limit.
    pub const fn limit(&self) -> Duration {
        self.limit
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        if let Ok(result) = tokio::time::timeout(self.limit, fut).await {
            result
        } else {
            log::warn!("{operation} timed out after {:?}", self.limit);
            Err(StoreError::Timeout { after: self.limit })
        }
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for TimeoutStore<S> {
    async fn fetch_dashboard_metrics(
        &self,
        filter: &FilterState,
    ) -> Result<DashboardMetric, StoreError> {
        self.bounded(
            "fetch_dashboard_metrics",
            self.inner.fetch_dashboard_metrics(filter),
        )
        .await
    }

    async fn fetch_region_metrics(
        &self,
        filter: &FilterState,
    ) -> Result<Vec<RegionMetric>, StoreError> {
        self.bounded(
            "fetch_region_metrics",
            self.inner.fetch_region_metrics(filter),
        )
        .await
    }

    async fn fetch_available_years(&self) -> Result<BTreeSet<i32>, StoreError> {
        self.bounded("fetch_available_years", self.inner.fetch_available_years())
            .await
    }

    async fn fetch_records(
        &self,
        filter: &FilterState,
        page: PageRequest,
    ) -> Result<RecordPage, StoreError> {
        self.bounded("fetch_records", self.inner.fetch_records(filter, page))
            .await
    }

    async fn fetch_cities(&self) -> Result<Vec<String>, StoreError> {
        self.bounded("fetch_cities", self.inner.fetch_cities()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;

    /// A store whose year lookup never completes.
    struct StalledStore;

    #[async_trait]
    impl RecordStore for StalledStore {
        async fn fetch_dashboard_metrics(
            &self,
            _filter: &FilterState,
        ) -> Result<DashboardMetric, StoreError> {
            Ok(DashboardMetric::default())
        }

        async fn fetch_region_metrics(
            &self,
            _filter: &FilterState,
        ) -> Result<Vec<RegionMetric>, StoreError> {
            Ok(Vec::new())
        }

        async fn fetch_available_years(&self) -> Result<BTreeSet<i32>, StoreError> {
            std::future::pending().await
        }

        async fn fetch_records(
            &self,
            _filter: &FilterState,
            page: PageRequest,
        ) -> Result<RecordPage, StoreError> {
            Ok(RecordPage {
                records: Vec::new(),
                page: page.page,
                per_page: page.per_page,
                total: 0,
            })
        }

        async fn fetch_cities(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_call_times_out() {
        let store = TimeoutStore::new(StalledStore, Duration::from_millis(50));
        let err = store.fetch_available_years().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Timeout { after } if after == Duration::from_millis(50)
        ));
        // Other calls are unaffected.
        assert!(store.fetch_cities().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let store = TimeoutStore::with_default_timeout(InMemoryStore::default());
        assert_eq!(store.limit(), DEFAULT_FETCH_TIMEOUT);
        assert!(store.fetch_available_years().await.unwrap().is_empty());
        assert!(store.inner().records().is_empty());
    }
}
