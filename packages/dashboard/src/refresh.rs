//! Fetching and applying dashboard data.
//!
//! A filter change may arrive while the fetch for the previous filter is
//! still in flight. Every refresh takes a ticket from [`LatestRequest`]
//! before fetching and applies its result only if that ticket is still the
//! newest once the state lock is held. Older results are dropped, so the
//! view never mixes data from two filters regardless of completion order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use invest_map_analytics::{attach_growth, summarize};
use invest_map_analytics_models::{
    DashboardMetric, FilterOptions, FilterState, MetricSelector, PageRequest, RecordPage,
    RegionMetric,
};
use invest_map_geography::RegionRegistry;
use invest_map_store::{RecordStore, StoreError, TimeoutStore};
use tokio::sync::{RwLock, watch};

use crate::config::DashboardConfig;
use crate::coordinator::FilterSnapshot;
use crate::view::{DashboardState, DashboardView, ViewStyle};

/// A refresh's position in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out monotonically increasing tickets and answers whether a ticket
/// is still the newest.
#[derive(Debug, Default)]
pub struct LatestRequest {
    latest: AtomicU64,
}

impl LatestRequest {
    /// Creates a tracker with no tickets issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns `true` if no ticket has been issued after `ticket`.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Whether a refresh's result reached the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The result (data or failure) is now the dashboard state.
    Applied,
    /// A newer refresh was issued first; the result was discarded.
    Superseded,
}

type Fetched = (DashboardMetric, Vec<RegionMetric>, RecordPage);

struct Inner {
    state: DashboardState,
    metric: MetricSelector,
}

/// Fetches, aggregates, and encodes dashboard data for a record store.
pub struct Dashboard<S> {
    store: S,
    config: DashboardConfig,
    registry: &'static RegionRegistry,
    requests: LatestRequest,
    page_requests: LatestRequest,
    inner: RwLock<Inner>,
    states: watch::Sender<DashboardState>,
}

impl<S: RecordStore> Dashboard<TimeoutStore<S>> {
    /// Creates a dashboard whose store calls are bounded by
    /// [`DashboardConfig::fetch_timeout`].
    #[must_use]
    pub fn with_timeout(store: S, config: DashboardConfig) -> Self {
        let limit = config.fetch_timeout();
        Self::new(TimeoutStore::new(store, limit), config)
    }
}

impl<S: RecordStore> Dashboard<S> {
    /// Creates a dashboard over `store` using the embedded region registry.
    #[must_use]
    pub fn new(store: S, config: DashboardConfig) -> Self {
        let (states, _) = watch::channel(DashboardState::Loading);
        let metric = config.default_metric;
        Self {
            store,
            config,
            registry: invest_map_geography::embedded(),
            requests: LatestRequest::new(),
            page_requests: LatestRequest::new(),
            inner: RwLock::new(Inner {
                state: DashboardState::Loading,
                metric,
            }),
            states,
        }
    }

    /// Uses `registry` for region colors instead of the embedded one.
    #[must_use]
    pub const fn with_registry(mut self, registry: &'static RegionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The registry used for colors.
    pub const fn registry(&self) -> &'static RegionRegistry {
        self.registry
    }

    /// A clone of the current state.
    pub async fn state(&self) -> DashboardState {
        self.inner.read().await.state.clone()
    }

    /// A receiver notified every time a result is applied, and when a
    /// refresh after a failure goes back to loading.
    pub fn watch_state(&self) -> watch::Receiver<DashboardState> {
        self.states.subscribe()
    }

    /// The metric regions are currently ranked and colored by.
    pub async fn metric(&self) -> MetricSelector {
        self.inner.read().await.metric
    }

    fn style(&self, metric: MetricSelector) -> ViewStyle<'_> {
        ViewStyle {
            metric,
            direction: self.config.sort_direction,
            encoding: &self.config.encoding,
            registry: self.registry,
        }
    }

    /// Fetches and applies data for `filter`.
    ///
    /// Store failures become [`DashboardState::Unavailable`]; they are
    /// reported through the state, not returned. A result whose refresh
    /// was overtaken by a newer one is discarded.
    pub async fn refresh(&self, filter: &FilterState) -> RefreshOutcome {
        let ticket = self.requests.issue();
        {
            let mut inner = self.inner.write().await;
            if self.requests.is_current(ticket) && inner.state.is_unavailable() {
                inner.state = DashboardState::Loading;
                self.states.send_replace(DashboardState::Loading);
            }
        }

        let result = self.fetch(filter).await;

        let mut inner = self.inner.write().await;
        if !self.requests.is_current(ticket) {
            log::debug!("Discarding superseded refresh for {filter:?}");
            return RefreshOutcome::Superseded;
        }

        inner.state = match result {
            Ok((dashboard, regions, records)) => {
                let view = DashboardView::build(
                    filter.clone(),
                    dashboard,
                    &regions,
                    records,
                    &self.style(inner.metric),
                );
                log::debug!(
                    "Applied view: {} regions, {} records in scope",
                    view.regions.len(),
                    view.dashboard.company_count
                );
                DashboardState::Ready(Box::new(view))
            }
            Err(e) => {
                log::warn!("Dashboard data unavailable: {e}");
                DashboardState::Unavailable(e.to_string())
            }
        };
        self.states.send_replace(inner.state.clone());
        RefreshOutcome::Applied
    }

    async fn fetch(&self, filter: &FilterState) -> Result<Fetched, StoreError> {
        let prior_filter = filter.prior_year();
        let page = PageRequest::new(1, self.config.page_size);

        let (mut regions, prior, records) = tokio::try_join!(
            self.store.fetch_region_metrics(filter),
            async {
                match &prior_filter {
                    Some(prior_filter) => self.store.fetch_region_metrics(prior_filter).await,
                    None => Ok(Vec::new()),
                }
            },
            self.store.fetch_records(filter, page),
        )?;

        if prior_filter.is_some() {
            attach_growth(&mut regions, &prior);
        } else {
            for region in &mut regions {
                region.growth_rate = None;
            }
        }
        let dashboard = summarize(&regions, prior_filter.as_ref().map(|_| prior.as_slice()));
        Ok((dashboard, regions, records))
    }

    /// Switches the ranking/coloring metric and re-encodes the current
    /// view without refetching.
    pub async fn set_metric(&self, metric: MetricSelector) {
        let mut inner = self.inner.write().await;
        if inner.metric == metric {
            return;
        }
        inner.metric = metric;
        let state = std::mem::take(&mut inner.state);
        inner.state = match state {
            DashboardState::Ready(view) => {
                DashboardState::Ready(Box::new(view.with_metric(&self.style(metric))))
            }
            other => other,
        };
        self.states.send_replace(inner.state.clone());
    }

    /// Loads another page of raw records for the current view.
    ///
    /// The page is applied only if the view still shows the filter it was
    /// requested for and no newer page request was made meanwhile.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot answer. The current view
    /// is left untouched.
    pub async fn load_page(&self, page: u32) -> Result<RefreshOutcome, StoreError> {
        let ticket = self.page_requests.issue();
        let Some(filter) = self.inner.read().await.state.view().map(|v| v.filter.clone()) else {
            return Ok(RefreshOutcome::Superseded);
        };

        let records = self
            .store
            .fetch_records(&filter, PageRequest::new(page, self.config.page_size))
            .await?;

        let mut inner = self.inner.write().await;
        if !self.page_requests.is_current(ticket) {
            return Ok(RefreshOutcome::Superseded);
        }
        match &mut inner.state {
            DashboardState::Ready(view) if view.filter == filter => {
                view.records = records;
            }
            _ => return Ok(RefreshOutcome::Superseded),
        }
        self.states.send_replace(inner.state.clone());
        Ok(RefreshOutcome::Applied)
    }
}

impl<S: RecordStore + 'static> Dashboard<S> {
    /// Refreshes on every snapshot published to `snapshots` until the
    /// sender is dropped.
    ///
    /// Each refresh runs as its own task, so a slow fetch never delays the
    /// next filter change; the ticket check decides which one lands.
    pub async fn follow(self: Arc<Self>, mut snapshots: watch::Receiver<FilterSnapshot>) {
        loop {
            let snapshot = snapshots.borrow_and_update().clone();
            let dashboard = Arc::clone(&self);
            tokio::spawn(async move {
                dashboard.refresh(&snapshot.state).await;
            });
            if snapshots.changed().await.is_err() {
                log::debug!("Filter channel closed; no longer following");
                return;
            }
        }
    }
}

impl<S> std::fmt::Debug for Dashboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}

/// Fetches the choices for the filter bar.
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot list cities or years.
pub async fn load_filter_options<S: RecordStore + ?Sized>(
    store: &S,
) -> Result<FilterOptions, StoreError> {
    let (cities, years) = tokio::try_join!(store.fetch_cities(), store.fetch_available_years())?;
    Ok(FilterOptions::new(cities, years.into_iter().collect()))
}
