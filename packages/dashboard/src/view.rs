//! View models handed to table, metric-card, and map renderers.

use invest_map_analytics::rank;
use invest_map_analytics_models::{
    DashboardMetric, FilterState, MetricSelector, RecordPage, RegionMetric, SortDirection,
};
use invest_map_encoding::{EncodingConfig, VisualEncoding, encode};
use invest_map_geography::RegionRegistry;
use invest_map_geography_models::normalize_region_name;

/// Everything the dashboard shows for one filter scope.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// The filter this view was computed for.
    pub filter: FilterState,
    /// Metric regions are ranked and colored by.
    pub metric: MetricSelector,
    /// Scope totals.
    pub dashboard: DashboardMetric,
    /// Region metrics in rank order.
    pub regions: Vec<RegionMetric>,
    /// One encoding per entry of `regions`, same order.
    pub encodings: Vec<VisualEncoding>,
    /// First page of raw records.
    pub records: RecordPage,
}

impl DashboardView {
    /// Ranks `regions` and encodes them for the map.
    #[must_use]
    pub fn build(
        filter: FilterState,
        dashboard: DashboardMetric,
        regions: &[RegionMetric],
        records: RecordPage,
        style: &ViewStyle<'_>,
    ) -> Self {
        let regions = rank(regions, style.metric, style.direction);
        let encodings = encode(&regions, style.metric, style.encoding, |name| {
            style.registry.color(name)
        });
        Self {
            filter,
            metric: style.metric,
            dashboard,
            regions,
            encodings,
            records,
        }
    }

    /// Re-ranks and re-encodes for a different metric without refetching.
    #[must_use]
    pub fn with_metric(self, style: &ViewStyle<'_>) -> Self {
        Self::build(
            self.filter,
            self.dashboard,
            &self.regions,
            self.records,
            style,
        )
    }

    /// Returns `true` if the scope matched no records. An empty view is a
    /// valid result, distinct from [`DashboardState::Unavailable`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dashboard.is_empty()
    }

    /// Looks up a region's metric by name (case-insensitive).
    #[must_use]
    pub fn region(&self, name: &str) -> Option<&RegionMetric> {
        let key = normalize_region_name(name);
        self.regions
            .iter()
            .find(|m| normalize_region_name(&m.region) == key)
    }

    /// Iterates over `(metric, encoding)` pairs in rank order.
    pub fn ranked(&self) -> impl Iterator<Item = (&RegionMetric, &VisualEncoding)> {
        self.regions.iter().zip(&self.encodings)
    }
}

/// Ranking and styling inputs for [`DashboardView::build`].
#[derive(Debug, Clone, Copy)]
pub struct ViewStyle<'a> {
    /// Metric to rank and color by.
    pub metric: MetricSelector,
    /// Ranking direction.
    pub direction: SortDirection,
    /// Opacity and stroke parameters.
    pub encoding: &'a EncodingConfig,
    /// Source of region colors.
    pub registry: &'a RegionRegistry,
}

/// What consumers should render right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DashboardState {
    /// A fetch is in flight and nothing has been applied yet.
    #[default]
    Loading,
    /// Data for the current filter.
    Ready(Box<DashboardView>),
    /// The store could not answer. Rendered inline as "data unavailable",
    /// never as zeros.
    Unavailable(String),
}

impl DashboardState {
    /// The view, if ready.
    #[must_use]
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            Self::Ready(view) => Some(view.as_ref()),
            Self::Loading | Self::Unavailable(_) => None,
        }
    }

    /// Returns `true` if the last fetch failed.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
