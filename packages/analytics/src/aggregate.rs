//! Per-region and dashboard aggregation.
//!
//! [`aggregate`] makes a single pass over the record set, bucketing every
//! in-scope record by region. When the filter selects a year, records from
//! the year before that match every other dimension are bucketed alongside
//! so growth rates come out of the same pass.
//!
//! The store may instead hand over pre-aggregated [`RegionMetric`]s; those
//! go through [`attach_growth`] and [`summarize`], which apply the same
//! growth formula so both paths agree.

use std::collections::{BTreeMap, HashMap};

use invest_map_analytics_models::{DashboardMetric, FilterState, RegionMetric};
use invest_map_geography_models::normalize_region_name;
use invest_map_investment_models::InvestmentRecord;
use rust_decimal::Decimal;

use crate::filter::matches_ignoring_year;

/// Result of aggregating one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeAggregation {
    /// One metric per region present in the scope, sorted by region name.
    pub regions: Vec<RegionMetric>,
    /// Totals across all regions.
    pub dashboard: DashboardMetric,
}

impl ScopeAggregation {
    /// Returns `true` if the scope matched no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dashboard.is_empty()
    }
}

/// Percentage change from `prior` to `current`:
/// `(current - prior) / prior * 100`.
///
/// Returns `None` when `prior` is zero (there is nothing to compare
/// against) or the arithmetic would overflow.
#[must_use]
pub fn growth_rate(current: Decimal, prior: Decimal) -> Option<Decimal> {
    if prior.is_zero() {
        return None;
    }
    current
        .checked_sub(prior)?
        .checked_div(prior)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Growth for a region given its optional prior-year metric. Absent prior
/// data (no records last year) yields `None`, never 0%.
fn growth_against(current: &RegionMetric, prior: Option<&RegionMetric>) -> Option<Decimal> {
    let prior = prior.filter(|p| p.company_count > 0)?;
    growth_rate(current.total_investment, prior.total_investment)
}

/// Aggregates `records` into per-region metrics and a dashboard metric for
/// the scope selected by `filter`.
///
/// Years that do not occur in the data simply produce an empty scope.
#[must_use]
pub fn aggregate(records: &[InvestmentRecord], filter: &FilterState) -> ScopeAggregation {
    let prior_year = filter.year.map(|y| y - 1);

    let mut current: BTreeMap<String, RegionMetric> = BTreeMap::new();
    let mut prior: BTreeMap<String, RegionMetric> = BTreeMap::new();

    for record in records {
        if !matches_ignoring_year(record, filter) {
            continue;
        }
        let bucket = match filter.year {
            None => &mut current,
            Some(y) if record.year == y => &mut current,
            Some(_) if Some(record.year) == prior_year => &mut prior,
            Some(_) => continue,
        };
        let year = if filter.year.is_some() {
            Some(record.year)
        } else {
            None
        };
        let region = record.region.trim();
        bucket
            .entry(normalize_region_name(region))
            .or_insert_with(|| RegionMetric::empty(region, year))
            .add(record);
    }

    let mut regions: Vec<RegionMetric> = current
        .into_iter()
        .map(|(key, mut metric)| {
            metric.growth_rate = growth_against(&metric, prior.get(&key));
            metric
        })
        .collect();
    sort_by_name(&mut regions);

    let prior_regions: Vec<RegionMetric> = prior.into_values().collect();
    let dashboard = summarize(
        &regions,
        filter.year.is_some().then_some(prior_regions.as_slice()),
    );

    log::debug!(
        "Aggregated {} records into {} regions ({} in scope)",
        records.len(),
        regions.len(),
        dashboard.company_count
    );

    ScopeAggregation { regions, dashboard }
}

/// Fills each region's growth rate from a prior-year metric set, matching
/// regions by normalized name. Regions with no prior entry get `None`.
pub fn attach_growth(current: &mut [RegionMetric], prior: &[RegionMetric]) {
    let by_name: HashMap<String, &RegionMetric> = prior
        .iter()
        .map(|m| (normalize_region_name(&m.region), m))
        .collect();
    for metric in current {
        let prior_metric = by_name.get(&normalize_region_name(&metric.region)).copied();
        metric.growth_rate = growth_against(metric, prior_metric);
    }
}

/// Sums region metrics into a dashboard metric.
///
/// `prior` is the prior-year region set; pass `None` when the scope has no
/// year (growth is then undefined). An empty prior set means no prior data
/// and also yields no growth rate.
#[must_use]
pub fn summarize(regions: &[RegionMetric], prior: Option<&[RegionMetric]>) -> DashboardMetric {
    let mut dashboard = totals(regions);
    dashboard.growth_rate = prior.and_then(|p| {
        let prior_totals = totals(p);
        if prior_totals.is_empty() {
            None
        } else {
            growth_rate(dashboard.total_investment, prior_totals.total_investment)
        }
    });
    dashboard
}

fn totals(regions: &[RegionMetric]) -> DashboardMetric {
    regions
        .iter()
        .fold(DashboardMetric::default(), |mut acc, m| {
            acc.company_count = acc.company_count.saturating_add(m.company_count);
            acc.total_investment = acc.total_investment.saturating_add(m.total_investment);
            acc.total_workers = acc.total_workers.saturating_add(m.total_workers);
            acc
        })
}

fn sort_by_name(regions: &mut [RegionMetric]) {
    regions.sort_by(|a, b| a.region.cmp(&b.region));
}
