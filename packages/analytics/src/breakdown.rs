//! Secondary views over a scope: subsector and capital-status breakdowns,
//! yearly trend series, and the distinct years and cities in a record set.

use std::collections::{BTreeMap, BTreeSet};

use invest_map_analytics_models::{BreakdownEntry, FilterState, YearlyPoint};
use invest_map_geography_models::normalize_region_name;
use invest_map_investment_models::{CapitalStatus, InvestmentRecord, Subsector};
use rust_decimal::Decimal;

use crate::filter::{matches, matches_ignoring_year};

fn empty_entry(key: &str, label: &str) -> BreakdownEntry {
    BreakdownEntry {
        key: key.to_string(),
        label: label.to_string(),
        company_count: 0,
        total_investment: Decimal::ZERO,
        total_workers: 0,
    }
}

fn add_to(entry: &mut BreakdownEntry, record: &InvestmentRecord) {
    entry.company_count = entry.company_count.saturating_add(1);
    entry.total_investment = entry.total_investment.saturating_add(record.amount);
    entry.total_workers = entry.total_workers.saturating_add(u64::from(record.workers));
}

/// Investment descending, then key ascending.
fn sort_entries(entries: &mut [BreakdownEntry]) {
    entries.sort_by(|a, b| {
        b.total_investment
            .cmp(&a.total_investment)
            .then_with(|| a.key.cmp(&b.key))
    });
}

/// Groups in-scope records by subsector. Only subsectors with at least one
/// record appear.
#[must_use]
pub fn breakdown_by_subsector(
    records: &[InvestmentRecord],
    filter: &FilterState,
) -> Vec<BreakdownEntry> {
    let mut buckets: BTreeMap<Subsector, BreakdownEntry> = BTreeMap::new();
    for record in records.iter().filter(|r| matches(r, filter)) {
        let entry = buckets
            .entry(record.subsector)
            .or_insert_with(|| empty_entry(record.subsector.as_ref(), record.subsector.label()));
        add_to(entry, record);
    }
    let mut entries: Vec<_> = buckets.into_values().collect();
    sort_entries(&mut entries);
    entries
}

/// Groups in-scope records by capital status. Only statuses with at least
/// one record appear.
#[must_use]
pub fn breakdown_by_capital_status(
    records: &[InvestmentRecord],
    filter: &FilterState,
) -> Vec<BreakdownEntry> {
    let mut buckets: BTreeMap<CapitalStatus, BreakdownEntry> = BTreeMap::new();
    for record in records.iter().filter(|r| matches(r, filter)) {
        let status = record.capital_status;
        let entry = buckets
            .entry(status)
            .or_insert_with(|| empty_entry(status.as_ref(), status.label()));
        add_to(entry, record);
    }
    let mut entries: Vec<_> = buckets.into_values().collect();
    sort_entries(&mut entries);
    entries
}

/// Per-year totals for the filter's scope with the year dimension ignored.
/// One point per year that has data, ascending.
#[must_use]
pub fn yearly_trend(records: &[InvestmentRecord], filter: &FilterState) -> Vec<YearlyPoint> {
    let mut points: BTreeMap<i32, YearlyPoint> = BTreeMap::new();
    for record in records.iter().filter(|r| matches_ignoring_year(r, filter)) {
        let point = points.entry(record.year).or_insert_with(|| YearlyPoint {
            year: record.year,
            company_count: 0,
            total_investment: Decimal::ZERO,
            total_workers: 0,
        });
        point.company_count = point.company_count.saturating_add(1);
        point.total_investment = point.total_investment.saturating_add(record.amount);
        point.total_workers = point.total_workers.saturating_add(u64::from(record.workers));
    }
    points.into_values().collect()
}

/// Distinct years present in the record set.
#[must_use]
pub fn available_years(records: &[InvestmentRecord]) -> BTreeSet<i32> {
    records.iter().map(|r| r.year).collect()
}

/// Distinct region names present in the record set, sorted. Names that
/// differ only in case or spacing are collapsed to the first spelling seen.
#[must_use]
pub fn available_cities(records: &[InvestmentRecord]) -> Vec<String> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for record in records {
        let name = record.region.trim();
        if name.is_empty() {
            continue;
        }
        seen.entry(normalize_region_name(name))
            .or_insert_with(|| name.to_string());
    }
    let mut cities: Vec<String> = seen.into_values().collect();
    cities.sort();
    cities
}
