#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter, metric, and paging types for the aggregation engine.
//!
//! [`FilterState`] selects a scope of investment records. The engine turns
//! that scope into one [`RegionMetric`] per region plus a single
//! [`DashboardMetric`]; consumers rank, encode, and page through them.

use invest_map_investment_models::{CapitalStatus, InvestmentRecord, Subsector};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The current filter selection. Every field is optional; a record must
/// satisfy all specified fields to be in scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Fiscal year.
    pub year: Option<i32>,
    /// Creative-economy subsector.
    pub subsector: Option<Subsector>,
    /// City or regency name.
    pub city: Option<String>,
    /// Domestic or foreign capital.
    pub capital_status: Option<CapitalStatus>,
    /// Free-text search over company name, registration id, and
    /// classification code.
    pub search: Option<String>,
}

impl FilterState {
    /// Returns a copy scoped to the given year.
    #[must_use]
    pub fn with_year(&self, year: i32) -> Self {
        Self {
            year: Some(year),
            ..self.clone()
        }
    }

    /// Returns the same filter moved one year back, or `None` when no year
    /// is selected.
    #[must_use]
    pub fn prior_year(&self) -> Option<Self> {
        self.year.map(|y| self.with_year(y - 1))
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.year.is_none()
            && self.subsector.is_none()
            && self.city.is_none()
            && self.capital_status.is_none()
            && self.search.is_none()
    }
}

/// Which metric to rank or color regions by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MetricSelector {
    /// Number of companies.
    CompanyCount,
    /// Total investment amount.
    #[default]
    Investment,
    /// Total workers.
    Workers,
}

impl MetricSelector {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CompanyCount => "Companies",
            Self::Investment => "Investment",
            Self::Workers => "Workers",
        }
    }
}

/// Ranking direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}

/// Aggregated metrics for one region in one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionMetric {
    /// Region name.
    pub region: String,
    /// Year of the scope, `None` when the scope spans all years.
    pub year: Option<i32>,
    /// Number of matching investment records.
    pub company_count: u64,
    /// Sum of investment amounts.
    pub total_investment: Decimal,
    /// Sum of worker counts.
    pub total_workers: u64,
    /// Percentage change in investment versus the prior year. `None` means
    /// there is no prior-year data to compare against, which is not the
    /// same as 0%.
    pub growth_rate: Option<Decimal>,
}

impl RegionMetric {
    /// Creates an empty metric for a region.
    #[must_use]
    pub fn empty(region: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            region: region.into(),
            year,
            company_count: 0,
            total_investment: Decimal::ZERO,
            total_workers: 0,
            growth_rate: None,
        }
    }

    /// Returns the selected metric as a decimal.
    #[must_use]
    pub fn value(&self, selector: MetricSelector) -> Decimal {
        match selector {
            MetricSelector::CompanyCount => Decimal::from(self.company_count),
            MetricSelector::Investment => self.total_investment,
            MetricSelector::Workers => Decimal::from(self.total_workers),
        }
    }

    /// Adds one record's contribution. Totals saturate instead of
    /// overflowing.
    pub fn add(&mut self, record: &InvestmentRecord) {
        self.company_count = self.company_count.saturating_add(1);
        self.total_investment = self.total_investment.saturating_add(record.amount);
        self.total_workers = self
            .total_workers
            .saturating_add(u64::from(record.workers));
    }
}

/// Global summary for the current scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetric {
    /// Total number of matching investment records.
    pub company_count: u64,
    /// Sum of investment amounts.
    pub total_investment: Decimal,
    /// Sum of worker counts.
    pub total_workers: u64,
    /// Percentage change in total investment versus the prior year.
    pub growth_rate: Option<Decimal>,
}

impl Default for DashboardMetric {
    fn default() -> Self {
        Self {
            company_count: 0,
            total_investment: Decimal::ZERO,
            total_workers: 0,
            growth_rate: None,
        }
    }
}

impl DashboardMetric {
    /// Returns `true` if the scope matched no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.company_count == 0
    }
}

/// Totals for one bucket of a breakdown (a subsector or a capital status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    /// Machine key (`SCREAMING_SNAKE_CASE` enum name).
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Number of records in the bucket.
    pub company_count: u64,
    /// Sum of investment amounts.
    pub total_investment: Decimal,
    /// Sum of worker counts.
    pub total_workers: u64,
}

/// Totals for one year of a trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyPoint {
    /// Fiscal year.
    pub year: i32,
    /// Number of records.
    pub company_count: u64,
    /// Sum of investment amounts.
    pub total_investment: Decimal,
    /// Sum of worker counts.
    pub total_workers: u64,
}

/// A page request for the raw record table. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Records per page.
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 25,
        }
    }
}

impl PageRequest {
    /// Creates a page request, clamping `page` and `per_page` to at least 1.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Index of the first record on this page.
    #[must_use]
    pub fn offset(self) -> usize {
        (self.page.max(1) as usize - 1) * self.per_page as usize
    }
}

/// One page of raw investment records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    /// Records on this page.
    pub records: Vec<InvestmentRecord>,
    /// Page number, starting at 1.
    pub page: u32,
    /// Records per page.
    pub per_page: u32,
    /// Total records matching the filter across all pages.
    pub total: u64,
}

impl RecordPage {
    /// Total number of pages (at least 1).
    #[must_use]
    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(u64::from(self.per_page.max(1))).max(1)
    }
}

/// Choices offered by the filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// All 16 subsectors.
    pub subsectors: Vec<Subsector>,
    /// Both capital statuses.
    pub capital_statuses: Vec<CapitalStatus>,
    /// Cities present in the data, sorted.
    pub cities: Vec<String>,
    /// Years present in the data, ascending.
    pub years: Vec<i32>,
}

impl FilterOptions {
    /// Builds options from the dynamic city/year lists plus the fixed
    /// enumerations.
    #[must_use]
    pub fn new(cities: Vec<String>, years: Vec<i32>) -> Self {
        Self {
            subsectors: Subsector::all().to_vec(),
            capital_statuses: CapitalStatus::all().to_vec(),
            cities,
            years,
        }
    }
}
