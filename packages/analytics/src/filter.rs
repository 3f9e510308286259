//! Record-level filter matching.
//!
//! Filters are conjunctive: a record is in scope only if it satisfies every
//! dimension the filter specifies. Unset dimensions match everything.

use invest_map_analytics_models::FilterState;
use invest_map_geography_models::normalize_region_name;
use invest_map_investment_models::InvestmentRecord;

/// Returns `true` if `record` satisfies every dimension of `filter`.
#[must_use]
pub fn matches(record: &InvestmentRecord, filter: &FilterState) -> bool {
    filter.year.is_none_or(|y| record.year == y) && matches_ignoring_year(record, filter)
}

/// Like [`matches`] but skips the year dimension. Used to pull prior-year
/// records and trend series for an otherwise identical scope.
#[must_use]
pub fn matches_ignoring_year(record: &InvestmentRecord, filter: &FilterState) -> bool {
    if filter.subsector.is_some_and(|s| record.subsector != s) {
        return false;
    }
    if filter
        .capital_status
        .is_some_and(|c| record.capital_status != c)
    {
        return false;
    }
    if let Some(city) = filter.city.as_deref()
        && normalize_region_name(city) != normalize_region_name(&record.region)
    {
        return false;
    }
    if let Some(search) = filter.search.as_deref() {
        return matches_search(record, search);
    }
    true
}

/// Case-insensitive substring match over company name, registration id,
/// and classification code. Blank queries match everything.
#[must_use]
pub fn matches_search(record: &InvestmentRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        record.company_name.as_str(),
        record.registration_id.as_str(),
        record.classification_code.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}
