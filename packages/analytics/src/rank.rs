//! Region ranking.

use invest_map_analytics_models::{MetricSelector, RegionMetric, SortDirection};

/// Orders regions by the selected metric.
///
/// Ties are broken by region name ascending regardless of direction, so the
/// output is fully deterministic.
#[must_use]
pub fn rank(
    regions: &[RegionMetric],
    selector: MetricSelector,
    direction: SortDirection,
) -> Vec<RegionMetric> {
    let mut ranked = regions.to_vec();
    ranked.sort_by(|a, b| {
        let by_value = a.value(selector).cmp(&b.value(selector));
        let by_value = match direction {
            SortDirection::Ascending => by_value,
            SortDirection::Descending => by_value.reverse(),
        };
        by_value.then_with(|| a.region.cmp(&b.region))
    });
    ranked
}
