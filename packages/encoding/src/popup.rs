//! Popup text for a region on the map.

use std::fmt;

use invest_map_analytics_models::RegionMetric;
use num_format::{Locale, ToFormattedString};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Label/value rows shown when a region is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupContent {
    /// Region name.
    pub title: String,
    /// `(label, value)` rows in display order.
    pub rows: Vec<(String, String)>,
}

impl fmt::Display for PopupContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        for (label, value) in &self.rows {
            write!(f, "\n{label}: {value}")?;
        }
        Ok(())
    }
}

/// Formats an integer count with thousands separators.
#[must_use]
pub fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Formats an amount with thousands separators, rounded to two decimals.
/// Whole amounts are printed without a fractional part.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2).abs();
    let whole = rounded.trunc();
    let cents = ((rounded - whole) * Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or_default();
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let whole = whole.to_u128().map_or_else(
        || whole.to_string(),
        |w| w.to_formatted_string(&Locale::en),
    );
    if cents == 0 {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{cents:02}")
    }
}

/// Formats a growth rate as a signed percentage with one decimal, or
/// `"no data"` when there is nothing to compare against.
#[must_use]
pub fn format_growth(growth: Option<Decimal>) -> String {
    growth.map_or_else(
        || "no data".to_string(),
        |g| {
            let g = g.round_dp(1);
            if g.is_sign_positive() && !g.is_zero() {
                format!("+{g:.1}%")
            } else {
                format!("{g:.1}%")
            }
        },
    )
}

/// Builds the popup for a region's metrics.
#[must_use]
pub fn popup_content(metric: &RegionMetric) -> PopupContent {
    let mut rows = Vec::with_capacity(5);
    if let Some(year) = metric.year {
        rows.push(("Year".to_string(), year.to_string()));
    }
    rows.push(("Companies".to_string(), format_count(metric.company_count)));
    rows.push((
        "Investment".to_string(),
        format!("Rp {}", format_amount(metric.total_investment)),
    ));
    rows.push(("Workers".to_string(), format_count(metric.total_workers)));
    rows.push(("Growth".to_string(), format_growth(metric.growth_rate)));

    PopupContent {
        title: metric.region.clone(),
        rows,
    }
}
