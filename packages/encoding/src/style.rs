//! Metric → style mapping.
//!
//! Every region in a scope is normalized against the min and max of the
//! selected metric across that scope, and the resulting intensity drives
//! both fill and stroke opacity. Colors are categorical (one per region);
//! intensity alone carries the comparison.

use invest_map_analytics_models::{MetricSelector, RegionMetric};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::config::EncodingConfig;

/// Min-max normalizes `value` into `[0, 1]`.
///
/// When every value is equal (`max == min`) there is no spread to compare,
/// so `midpoint` is returned instead of dividing by zero.
#[must_use]
pub fn normalize(value: f64, min: f64, max: f64, midpoint: f64) -> f64 {
    let span = max - min;
    if span.abs() <= f64::EPSILON {
        return midpoint;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Drawing style for one region polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStyle {
    /// Fill color (`#rrggbb`).
    pub fill_color: String,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// Stroke color (`#rrggbb`).
    pub stroke_color: String,
    /// Stroke opacity in `[0, 1]`.
    pub stroke_opacity: f64,
    /// Stroke weight in pixels.
    pub stroke_weight: f64,
}

impl RegionStyle {
    /// The transient hover style: same colors and fill, stroke pushed to
    /// the configured emphasis maxima.
    #[must_use]
    pub fn emphasized(&self, config: &EncodingConfig) -> Self {
        Self {
            stroke_weight: config.emphasis_weight,
            stroke_opacity: config.emphasis_opacity,
            ..self.clone()
        }
    }
}

/// Computed encoding for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualEncoding {
    /// Region name.
    pub region: String,
    /// The selected metric's value.
    pub value: Decimal,
    /// Normalized value in `[0, 1]`.
    pub intensity: f64,
    /// Resting style.
    pub style: RegionStyle,
}

fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Encodes every region in `regions` by the selected metric.
///
/// `color_of` supplies each region's categorical color; stroke and fill
/// share it. Output order follows input order.
#[must_use]
pub fn encode<F>(
    regions: &[RegionMetric],
    selector: MetricSelector,
    config: &EncodingConfig,
    color_of: F,
) -> Vec<VisualEncoding>
where
    F: Fn(&str) -> String,
{
    let values: Vec<Decimal> = regions.iter().map(|m| m.value(selector)).collect();
    let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };
    let (min, max) = (as_f64(*min), as_f64(*max));

    regions
        .iter()
        .zip(values)
        .map(|(metric, value)| {
            let intensity = normalize(as_f64(value), min, max, config.midpoint);
            let color = color_of(&metric.region);
            VisualEncoding {
                region: metric.region.clone(),
                value,
                intensity,
                style: RegionStyle {
                    fill_color: color.clone(),
                    fill_opacity: config.fill_opacity.at(intensity),
                    stroke_color: color,
                    stroke_opacity: config.stroke_opacity.at(intensity),
                    stroke_weight: config.stroke_weight,
                },
            }
        })
        .collect()
}

/// Tracks which region, if any, is currently emphasized.
///
/// Emphasis never touches the computed encodings; it only decides which
/// style to hand out for the focused region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmphasisState {
    focused: Option<String>,
}

impl EmphasisState {
    /// Creates a state with nothing focused.
    #[must_use]
    pub const fn new() -> Self {
        Self { focused: None }
    }

    /// Focuses `region`. Returns `true` if the focus changed.
    pub fn focus(&mut self, region: &str) -> bool {
        if self.focused.as_deref() == Some(region) {
            return false;
        }
        log::trace!("Emphasizing region {region}");
        self.focused = Some(region.to_string());
        true
    }

    /// Clears focus, returning the region that was focused.
    pub const fn clear(&mut self) -> Option<String> {
        self.focused.take()
    }

    /// Currently focused region.
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Style to draw `encoding` with right now.
    #[must_use]
    pub fn style_for(&self, encoding: &VisualEncoding, config: &EncodingConfig) -> RegionStyle {
        if self.focused.as_deref() == Some(encoding.region.as_str()) {
            encoding.style.emphasized(config)
        } else {
            encoding.style.clone()
        }
    }
}
