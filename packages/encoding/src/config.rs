//! Tunable encoding parameters.

use serde::{Deserialize, Serialize};

use crate::EncodingError;

/// A floor/ceiling pair that intensity is mapped onto linearly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityRange {
    /// Opacity at intensity 0.
    pub floor: f64,
    /// Opacity at intensity 1.
    pub ceiling: f64,
}

impl OpacityRange {
    /// Maps an intensity in `[0, 1]` onto this range.
    #[must_use]
    pub fn at(self, intensity: f64) -> f64 {
        intensity.mul_add(self.ceiling - self.floor, self.floor)
    }

    fn validate(self, field: &'static str) -> Result<(), EncodingError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if in_unit(self.floor) && in_unit(self.ceiling) && self.floor <= self.ceiling {
            Ok(())
        } else {
            Err(EncodingError::InvalidBounds {
                field,
                floor: self.floor,
                ceiling: self.ceiling,
            })
        }
    }
}

/// Parameters for turning metric values into region styles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncodingConfig {
    /// Fill opacity range.
    pub fill_opacity: OpacityRange,
    /// Stroke opacity range.
    pub stroke_opacity: OpacityRange,
    /// Stroke weight for unfocused regions.
    pub stroke_weight: f64,
    /// Stroke weight while a region is hovered.
    pub emphasis_weight: f64,
    /// Stroke opacity while a region is hovered.
    pub emphasis_opacity: f64,
    /// Intensity assigned when every region has the same value.
    pub midpoint: f64,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            fill_opacity: OpacityRange {
                floor: 0.4,
                ceiling: 0.7,
            },
            stroke_opacity: OpacityRange {
                floor: 0.3,
                ceiling: 0.8,
            },
            stroke_weight: 2.0,
            emphasis_weight: 4.0,
            emphasis_opacity: 1.0,
            midpoint: 0.5,
        }
    }
}

impl EncodingConfig {
    /// Checks that every range and fixed value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidBounds`] if an opacity range falls
    /// outside `[0, 1]` or has its floor above its ceiling, and
    /// [`EncodingError::InvalidValue`] for a non-positive stroke weight or
    /// an out-of-range midpoint or emphasis opacity.
    pub fn validate(&self) -> Result<(), EncodingError> {
        self.fill_opacity.validate("fillOpacity")?;
        self.stroke_opacity.validate("strokeOpacity")?;

        let unit = 0.0..=1.0;
        if !unit.contains(&self.midpoint) {
            return Err(EncodingError::InvalidValue {
                field: "midpoint",
                value: self.midpoint,
            });
        }
        if !unit.contains(&self.emphasis_opacity) {
            return Err(EncodingError::InvalidValue {
                field: "emphasisOpacity",
                value: self.emphasis_opacity,
            });
        }
        for (field, value) in [
            ("strokeWeight", self.stroke_weight),
            ("emphasisWeight", self.emphasis_weight),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(EncodingError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EncodingConfig::default().validate().unwrap();
    }

    #[test]
    fn opacity_range_interpolates() {
        let range = EncodingConfig::default().fill_opacity;
        assert!((range.at(0.0) - 0.4).abs() < 1e-9);
        assert!((range.at(1.0) - 0.7).abs() < 1e-9);
        assert!((range.at(0.5) - 0.55).abs() < 1e-9);
    }

    #[test]
    fn rejects_inverted_range() {
        let config = EncodingConfig {
            fill_opacity: OpacityRange {
                floor: 0.8,
                ceiling: 0.2,
            },
            ..EncodingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EncodingError::InvalidBounds {
                field: "fillOpacity",
                ..
            })
        ));
    }

    #[test]
    fn rejects_out_of_unit_range() {
        let config = EncodingConfig {
            stroke_opacity: OpacityRange {
                floor: 0.3,
                ceiling: 1.5,
            },
            ..EncodingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EncodingConfig {
            stroke_weight: 0.0,
            ..EncodingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EncodingError::InvalidValue {
                field: "strokeWeight",
                ..
            })
        ));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: EncodingConfig = toml::from_str(
            r"
            strokeWeight = 3.0

            [fillOpacity]
            floor = 0.2
            ceiling = 0.9
            ",
        )
        .unwrap();
        assert!((config.stroke_weight - 3.0).abs() < f64::EPSILON);
        assert!((config.fill_opacity.floor - 0.2).abs() < f64::EPSILON);
        assert!((config.midpoint - 0.5).abs() < f64::EPSILON);
    }
}
