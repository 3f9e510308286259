//! Dashboard configuration.
//!
//! Loaded from TOML with every field optional, then overridden by
//! environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `INVEST_MAP_FETCH_TIMEOUT_MS` | `fetchTimeoutMs` |
//! | `INVEST_MAP_PAGE_SIZE` | `pageSize` |
//! | `INVEST_MAP_DEFAULT_METRIC` | `defaultMetric` |

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use invest_map_analytics_models::{MetricSelector, SortDirection};
use invest_map_encoding::{EncodingConfig, EncodingError};
use serde::{Deserialize, Serialize};

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A field is out of range.
    #[error("Invalid {field}: {message}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// The encoding section is invalid.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

const ENV_FETCH_TIMEOUT_MS: &str = "INVEST_MAP_FETCH_TIMEOUT_MS";
const ENV_PAGE_SIZE: &str = "INVEST_MAP_PAGE_SIZE";
const ENV_DEFAULT_METRIC: &str = "INVEST_MAP_DEFAULT_METRIC";

/// Runtime settings for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Limit for each record store call, in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Rows per page in the raw record table.
    pub page_size: u32,
    /// Metric regions are ranked and colored by until changed.
    pub default_metric: MetricSelector,
    /// Ranking direction.
    pub sort_direction: SortDirection,
    /// Map styling.
    pub encoding: EncodingConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 10_000,
            page_size: 25,
            default_metric: MetricSelector::default(),
            sort_direction: SortDirection::default(),
            encoding: EncodingConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Parses configuration from TOML, applying no overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or a value is out
    /// of range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is malformed,
    /// or an override is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        log::info!("Loaded dashboard config from {}", path.display());
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if an override cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies overrides looked up by variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if a present value cannot be
    /// parsed, or [`ConfigError::InvalidField`] if the result is out of
    /// range.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(ms) = parse_env::<u64>(&lookup, ENV_FETCH_TIMEOUT_MS)? {
            self.fetch_timeout_ms = ms;
        }
        if let Some(size) = parse_env::<u32>(&lookup, ENV_PAGE_SIZE)? {
            self.page_size = size;
        }
        if let Some(metric) = parse_env::<MetricSelector>(&lookup, ENV_DEFAULT_METRIC)? {
            self.default_metric = metric;
        }
        self.validate()
    }

    /// Checks field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero timeout or page size, or an
    /// invalid encoding section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidField {
                field: "fetchTimeoutMs",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidField {
                field: "pageSize",
                message: "must be greater than zero".to_string(),
            });
        }
        self.encoding.validate()?;
        Ok(())
    }

    /// Per-call store limit as a [`Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

fn parse_env<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let value = raw.trim();
    value
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv {
            name,
            value: raw.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_toml_is_default() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn toml_fields_and_nested_encoding() {
        let config = DashboardConfig::from_toml_str(
            r#"
            pageSize = 50
            defaultMetric = "workers"
            sortDirection = "ascending"

            [encoding.fillOpacity]
            floor = 0.1
            ceiling = 0.9
            "#,
        )
        .unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.default_metric, MetricSelector::Workers);
        assert_eq!(config.sort_direction, SortDirection::Ascending);
        assert!((config.encoding.fill_opacity.ceiling - 0.9).abs() < f64::EPSILON);
        assert!((config.encoding.stroke_weight - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_invalid_encoding() {
        let err = DashboardConfig::from_toml_str(
            r"
            [encoding.strokeOpacity]
            floor = 0.9
            ceiling = 0.1
            ",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Encoding(_)));
    }

    #[test]
    fn env_overrides_win() {
        let mut config = DashboardConfig::default();
        config
            .apply_overrides(env(&[
                (ENV_FETCH_TIMEOUT_MS, "2500"),
                (ENV_PAGE_SIZE, " 10 "),
                (ENV_DEFAULT_METRIC, "COMPANY_COUNT"),
            ]))
            .unwrap();
        assert_eq!(config.fetch_timeout(), Duration::from_millis(2500));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_metric, MetricSelector::CompanyCount);
    }

    #[test]
    fn bad_env_value_is_reported() {
        let mut config = DashboardConfig::default();
        let err = config
            .apply_overrides(env(&[(ENV_PAGE_SIZE, "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: ENV_PAGE_SIZE,
                ..
            }
        ));

        let err = config
            .apply_overrides(env(&[(ENV_PAGE_SIZE, "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "pageSize",
                ..
            }
        ));
    }
}
