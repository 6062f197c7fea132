//! Analysis configuration that downstream crates can serialize/deserialize.
//!
//! Holds the column names and knobs the notebook routines default to, so a
//! pipeline can be re-pointed at differently named source tables without
//! touching code.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Numeric column ranked by `sort_correlations`.
    pub correlation_column: String,

    /// Column that receives the absolute correlation.
    pub abs_column: String,

    /// How many rows `sort_correlations` keeps.
    pub top_n: usize,

    /// Period label column for correlation tables and decade bucketing.
    pub year_column: String,

    /// Free-text "state or county" column scanned by the location parser.
    pub location_column: String,

    pub state_column: String,
    pub county_column: String,

    /// Substring that marks a location as a county row.
    pub county_marker: String,

    /// Join key shared by the rate and counts tables.
    pub key_column: String,

    pub decade_column: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            correlation_column: "Correlation".to_string(),
            abs_column: "Abs_Correlation".to_string(),
            top_n: 5,
            year_column: "Year".to_string(),
            location_column: "county_or_state_name".to_string(),
            state_column: "State".to_string(),
            county_column: "County".to_string(),
            county_marker: "County".to_string(),
            key_column: "county_state".to_string(),
            decade_column: "Decade".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TABKIT_CORRELATION_COLUMN`: column ranked by correlation sorting
    /// - `TABKIT_ABS_COLUMN`: output column for absolute correlations
    /// - `TABKIT_TOP_N`: number of rows kept by correlation sorting
    /// - `TABKIT_YEAR_COLUMN`: period label column
    /// - `TABKIT_LOCATION_COLUMN`: free-text location column
    /// - `TABKIT_KEY_COLUMN`: county/state join key column
    /// - `TABKIT_DECADE_COLUMN`: output column for decade labels
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TABKIT_CORRELATION_COLUMN") {
            cfg.correlation_column = s;
        }

        if let Ok(s) = std::env::var("TABKIT_ABS_COLUMN") {
            cfg.abs_column = s;
        }

        if let Ok(s) = std::env::var("TABKIT_TOP_N") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.top_n = v;
            }
        }

        if let Ok(s) = std::env::var("TABKIT_YEAR_COLUMN") {
            cfg.year_column = s;
        }

        if let Ok(s) = std::env::var("TABKIT_LOCATION_COLUMN") {
            cfg.location_column = s;
        }

        if let Ok(s) = std::env::var("TABKIT_KEY_COLUMN") {
            cfg.key_column = s;
        }

        if let Ok(s) = std::env::var("TABKIT_DECADE_COLUMN") {
            cfg.decade_column = s;
        }

        cfg
    }

    /// Parse a config from JSON; absent fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let names = [
            ("correlation_column", &self.correlation_column),
            ("abs_column", &self.abs_column),
            ("year_column", &self.year_column),
            ("location_column", &self.location_column),
            ("state_column", &self.state_column),
            ("county_column", &self.county_column),
            ("key_column", &self.key_column),
            ("decade_column", &self.decade_column),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", field)));
            }
        }
        if self.county_marker.is_empty() {
            return Err(Error::Config("county_marker must not be empty".into()));
        }
        if self.state_column == self.county_column {
            return Err(Error::Config(format!(
                "state_column and county_column are both '{}'",
                self.state_column
            )));
        }
        Ok(())
    }
}
