//! TOML-based pipeline configuration.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::series::CapacityVariant;

/// Top-level pipeline configuration parsed from TOML.
///
/// All fields have defaults matching an Enedis half-hourly load curve export
/// and a PVGIS `seriescalc` JSON response. Load from TOML with
/// [`PipelineConfig::from_toml_file`] or use [`PipelineConfig::default`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Consumption input layout and sampling.
    #[serde(default)]
    pub consumption: ConsumptionConfig,
    /// Production input layout.
    #[serde(default)]
    pub production: ProductionConfig,
    /// Installed capacities to derive from the 1 kWc baseline.
    #[serde(default)]
    pub capacity: CapacityConfig,
    /// Export formatting.
    #[serde(default)]
    pub output: OutputConfig,
}

/// How the UTC offset carried by consumption timestamps is applied before
/// hourly bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimezonePolicy {
    /// Convert to UTC, the time base of PVGIS hourly series.
    #[default]
    Utc,
    /// Keep the local wall-clock reading and discard the offset.
    Local,
}

/// Consumption CSV layout and sampling interval.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    /// Zero-based line index of the header row; earlier lines are metadata.
    pub header_row: usize,
    /// Field delimiter (single ASCII character).
    pub delimiter: char,
    /// Name of the timestamp column.
    pub timestamp_column: String,
    /// Name of the reading column.
    pub value_column: String,
    /// Sampling interval in minutes (must divide 60).
    pub interval_minutes: u32,
    /// UTC offset handling.
    pub timezone: TimezonePolicy,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            header_row: 2,
            delimiter: ';',
            timestamp_column: "Horodate".to_string(),
            value_column: "Valeur".to_string(),
            interval_minutes: 30,
            timezone: TimezonePolicy::Utc,
        }
    }
}

impl ConsumptionConfig {
    /// Nominal number of readings per hour, `60 / interval_minutes`.
    ///
    /// Only meaningful on a validated configuration.
    pub fn samples_per_hour(&self) -> u32 {
        60 / self.interval_minutes.max(1)
    }
}

/// Production (PVGIS hourly) column names.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductionConfig {
    /// Hourly timestamp field (`YYYYMMDD:HHMM`).
    pub timestamp_column: String,
    /// Power field, watts for a 1 kWc installation.
    pub power_column: String,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            timestamp_column: "time".to_string(),
            power_column: "P".to_string(),
        }
    }
}

/// Requested capacity multipliers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapacityConfig {
    /// Installed capacities in kWc (multipliers of the 1 kWc baseline).
    pub multipliers: Vec<f64>,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            multipliers: vec![1.0, 3.0, 6.0, 9.0],
        }
    }
}

impl CapacityConfig {
    /// Named variants in configuration order.
    pub fn variants(&self) -> Vec<CapacityVariant> {
        self.multipliers
            .iter()
            .copied()
            .map(CapacityVariant::new)
            .collect()
    }
}

/// Export formatting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Fractional digits written for every numeric CSV cell.
    pub decimals: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { decimals: 4 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"consumption.interval_minutes"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl PipelineConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let c = &self.consumption;

        if c.interval_minutes == 0 || c.interval_minutes > 60 || 60 % c.interval_minutes != 0 {
            errors.push(ConfigError::new(
                "consumption.interval_minutes",
                format!("must divide 60, got {}", c.interval_minutes),
            ));
        }
        if !c.delimiter.is_ascii() {
            errors.push(ConfigError::new(
                "consumption.delimiter",
                "must be a single ASCII character",
            ));
        }
        if c.timestamp_column.trim().is_empty() {
            errors.push(ConfigError::new(
                "consumption.timestamp_column",
                "must not be empty",
            ));
        }
        if c.value_column.trim().is_empty() {
            errors.push(ConfigError::new("consumption.value_column", "must not be empty"));
        }

        let p = &self.production;
        if p.timestamp_column.trim().is_empty() {
            errors.push(ConfigError::new(
                "production.timestamp_column",
                "must not be empty",
            ));
        }
        if p.power_column.trim().is_empty() {
            errors.push(ConfigError::new("production.power_column", "must not be empty"));
        }

        let mut seen = HashSet::new();
        for (i, k) in self.capacity.multipliers.iter().enumerate() {
            if !k.is_finite() || *k < 0.0 {
                errors.push(ConfigError::new(
                    format!("capacity.multipliers[{i}]"),
                    format!("must be finite and >= 0, got {k}"),
                ));
                continue;
            }
            let name = CapacityVariant::new(*k).name;
            if !seen.insert(name.clone()) {
                errors.push(ConfigError::new(
                    format!("capacity.multipliers[{i}]"),
                    format!("duplicate capacity column \"{name}\""),
                ));
            }
        }

        if self.output.decimals > 12 {
            errors.push(ConfigError::new("output.decimals", "must be <= 12"));
        }

        errors
    }

    /// Returns the first validation error, if any.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` reported by [`PipelineConfig::validate`].
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        match self.validate().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
