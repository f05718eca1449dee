// Configuration for RFM aggregation and rates-ratio testing
//
// Loaded from TOML; every key is optional and falls back to the defaults
// (`member_id`/`date`/`checkout_id`/`price`, alpha = 0.05).

use crate::error::{Result, StatError};
use crate::rates_ratio::DEFAULT_ALPHA;
use crate::rfm::RfmColumns;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Settings for the rates-ratio tester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatesRatioConfig {
    /// Significance level (alpha) for hypothesis testing
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: 99% confidence level, wider intervals, fewer rejections
    /// - 0.10: 90% confidence level, narrower intervals, more rejections
    pub alpha: f64,
}

impl Default for RatesRatioConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Top-level analysis configuration
///
/// # Example TOML
/// ```toml
/// [rfm]
/// user = "customer_id"
/// date = "order_date"
/// transaction = "order_id"
/// price = "amount"
///
/// [rates_ratio]
/// alpha = 0.01
/// ```
///
/// # Example
/// ```
/// use rfm_oec::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.rates_ratio.alpha, 0.05);
/// assert_eq!(config.rfm.user, "member_id");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rfm: RfmColumns,
    pub rates_ratio: RatesRatioConfig,
}

impl AnalysisConfig {
    /// Strict preset: 99% confidence
    pub fn strict() -> Self {
        Self {
            rates_ratio: RatesRatioConfig { alpha: 0.01 },
            ..Self::default()
        }
    }

    /// Permissive preset: 90% confidence
    pub fn permissive() -> Self {
        Self {
            rates_ratio: RatesRatioConfig { alpha: 0.10 },
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns `StatError::Config` if the file can't be read, isn't valid TOML,
    /// or fails [`AnalysisConfig::validate`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            StatError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| StatError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let alpha = self.rates_ratio.alpha;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(StatError::Config(format!(
                "alpha must be in (0, 1), got {}",
                alpha
            )));
        }

        let mut seen = HashSet::new();
        for name in self.rfm.names() {
            if name.trim().is_empty() {
                return Err(StatError::Config("RFM column names must not be empty".to_string()));
            }
            if !seen.insert(name) {
                return Err(StatError::Config(format!(
                    "RFM column '{}' is used for more than one role",
                    name
                )));
            }
        }

        Ok(())
    }
}
