//! Error taxonomy shared by the RFM aggregator and the rates-ratio tester
//!
//! Every failure is raised synchronously at the point of violation. The
//! rates-ratio "abstain" outcome is NOT an error; it is reported as data on
//! [`crate::rates_ratio::TestResult`].

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors for RFM aggregation and rates-ratio testing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatError {
    /// A required column is absent or has an unusable type
    #[error("Schema error: {0}")]
    Schema(String),

    /// A date or numeric value could not be converted
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required scalar argument was not supplied
    #[error("Inputs are missing: {0}")]
    MissingInput(String),

    /// The null hypothesis is neither a scalar nor a two-element sequence
    #[error("Null hypothesis type is incorrect: expected a scalar or two values, got {len} values")]
    HypothesisType { len: usize },

    /// Both bounds of a two-element null hypothesis are absent
    #[error("Null hypothesis's both values are missing")]
    HypothesisValue,

    /// The lower bound of a two-element null hypothesis exceeds the upper bound
    #[error("Left null hypothesis should be smaller than the right: {lower} > {upper}")]
    HypothesisOrder { lower: f64, upper: f64 },

    /// Trial/success counts do not describe a valid Bernoulli sample
    #[error("Invalid counts for group {group}: {reason}")]
    InvalidCounts { group: char, reason: String },

    /// Significance level outside the open interval (0, 1)
    #[error("alpha must be in (0, 1), got {0}")]
    InvalidAlpha(f64),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The standard normal distribution could not be evaluated
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// The DataFrame engine failed while projecting or aggregating
    #[error("Frame error: {0}")]
    Frame(String),
}

impl From<PolarsError> for StatError {
    fn from(err: PolarsError) -> Self {
        StatError::Frame(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StatError>;
