//! rfm-oec - RFM customer analytics and rates-ratio hypothesis testing
//!
//! Two independent, pure computations:
//! - [`rfm::compute_rfm`]: per-customer Recency, Frequency & Monetary metrics
//!   from a caller-supplied polars `DataFrame` of transactions
//! - [`rates_ratio::test_rates_ratio`]: Wald-type test on the ratio of two
//!   Bernoulli success rates (OEC_B / OEC_A)

pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod rates_ratio;
pub mod rfm;
pub mod timestamp;

pub use error::{Result, StatError};
