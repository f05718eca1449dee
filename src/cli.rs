//! CLI argument parsing for rfm-oec

use crate::rates_ratio::HypothesisInput;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for test results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "rfm-oec")]
#[command(version)]
#[command(
    about = "Rates-ratio hypothesis test for A/B experiments (OEC_B / OEC_A)",
    long_about = None
)]
pub struct Cli {
    /// Number of trials in group A (control)
    #[arg(long = "num-a", value_name = "N")]
    pub num_a: Option<u64>,

    /// Number of trials in group B (treatment)
    #[arg(long = "num-b", value_name = "N")]
    pub num_b: Option<u64>,

    /// Number of successes in group A
    #[arg(long = "pos-a", value_name = "K")]
    pub pos_a: Option<u64>,

    /// Number of successes in group B
    #[arg(long = "pos-b", value_name = "K")]
    pub pos_b: Option<u64>,

    /// Null hypothesis on the ratio: r, [r1, r2], [None, r2] or [r1, None]
    #[arg(
        long = "hypo",
        value_name = "HYPO",
        default_value = "[None, 2.7]",
        allow_hyphen_values = true
    )]
    pub hypo: HypothesisInput,

    /// Significance level (overrides config file and presets)
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// TOML configuration file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use the strict preset (alpha = 0.01)
    #[arg(long = "strict", conflicts_with_all = ["permissive", "config"])]
    pub strict: bool,

    /// Use the permissive preset (alpha = 0.10)
    #[arg(long = "permissive", conflicts_with = "config")]
    pub permissive: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
