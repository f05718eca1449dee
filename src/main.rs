use anyhow::{Context, Result};
use clap::Parser;
use rfm_oec::cli::{Cli, OutputFormat};
use rfm_oec::config::AnalysisConfig;
use rfm_oec::rates_ratio::RatesRatioInput;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Resolve configuration: file if given, else preset, else defaults
///
/// Presets and `--config` are mutually exclusive at the argument level.
fn load_config(args: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None if args.strict => AnalysisConfig::strict(),
        None if args.permissive => AnalysisConfig::permissive(),
        None => AnalysisConfig::default(),
    };

    if let Some(alpha) = args.alpha {
        config.rates_ratio.alpha = alpha;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;

    let input = RatesRatioInput {
        num_a: args.num_a,
        num_b: args.num_b,
        pos_a: args.pos_a,
        pos_b: args.pos_b,
        ratio_hypo: args.hypo.clone(),
        alpha: config.rates_ratio.alpha,
    };

    let result = input.run().context("Rates ratio test failed")?;

    match args.format {
        OutputFormat::Text => print!("{}", result.to_report_string()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
