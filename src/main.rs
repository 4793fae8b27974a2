use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use visage_cv::CascadeDetector;

mod cli;
mod runner;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();
    let config = args.app_config()?;

    let mut detector = CascadeDetector::new(
        args.cascade.clone(),
        args.nested_cascade.clone(),
        config,
    )
    .context("could not set up the detector")?;
    tracing::info!(
        "loaded cascade {} (nested stage {})",
        args.cascade.display(),
        if detector.has_nested() { "on" } else { "off" }
    );

    let opts = runner::RunOptions {
        headless: args.headless,
        output: args.output.clone(),
        json: args.json.clone(),
    };
    runner::run(&args.input(), &mut detector, &opts)
}
