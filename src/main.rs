//! Repolens CLI - repository metrics aggregation.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repolens::cli::Cli;
use repolens::pipeline::Pipeline;
use repolens::report;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> repolens::core::Result<()> {
    let config = cli.resolve_config()?;
    let pipeline = Pipeline::from_config(config)?;

    let out_dir = pipeline.config().output.directory.clone();
    let format = pipeline.config().output.format;
    let with_charts = pipeline.config().output.charts;

    let output = pipeline.run()?;

    report::write_all(
        &output.results,
        &output.summary,
        Path::new(&out_dir),
        format,
        with_charts,
    )?;

    println!(
        "Analyzed {} repositories; reports written to {out_dir}",
        output.summary.total_repositories
    );
    Ok(())
}
