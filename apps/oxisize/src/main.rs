use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use oxisize_bundle_size::Config;
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "oxisize")]
#[command(about = "Estimate the bundle size of a JavaScript/TypeScript module", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.config);

    let start = Instant::now();
    let cfg = cli.config;
    let num_threads = rayon::current_num_threads();
    info!(
        "Measuring {} (minify: {}, gzip: {}, using {} threads)",
        cfg.entry.display(),
        cfg.minify,
        cfg.gzip,
        num_threads
    );

    let entry = cfg.entry.clone();
    let report = oxisize_bundle_size::run_bundle_size_check(cfg)
        .with_context(|| format!("Failed to measure {}", entry.display()))?;
    debug!("Measured {} categories", report.sizes.len());

    oxisize_bundle_size::print_sizes(&mut stdout, &report)?;

    let elapsed_ms = start.elapsed().as_millis();
    info!(
        "Finished in {}ms on {} files (using {} threads).",
        elapsed_ms, report.files_traced, num_threads
    );
    stdout.flush()?;

    Ok(())
}
