//! Per-iteration block-size histograms: plain and log10 variants, with and
//! without the singletons created at each level.

use std::fs::create_dir_all;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use bisimviz::plot::histogram::{render_histogram, HistogramOptions};
use bisimviz::stats;
use bisimviz::stats::LevelStatistics;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Experiment result directory
    #[arg(value_name = "EXPERIMENT_DIR")]
    experiment_dir: PathBuf,

    /// Output directory for the SVG files (default: <EXPERIMENT_DIR>/plots)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

/// Sizes of the blocks created at this level, one entry per block.
fn new_block_size_samples(stats: &LevelStatistics) -> Vec<f64> {
    let mut samples = Vec::new();
    for (&size, &count) in &stats.new_block_sizes {
        samples.extend(std::iter::repeat(size as f64).take(count as usize));
    }
    samples
}

/// Singletons created at each level: successive differences of the running
/// singleton counts.
fn new_singleton_counts(statistics: &[LevelStatistics]) -> Vec<u64> {
    let mut out = Vec::with_capacity(statistics.len());
    let mut previous = 0u64;
    for stats in statistics {
        out.push(stats.singleton_count.saturating_sub(previous));
        previous = stats.singleton_count;
    }
    out
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let dir = &args.experiment_dir;
    let out_dir = args.out_dir.unwrap_or_else(|| dir.join("plots"));
    create_dir_all(&out_dir)?;

    let fixed_point = stats::fixed_point(dir)?;
    let statistics = stats::load_level_statistics(dir, fixed_point)?;
    let singletons = new_singleton_counts(&statistics);

    for (i, level_stats) in statistics.iter().enumerate() {
        let samples = new_block_size_samples(level_stats);
        if samples.is_empty() {
            info!(level = i, "no new blocks, skipping histograms");
            continue;
        }
        let mut with_singletons = samples.clone();
        with_singletons.extend(std::iter::repeat(1.0).take(singletons[i] as usize));

        let variants: [(&str, &Vec<f64>, bool); 4] = [
            ("hist", &samples, false),
            ("log_hist", &samples, true),
            ("hist_singletons", &with_singletons, false),
            ("log_hist_singletons", &with_singletons, true),
        ];
        for (stem, values, log) in variants {
            let path = out_dir.join(format!("{}-{:04}.svg", stem, i + 1));
            render_histogram(
                &path,
                &format!("New block sizes, level {i}"),
                values,
                "Block size",
                "Count",
                HistogramOptions {
                    bins: 100,
                    log_values: log,
                    log_counts: log,
                },
            )?;
        }
    }

    info!(levels = statistics.len(), out_dir = %out_dir.display(), "wrote histograms");
    Ok(())
}
