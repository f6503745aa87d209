//! Load every statistics record of one experiment and report the fixed
//! point; `-v` prints the full records to stdout.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use bisimviz::stats;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Experiment result directory
    #[arg(value_name = "EXPERIMENT_DIR")]
    experiment_dir: PathBuf,

    /// Print all loaded statistics to stdout
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let dir = &args.experiment_dir;

    let fixed_point = stats::fixed_point(dir)?;
    let statistics = stats::load_level_statistics(dir, fixed_point)?;
    let block_sizes = stats::load_sizes(dir, fixed_point)?;
    let data_edge_statistics = stats::load_data_edge_statistics(dir, fixed_point)?;
    let graph_statistics = stats::load_graph_statistics(dir)?;
    let summary_graph_statistics = stats::load_summary_graph_statistics(dir)?;

    info!(
        fixed_point,
        levels = statistics.len(),
        "loaded experiment statistics"
    );

    if args.verbose {
        println!("Fixed point: {fixed_point}\n");

        println!("Statistics:");
        for stats in &statistics {
            println!("{}", serde_json::to_string(stats)?);
        }

        println!("\nData edge statistics:");
        for stats in &data_edge_statistics {
            println!("{}", serde_json::to_string(stats)?);
        }

        println!("\nGraph statistics:");
        println!("{}", serde_json::to_string_pretty(&graph_statistics)?);

        println!("\nSummary graph statistics:");
        println!("{}", serde_json::to_string_pretty(&summary_graph_statistics)?);

        println!("\nBlock sizes:");
        for level in &block_sizes {
            println!("Sizes: ................. {:?}", level.sizes);
            println!("Sizes (accumulated): ... {:?}", level.accumulated);
        }
    }

    Ok(())
}
