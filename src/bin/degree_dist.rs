//! In/out degree distributions of the level-k summary graph.

use std::fs::create_dir_all;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use bisimviz::plot::degree::{degree_counts, render_degree_histogram};
use bisimviz::stats;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Experiment result directory
    #[arg(value_name = "EXPERIMENT_DIR")]
    experiment_dir: PathBuf,

    /// Bisimulation level k of the summary graph
    #[arg(value_name = "LEVEL")]
    level: u32,

    /// Output directory for the SVG files (default: <EXPERIMENT_DIR>/plots)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let dir = &args.experiment_dir;
    let out_dir = args.out_dir.unwrap_or_else(|| dir.join("plots"));
    create_dir_all(&out_dir)?;

    let edges = stats::load_summary_graph(dir, args.level)?;
    let out_degrees = degree_counts(edges.sources());
    let in_degrees = degree_counts(edges.targets());
    info!(
        level = args.level,
        edges = edges.len()?,
        out_nodes = out_degrees.len(),
        in_nodes = in_degrees.len(),
        "loaded summary graph"
    );

    render_degree_histogram(
        &out_dir.join(format!("out_degrees-{:04}.svg", args.level)),
        &format!("Out degrees, level {}", args.level),
        &out_degrees,
    )?;
    render_degree_histogram(
        &out_dir.join(format!("in_degrees-{:04}.svg", args.level)),
        &format!("In degrees, level {}", args.level),
        &in_degrees,
    )?;

    Ok(())
}
