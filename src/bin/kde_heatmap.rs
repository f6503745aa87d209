//! KDE heatmap over the (bisimulation level × block size) domain.
//!
//! Builds one kernel per (level, size, count) data point, aggregates them
//! into a heatmap by sampling or by definite-integral binning, and renders
//! the result with log-scaled size ticks.

use std::fs::create_dir_all;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use bisimviz::core::grid::{Grid, SizeAxis};
use bisimviz::core::kde::{kde_integration, kde_sampling, ClipMode, Heatmap};
use bisimviz::core::kernel::{
    BandwidthRule, DiagonalGaussian, UniformEpanechnikov, UniformGaussian, UniformUniform,
};
use bisimviz::core::points::{data_points, max_size, normalized_means, WeightMode};
use bisimviz::core::ticks::{level_ticks, linear_size_ticks, log_size_ticks};
use bisimviz::plot::heatmap::render_heatmap;
use bisimviz::stats;
use bisimviz::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KernelFamily {
    /// Uniform level band × Gaussian size profile.
    Gaussian,
    /// Uniform level band × Epanechnikov size profile.
    Epanechnikov,
    /// Uniform level band × uniform size profile.
    Uniform,
    /// Full 2D diagonal Gaussian, bandwidth from Scott/Silverman.
    DiagonalGaussian,
}

impl FromStr for KernelFamily {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Error> {
        match s {
            "gaussian" => Ok(KernelFamily::Gaussian),
            "epanechnikov" => Ok(KernelFamily::Epanechnikov),
            "uniform" => Ok(KernelFamily::Uniform),
            "diagonal_gaussian" => Ok(KernelFamily::DiagonalGaussian),
            other => Err(Error::InvalidConfig(format!(
                "kernel must be one of \"gaussian\", \"epanechnikov\", \"uniform\" or \
                 \"diagonal_gaussian\", got {other:?}"
            ))),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Experiment result directory
    #[arg(value_name = "EXPERIMENT_DIR")]
    experiment_dir: PathBuf,

    /// Grid resolution per axis
    #[arg(long, default_value_t = 512)]
    resolution: usize,

    /// Log base of the size axis
    #[arg(long, default_value_t = 10)]
    log_base: u32,

    /// Kernel family: gaussian | epanechnikov | uniform | diagonal_gaussian
    #[arg(long, default_value = "epanechnikov")]
    kernel: String,

    /// Bandwidth rule for the diagonal Gaussian: scott | silverman
    #[arg(long, default_value = "scott")]
    bandwidth_rule: String,

    /// Manual scaling of the kernel variance
    #[arg(long, default_value_t = 0.01)]
    variance_factor: f64,

    /// Kernel weight policy: block_based | vertex_based
    #[arg(long, default_value = "vertex_based")]
    weight_mode: String,

    /// Half-width of the level band, in level units
    #[arg(long, default_value_t = 0.5)]
    epsilon: f64,

    /// Size-profile support radius, in size units
    #[arg(long, default_value_t = 0.75)]
    scale: f64,

    /// Clip fraction in [0, 1): values above 1-clip are clipped
    #[arg(long, default_value_t = 0.9375)]
    clip: f64,

    /// What happens above the clip threshold: saturate | zero
    #[arg(long, default_value = "saturate")]
    clip_mode: String,

    /// Keeps the bands of adjacent levels from overlapping
    #[arg(long, default_value_t = 0.05)]
    padding: f64,

    /// Exponent padding at both ends of the log size axis
    #[arg(long, default_value_t = 0.2)]
    size_padding: f64,

    /// Use a linear size axis instead of the log one
    #[arg(long, default_value_t = false)]
    linear_sizes: bool,

    /// Aggregate via definite-integral binning instead of point sampling
    #[arg(long, default_value_t = false)]
    integrate: bool,

    /// Log-compress the heatmap before rendering
    #[arg(long, default_value_t = false)]
    log_compress: bool,

    /// Output directory for the SVG file (default: <EXPERIMENT_DIR>/plots)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn build_heatmap(
    args: &Args,
    family: KernelFamily,
    means: &[[f64; 2]],
    weights: &[f64],
    grid: &Grid,
    fixed_point: u32,
    maximum_size: u64,
) -> Result<Heatmap> {
    // Kernel spreads live in the normalized domain: the level band shrinks
    // by the fixed point (minus padding so adjacent bands stay disjoint),
    // the size spread by the maximum size.
    let epsilon = (1.0 - args.padding) * args.epsilon / fixed_point.max(1) as f64;
    let scale = args.scale / maximum_size.max(1) as f64;

    let heatmap = match family {
        KernelFamily::Gaussian => {
            let sigma = args.variance_factor.sqrt();
            let kernels = means
                .iter()
                .map(|m| UniformGaussian::new(m[0], m[1], sigma, epsilon))
                .collect::<bisimviz::Result<Vec<_>>>()?;
            if args.integrate {
                return Err(Error::InvalidConfig(
                    "integration requires a kernel with a closed-form CDF \
                     (epanechnikov or uniform)"
                        .into(),
                )
                .into());
            }
            kde_sampling(&kernels, weights, grid)?
        }
        KernelFamily::Epanechnikov => {
            let kernels = means
                .iter()
                .map(|m| UniformEpanechnikov::new(m[0], m[1], scale, epsilon))
                .collect::<bisimviz::Result<Vec<_>>>()?;
            if args.integrate {
                kde_integration(&kernels, weights, grid)?
            } else {
                kde_sampling(&kernels, weights, grid)?
            }
        }
        KernelFamily::Uniform => {
            let kernels = means
                .iter()
                .map(|m| UniformUniform::new(m[0], m[1], scale, epsilon))
                .collect::<bisimviz::Result<Vec<_>>>()?;
            if args.integrate {
                kde_integration(&kernels, weights, grid)?
            } else {
                kde_sampling(&kernels, weights, grid)?
            }
        }
        KernelFamily::DiagonalGaussian => {
            let rule: BandwidthRule = args.bandwidth_rule.parse()?;
            let sigma = rule.std_deviation(means.len(), 2, args.variance_factor)?;
            let kernels = means
                .iter()
                .map(|m| DiagonalGaussian::new(*m, [sigma, sigma]))
                .collect::<bisimviz::Result<Vec<_>>>()?;
            if args.integrate {
                return Err(Error::InvalidConfig(
                    "integration requires a kernel with a closed-form CDF \
                     (epanechnikov or uniform)"
                        .into(),
                )
                .into());
            }
            kde_sampling(&kernels, weights, grid)?
        }
    };
    Ok(heatmap)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let dir = &args.experiment_dir;
    let out_dir = args.out_dir.clone().unwrap_or_else(|| dir.join("plots"));
    create_dir_all(&out_dir)?;

    let family: KernelFamily = args.kernel.parse()?;
    let weight_mode: WeightMode = args.weight_mode.parse()?;
    let clip_mode: ClipMode = args.clip_mode.parse()?;

    let fixed_point = stats::fixed_point(dir)?;
    let block_sizes = stats::load_sizes(dir, fixed_point)?;
    let points = data_points(&block_sizes);
    if points.is_empty() {
        return Err(Error::MissingData(format!(
            "no block sizes recorded under {}",
            dir.display()
        ))
        .into());
    }

    let maximum_size = max_size(&points);
    let means = normalized_means(&points, fixed_point);
    let weights: Vec<f64> = points.iter().map(|p| weight_mode.weight(p)).collect();
    info!(
        fixed_point,
        data_points = points.len(),
        maximum_size,
        ?family,
        "building kde heatmap"
    );

    let size_axis = if args.linear_sizes {
        SizeAxis::Linear
    } else {
        SizeAxis::Log
    };
    let grid = Grid::new(
        args.resolution,
        fixed_point,
        size_axis,
        maximum_size,
        args.log_base,
        args.size_padding,
    )?;

    let mut heatmap = build_heatmap(
        &args,
        family,
        &means,
        &weights,
        &grid,
        fixed_point,
        maximum_size,
    )?;

    heatmap.normalize();
    if args.log_compress {
        heatmap.log_compress(maximum_size, 1.0)?;
    }
    if !args.linear_sizes {
        heatmap.clip(args.clip, clip_mode)?;
    }

    let x_ticks = level_ticks(fixed_point, args.resolution);
    let (y_ticks, stem) = if args.linear_sizes {
        (
            linear_size_ticks(maximum_size, args.resolution),
            "block_sizes_lin_kde",
        )
    } else {
        (
            log_size_ticks(
                maximum_size,
                args.resolution,
                args.log_base,
                args.size_padding,
            )?,
            "block_sizes_log_kde",
        )
    };

    let path = out_dir.join(format!("{stem}.svg"));
    render_heatmap(
        &path,
        "Block size distribution over bisimulation levels",
        &heatmap,
        &x_ticks,
        &y_ticks,
        "Bisimulation level",
        "Block size",
    )?;
    info!(path = %path.display(), "wrote kde heatmap");

    Ok(())
}
