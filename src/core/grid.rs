//! core/grid.rs — the fixed-resolution coordinate grid a heatmap is sampled
//! on.
//!
//! The level axis is linear but rescaled so the first and last level buckets
//! are rendered full-width instead of half-width. The size axis is either
//! linear or logarithmic with symmetric padding at both ends (in exponent
//! space).

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeAxis {
    Linear,
    /// Log-scaled, with symmetric exponent padding at both ends.
    Log,
}

/// Cartesian product of a level axis and a size axis, regenerated per plot
/// call. `size_edges` holds the `resolution + 1` cell boundaries used by the
/// integration aggregator.
#[derive(Debug, Clone)]
pub struct Grid {
    pub levels: Vec<f64>,
    pub sizes: Vec<f64>,
    pub size_edges: Vec<f64>,
    pub resolution: usize,
}

impl Grid {
    pub fn new(
        resolution: usize,
        fixed_point: u32,
        size_axis: SizeAxis,
        max_size: u64,
        log_base: u32,
        size_padding: f64,
    ) -> Result<Self> {
        if resolution < 2 {
            return Err(Error::InvalidConfig(format!(
                "grid resolution must be at least 2, got {resolution}"
            )));
        }
        if log_base < 2 {
            return Err(Error::InvalidConfig(format!(
                "log base must be at least 2, got {log_base}"
            )));
        }
        if size_padding < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "size padding must be non-negative, got {size_padding}"
            )));
        }

        let fp = fixed_point.max(1) as f64;
        let res = resolution as f64;

        // Rescale so levels 0 and fixed_point get full-width buckets.
        let levels: Vec<f64> = (0..resolution)
            .map(|i| {
                let t = i as f64 / (res - 1.0);
                t * ((fp + 1.0) / fp) - 1.0 / (2.0 * fp)
            })
            .collect();

        let sizes: Vec<f64> = match size_axis {
            SizeAxis::Linear => (0..resolution).map(|i| i as f64 / (res - 1.0)).collect(),
            SizeAxis::Log => {
                let base = log_base as f64;
                let log_max = (max_size.max(1) as f64).log(base);
                let lo = -size_padding;
                let hi = log_max + size_padding;
                let denom = base.powf(hi) - base.powf(lo);
                (0..resolution)
                    .map(|i| {
                        let e = lo + (hi - lo) * i as f64 / (res - 1.0);
                        base.powf(e) / denom
                    })
                    .collect()
            }
        };

        let size_edges = edges_from_centers(&sizes);

        Ok(Self {
            levels,
            sizes,
            size_edges,
            resolution,
        })
    }
}

/// Cell boundaries: midpoints between adjacent centers, outer edges
/// extrapolated by half the adjacent step.
fn edges_from_centers(centers: &[f64]) -> Vec<f64> {
    let n = centers.len();
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(centers[0] - 0.5 * (centers[1] - centers[0]));
    for i in 1..n {
        edges.push(0.5 * (centers[i - 1] + centers[i]));
    }
    edges.push(centers[n - 1] + 0.5 * (centers[n - 1] - centers[n - 2]));
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_axis_pads_half_bucket_on_both_sides() {
        let grid = Grid::new(256, 4, SizeAxis::Linear, 100, 10, 0.2).unwrap();
        // First coordinate sits half a bucket before level 0, last half a
        // bucket after the fixed point (in normalized units).
        assert!((grid.levels[0] + 1.0 / 8.0).abs() < 1e-12);
        assert!((grid.levels[255] - (1.0 + 1.0 / 8.0)).abs() < 1e-12);
    }

    #[test]
    fn linear_sizes_span_unit_interval() {
        let grid = Grid::new(128, 3, SizeAxis::Linear, 100, 10, 0.2).unwrap();
        assert_eq!(grid.sizes[0], 0.0);
        assert!((grid.sizes[127] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn log_sizes_are_increasing_and_geometric() {
        let grid = Grid::new(256, 3, SizeAxis::Log, 1000, 10, 0.2).unwrap();
        assert!(grid.sizes.windows(2).all(|w| w[1] > w[0]));
        let ratios: Vec<f64> = grid.sizes.windows(2).map(|w| w[1] / w[0]).collect();
        let target = ratios[0];
        assert!(ratios.iter().all(|&r| (r / target - 1.0).abs() < 1e-9));
        // Exponent padding pushes the top coordinate slightly past the
        // normalized maximum size.
        assert!(grid.sizes[255] > 1.0 && grid.sizes[255] < 1.01);
        assert!(grid.sizes[0] > 0.0);
    }

    #[test]
    fn edges_bracket_centers() {
        let grid = Grid::new(64, 2, SizeAxis::Log, 500, 10, 0.2).unwrap();
        assert_eq!(grid.size_edges.len(), 65);
        for (i, &c) in grid.sizes.iter().enumerate() {
            assert!(grid.size_edges[i] < c && c < grid.size_edges[i + 1]);
        }
    }

    #[test]
    fn degenerate_parameters_rejected() {
        assert!(Grid::new(1, 2, SizeAxis::Linear, 10, 10, 0.2).is_err());
        assert!(Grid::new(64, 2, SizeAxis::Log, 10, 1, 0.2).is_err());
        assert!(Grid::new(64, 2, SizeAxis::Log, 10, 10, -0.1).is_err());
    }
}
