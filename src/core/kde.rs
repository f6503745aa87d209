//! core/kde.rs — streaming KDE aggregation and heatmap post-processing.
//!
//! Both aggregators fold weighted kernels into one grid via the running
//! weighted mean
//!
//! ```text
//! mean <- mean * (w / (w + wi)) + image_i * (wi / (w + wi));  w <- w + wi
//! ```
//!
//! which keeps intermediate values bounded regardless of the total weight
//! and never holds more than one kernel image at a time.

use std::str::FromStr;

use tracing::debug;

use crate::core::grid::Grid;
use crate::core::kernel::{CumulativeKernel, Kernel};
use crate::error::{Error, Result};

/// Row-major `resolution × resolution` array of non-negative densities,
/// indexed `[level][size]`.
#[derive(Debug, Clone)]
pub struct Heatmap {
    pub resolution: usize,
    pub values: Vec<f64>,
}

/// What to do with values above the clip threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    /// Saturate to the threshold.
    Saturate,
    /// Drop to zero.
    Zero,
}

impl FromStr for ClipMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "saturate" => Ok(ClipMode::Saturate),
            "zero" => Ok(ClipMode::Zero),
            other => Err(Error::InvalidConfig(format!(
                "clip mode must be \"saturate\" or \"zero\", got {other:?}"
            ))),
        }
    }
}

impl Heatmap {
    fn zeros(resolution: usize) -> Self {
        Self {
            resolution,
            values: vec![0.0; resolution * resolution],
        }
    }

    #[inline]
    pub fn at(&self, level_idx: usize, size_idx: usize) -> f64 {
        self.values[level_idx * self.resolution + size_idx]
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Scale so the maximum is exactly 1. A heatmap with no mass stays
    /// all-zero.
    pub fn normalize(&mut self) {
        let max = self.max();
        if max > 0.0 {
            for v in &mut self.values {
                *v /= max;
            }
        }
    }

    /// Flatten dynamic range: `v <- log10(v * max_size + offset)`, then
    /// re-normalize. The offset keeps log10 away from zero.
    pub fn log_compress(&mut self, max_size: u64, offset: f64) -> Result<()> {
        if offset < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "log-compression offset must be at least 1, got {offset}"
            )));
        }
        let scale = max_size.max(1) as f64;
        for v in &mut self.values {
            *v = (*v * scale + offset).log10();
        }
        self.normalize();
        Ok(())
    }

    /// Clip values above `1 - clip` (saturating or zeroing), then
    /// re-normalize.
    pub fn clip(&mut self, clip: f64, mode: ClipMode) -> Result<()> {
        if !(0.0..1.0).contains(&clip) {
            return Err(Error::InvalidConfig(format!(
                "clip must be in [0, 1), got {clip}"
            )));
        }
        let threshold = 1.0 - clip;
        for v in &mut self.values {
            if *v > threshold {
                *v = match mode {
                    ClipMode::Saturate => threshold,
                    ClipMode::Zero => 0.0,
                };
            }
        }
        self.normalize();
        Ok(())
    }
}

fn check_lengths(kernels: usize, weights: usize) -> Result<()> {
    if kernels != weights {
        return Err(Error::MalformedInput(format!(
            "{kernels} kernels but {weights} weights"
        )));
    }
    Ok(())
}

/// Sampling aggregator: evaluate every weighted kernel at every grid
/// coordinate, one kernel at a time.
pub fn kde_sampling<K: Kernel>(kernels: &[K], weights: &[f64], grid: &Grid) -> Result<Heatmap> {
    check_lengths(kernels.len(), weights.len())?;
    let res = grid.resolution;
    let mut heatmap = Heatmap::zeros(res);
    let mut weight = 0.0f64;

    for (kernel, &wi) in kernels.iter().zip(weights) {
        if wi <= 0.0 {
            continue;
        }
        let new_weight = weight + wi;
        let keep = weight / new_weight;
        let add = wi / new_weight;
        for (li, &level) in grid.levels.iter().enumerate() {
            let row = &mut heatmap.values[li * res..(li + 1) * res];
            for (si, &size) in grid.sizes.iter().enumerate() {
                row[si] = row[si] * keep + kernel.density(level, size) * add;
            }
        }
        weight = new_weight;
    }
    debug!(kernels = kernels.len(), total_weight = weight, "sampled kde");
    Ok(heatmap)
}

/// Integration aggregator: per level column, evaluate each kernel's CDF at
/// the `resolution + 1` size-cell boundaries and difference adjacent values
/// to get the probability mass per cell. Smoother and alias-resistant at the
/// cost of one extra row of evaluations.
pub fn kde_integration<K: CumulativeKernel>(
    kernels: &[K],
    weights: &[f64],
    grid: &Grid,
) -> Result<Heatmap> {
    check_lengths(kernels.len(), weights.len())?;
    let res = grid.resolution;
    let mut heatmap = Heatmap::zeros(res);
    let mut weight = 0.0f64;

    for (kernel, &wi) in kernels.iter().zip(weights) {
        if wi <= 0.0 {
            continue;
        }
        let new_weight = weight + wi;
        let keep = weight / new_weight;
        let add = wi / new_weight;
        for (li, &level) in grid.levels.iter().enumerate() {
            let row = &mut heatmap.values[li * res..(li + 1) * res];
            let mut prev = kernel.cdf(level, grid.size_edges[0]);
            for (si, item) in row.iter_mut().enumerate() {
                let cur = kernel.cdf(level, grid.size_edges[si + 1]);
                let mass = (cur - prev).max(0.0);
                *item = *item * keep + mass * add;
                prev = cur;
            }
        }
        weight = new_weight;
    }
    debug!(kernels = kernels.len(), total_weight = weight, "integrated kde");
    Ok(heatmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::SizeAxis;
    use crate::core::kernel::UniformEpanechnikov;

    fn unit_grid(resolution: usize) -> Grid {
        Grid::new(resolution, 4, SizeAxis::Linear, 100, 10, 0.2).unwrap()
    }

    fn sample_kernels() -> (Vec<UniformEpanechnikov>, Vec<f64>) {
        let kernels = vec![
            UniformEpanechnikov::new(0.0, 0.2, 0.1, 0.12).unwrap(),
            UniformEpanechnikov::new(0.25, 0.5, 0.15, 0.12).unwrap(),
            UniformEpanechnikov::new(0.5, 0.8, 0.05, 0.12).unwrap(),
            UniformEpanechnikov::new(1.0, 0.1, 0.2, 0.12).unwrap(),
        ];
        let weights = vec![3.0, 1.0, 7.0, 2.0];
        (kernels, weights)
    }

    #[test]
    fn heatmap_is_non_negative_and_normalizes_to_one() {
        let (kernels, weights) = sample_kernels();
        let grid = unit_grid(96);
        let mut heatmap = kde_sampling(&kernels, &weights, &grid).unwrap();
        assert!(heatmap.values.iter().all(|&v| v >= 0.0));
        assert!(heatmap.max() > 0.0);
        heatmap.normalize();
        assert!((heatmap.max() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_stays_all_zero() {
        let grid = unit_grid(32);
        let kernels: Vec<UniformEpanechnikov> = Vec::new();
        let mut heatmap = kde_sampling(&kernels, &[], &grid).unwrap();
        heatmap.normalize();
        assert!(heatmap.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn streaming_mean_is_order_independent() {
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let (kernels, weights) = sample_kernels();
        let grid = unit_grid(64);
        let reference = kde_sampling(&kernels, &weights, &grid).unwrap();

        let mut rng = rand::rngs::StdRng::seed_from_u64(0xB15C0);
        let mut order: Vec<usize> = (0..kernels.len()).collect();
        for _ in 0..5 {
            order.shuffle(&mut rng);
            let shuffled_kernels: Vec<_> = order.iter().map(|&i| kernels[i]).collect();
            let shuffled_weights: Vec<_> = order.iter().map(|&i| weights[i]).collect();
            let permuted = kde_sampling(&shuffled_kernels, &shuffled_weights, &grid).unwrap();
            for (a, b) in reference.values.iter().zip(&permuted.values) {
                assert!((a - b).abs() < 1e-9, "order-dependent result: {a} vs {b}");
            }
        }
    }

    #[test]
    fn sampling_and_integration_agree_for_fine_grids() {
        let kernel = UniformEpanechnikov::new(0.5, 0.5, 0.2, 0.3).unwrap();
        let grid = unit_grid(512);
        let mut sampled = kde_sampling(&[kernel], &[1.0], &grid).unwrap();
        let mut integrated = kde_integration(&[kernel], &[1.0], &grid).unwrap();
        sampled.normalize();
        integrated.normalize();
        for (a, b) in sampled.values.iter().zip(&integrated.values) {
            assert!((a - b).abs() < 0.02, "shapes diverge: {a} vs {b}");
        }
    }

    #[test]
    fn integration_mass_sums_to_band_height() {
        // One kernel fully inside the grid: per in-band level column the
        // cell masses along the size axis must sum to 1 / (2 * epsilon).
        let epsilon = 0.3;
        let kernel = UniformEpanechnikov::new(0.5, 0.5, 0.15, epsilon).unwrap();
        let grid = unit_grid(128);
        let heatmap = kde_integration(&[kernel], &[5.0], &grid).unwrap();
        let res = grid.resolution;
        for (li, &level) in grid.levels.iter().enumerate() {
            let sum: f64 = (0..res).map(|si| heatmap.at(li, si)).sum();
            if (level - 0.5).abs() < epsilon - 0.02 {
                assert!(
                    (sum - 1.0 / (2.0 * epsilon)).abs() < 1e-6,
                    "column mass {sum} at level {level}"
                );
            }
        }
    }

    #[test]
    fn mismatched_weights_rejected() {
        let (kernels, _) = sample_kernels();
        let grid = unit_grid(16);
        assert!(kde_sampling(&kernels, &[1.0], &grid).is_err());
    }

    #[test]
    fn log_compress_flattens_and_renormalizes() {
        let (kernels, weights) = sample_kernels();
        let grid = unit_grid(64);
        let mut heatmap = kde_sampling(&kernels, &weights, &grid).unwrap();
        heatmap.normalize();
        let before: Vec<f64> = heatmap.values.clone();
        heatmap.log_compress(1_000, 1.0).unwrap();
        assert!((heatmap.max() - 1.0).abs() < 1e-12);
        // Compression is monotone: ordering of cells is preserved.
        let mut idx: Vec<usize> = (0..before.len()).collect();
        idx.sort_by(|&a, &b| before[a].partial_cmp(&before[b]).unwrap());
        for w in idx.windows(2) {
            assert!(heatmap.values[w[0]] <= heatmap.values[w[1]] + 1e-12);
        }
        assert!(heatmap.log_compress(1_000, 0.5).is_err());
    }

    #[test]
    fn clip_mode_parsing() {
        assert_eq!("saturate".parse::<ClipMode>().unwrap(), ClipMode::Saturate);
        assert_eq!("zero".parse::<ClipMode>().unwrap(), ClipMode::Zero);
        assert!("wrap".parse::<ClipMode>().is_err());
    }

    #[test]
    fn clip_saturate_and_zero() {
        let grid = unit_grid(64);
        let (kernels, weights) = sample_kernels();
        let mut saturated = kde_sampling(&kernels, &weights, &grid).unwrap();
        saturated.normalize();
        let clip = 0.9;
        saturated.clip(clip, ClipMode::Saturate).unwrap();
        // After re-normalization the plateau maps back to 1.
        assert!((saturated.max() - 1.0).abs() < 1e-12);

        let mut zeroed = kde_sampling(&kernels, &weights, &grid).unwrap();
        zeroed.normalize();
        zeroed.clip(clip, ClipMode::Zero).unwrap();
        assert!(zeroed.max() <= 1.0 + 1e-12);

        let mut bad = kde_sampling(&kernels, &weights, &grid).unwrap();
        assert!(bad.clip(1.0, ClipMode::Saturate).is_err());
    }
}
