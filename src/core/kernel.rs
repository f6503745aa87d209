//! core/kernel.rs — parameterized 2D density kernels over the normalized
//! (level, size) domain.
//!
//! The separable kernels are uniform along the level axis (a band of
//! half-width `epsilon` around the center level) and carry a Gaussian,
//! Epanechnikov or uniform profile along the size axis, normalized so the
//! integral over the band is 1. `DiagonalGaussian` is a full 2D diagonal
//! multivariate Gaussian with bandwidth from Scott's or Silverman's rule.
//!
//! Kernels are stateless after construction; one instance is evaluated at
//! many coordinates.

use std::f64::consts::PI;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Density at a normalized (level, size) coordinate.
pub trait Kernel {
    fn density(&self, level: f64, size: f64) -> f64;
}

/// Closed-form cumulative mass along the size axis, gated by the same level
/// band as the density. Used by the integration-based aggregator.
pub trait CumulativeKernel: Kernel {
    fn cdf(&self, level: f64, size: f64) -> f64;
}

/// Uniform (level band) × Gaussian (size) kernel.
#[derive(Debug, Clone, Copy)]
pub struct UniformGaussian {
    level: f64,
    size: f64,
    epsilon: f64,
    norm: f64,
    partial_exponent: f64,
}

impl UniformGaussian {
    pub fn new(level: f64, size: f64, sigma: f64, epsilon: f64) -> Result<Self> {
        if sigma <= 0.0 || epsilon <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "uniform-gaussian kernel needs sigma > 0 and epsilon > 0, got {sigma} and {epsilon}"
            )));
        }
        let variance = sigma * sigma;
        Ok(Self {
            level,
            size,
            epsilon,
            norm: 1.0 / (2.0 * PI * variance).sqrt(),
            partial_exponent: -1.0 / (2.0 * variance),
        })
    }

    #[inline]
    fn in_band(&self, level: f64) -> bool {
        (level - self.level).abs() < self.epsilon
    }
}

impl Kernel for UniformGaussian {
    fn density(&self, level: f64, size: f64) -> f64 {
        if !self.in_band(level) {
            return 0.0;
        }
        let d = size - self.size;
        self.norm * (d * d * self.partial_exponent).exp() / (2.0 * self.epsilon)
    }
}

/// Uniform (level band) × Epanechnikov (size) kernel: quadratic falloff with
/// compact support of radius `scale`.
#[derive(Debug, Clone, Copy)]
pub struct UniformEpanechnikov {
    level: f64,
    size: f64,
    scale: f64,
    epsilon: f64,
    norm: f64,
}

impl UniformEpanechnikov {
    pub fn new(level: f64, size: f64, scale: f64, epsilon: f64) -> Result<Self> {
        if scale <= 0.0 || epsilon <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "epanechnikov kernel needs scale > 0 and epsilon > 0, got {scale} and {epsilon}"
            )));
        }
        Ok(Self {
            level,
            size,
            scale,
            epsilon,
            norm: 0.75 / scale,
        })
    }

    #[inline]
    fn in_band(&self, level: f64) -> bool {
        (level - self.level).abs() < self.epsilon
    }
}

impl Kernel for UniformEpanechnikov {
    fn density(&self, level: f64, size: f64) -> f64 {
        if !self.in_band(level) {
            return 0.0;
        }
        let u = (size - self.size) / self.scale;
        self.norm * (1.0 - u * u).max(0.0) / (2.0 * self.epsilon)
    }
}

impl CumulativeKernel for UniformEpanechnikov {
    fn cdf(&self, level: f64, size: f64) -> f64 {
        if !self.in_band(level) {
            return 0.0;
        }
        let u = (size - self.size) / self.scale;
        // Piecewise cubic, clamped outside the support.
        let f = if u <= -1.0 {
            0.0
        } else if u >= 1.0 {
            1.0
        } else {
            0.5 + 0.75 * u - 0.25 * u * u * u
        };
        f / (2.0 * self.epsilon)
    }
}

/// Uniform (level band) × uniform (size) kernel.
#[derive(Debug, Clone, Copy)]
pub struct UniformUniform {
    level: f64,
    size: f64,
    scale: f64,
    epsilon: f64,
}

impl UniformUniform {
    pub fn new(level: f64, size: f64, scale: f64, epsilon: f64) -> Result<Self> {
        if scale <= 0.0 || epsilon <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "uniform kernel needs scale > 0 and epsilon > 0, got {scale} and {epsilon}"
            )));
        }
        Ok(Self {
            level,
            size,
            scale,
            epsilon,
        })
    }

    #[inline]
    fn in_band(&self, level: f64) -> bool {
        (level - self.level).abs() < self.epsilon
    }
}

impl Kernel for UniformUniform {
    fn density(&self, level: f64, size: f64) -> f64 {
        if !self.in_band(level) {
            return 0.0;
        }
        let u = (size - self.size) / self.scale;
        if u.abs() <= 1.0 {
            1.0 / (2.0 * self.scale * 2.0 * self.epsilon)
        } else {
            0.0
        }
    }
}

impl CumulativeKernel for UniformUniform {
    fn cdf(&self, level: f64, size: f64) -> f64 {
        if !self.in_band(level) {
            return 0.0;
        }
        let u = (size - self.size) / self.scale;
        let f = ((u + 1.0) / 2.0).clamp(0.0, 1.0);
        f / (2.0 * self.epsilon)
    }
}

/// Full 2D diagonal multivariate Gaussian over both axes jointly.
#[derive(Debug, Clone, Copy)]
pub struct DiagonalGaussian {
    means: [f64; 2],
    norm: f64,
    partial_exponents: [f64; 2],
}

impl DiagonalGaussian {
    pub fn new(means: [f64; 2], sigmas: [f64; 2]) -> Result<Self> {
        if sigmas.iter().any(|&s| s <= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "diagonal gaussian needs positive standard deviations, got {sigmas:?}"
            )));
        }
        let variances = [sigmas[0] * sigmas[0], sigmas[1] * sigmas[1]];
        let determinant = variances[0] * variances[1];
        Ok(Self {
            means,
            norm: (2.0 * PI).powi(-1) * determinant.sqrt().recip(),
            partial_exponents: [-0.5 / variances[0], -0.5 / variances[1]],
        })
    }
}

impl Kernel for DiagonalGaussian {
    fn density(&self, level: f64, size: f64) -> f64 {
        let d0 = level - self.means[0];
        let d1 = size - self.means[1];
        let exponent =
            d0 * d0 * self.partial_exponents[0] + d1 * d1 * self.partial_exponents[1];
        self.norm * exponent.exp()
    }
}

/// Bandwidth (spread) selection rule for the diagonal Gaussian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandwidthRule {
    Scott,
    Silverman,
}

impl BandwidthRule {
    /// Standard deviation for `n` samples in `dimension` dimensions, scaled
    /// by a manual variance factor.
    pub fn std_deviation(&self, n: usize, dimension: usize, variance_factor: f64) -> Result<f64> {
        if n == 0 {
            return Err(Error::InvalidConfig(
                "bandwidth rule needs at least one sample".into(),
            ));
        }
        if variance_factor <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "variance factor must be positive, got {variance_factor}"
            )));
        }
        let d = dimension as f64;
        let n = n as f64;
        let variance = match self {
            BandwidthRule::Scott => n.powf(-1.0 / (d + 4.0)),
            BandwidthRule::Silverman => (n * (d + 2.0) / 4.0).powf(-1.0 / (d + 4.0)),
        };
        Ok((variance * variance_factor).sqrt())
    }
}

impl FromStr for BandwidthRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scott" => Ok(BandwidthRule::Scott),
            "silverman" => Ok(BandwidthRule::Silverman),
            other => Err(Error::InvalidConfig(format!(
                "bandwidth rule must be \"scott\" or \"silverman\", got {other:?}"
            ))),
        }
    }
}
