//! core/ticks.rs — tick positions and labels for log-scaled heatmap axes.
//!
//! Major ticks land on powers of the log base; between consecutive majors
//! the formatter inserts `base - 2` unlabeled minor ticks at
//! logarithmically-spaced offsets, matching how a log axis subdivides a
//! decade.

use crate::error::{Error, Result};

/// Tick positions (in grid coordinates) and their labels. Minor ticks carry
/// empty labels.
#[derive(Debug, Clone)]
pub struct AxisTicks {
    pub positions: Vec<f64>,
    pub labels: Vec<String>,
}

/// Insert `base - 2` minor ticks between consecutive, evenly spaced major
/// ticks, at offsets `log_base(i) * Δmajor` for i in 2..base. Minors are
/// also placed before the first and after the last major tick, bounded by
/// `start` and `end`.
pub fn add_minor_log_ticks(
    positions: &[f64],
    labels: &[String],
    base: u32,
    start: f64,
    end: f64,
) -> Result<AxisTicks> {
    if positions.len() < 2 {
        return Err(Error::MalformedInput(format!(
            "need at least two major tick positions, got {}",
            positions.len()
        )));
    }
    if labels.len() != positions.len() {
        return Err(Error::MalformedInput(format!(
            "{} major positions but {} labels",
            positions.len(),
            labels.len()
        )));
    }
    if base < 2 {
        return Err(Error::InvalidConfig(format!(
            "log base must be at least 2, got {base}"
        )));
    }

    let spacing = positions[1] - positions[0];
    if spacing <= 0.0 {
        return Err(Error::MalformedInput(
            "major tick positions must be strictly increasing".into(),
        ));
    }
    let tolerance = 1e-9 * spacing.abs().max(1.0);
    for w in positions.windows(2) {
        if ((w[1] - w[0]) - spacing).abs() > tolerance {
            return Err(Error::MalformedInput(format!(
                "major tick positions are not evenly spaced: step {} vs {}",
                w[1] - w[0],
                spacing
            )));
        }
    }

    let offsets: Vec<f64> = (2..base)
        .map(|i| (i as f64).log(base as f64) * spacing)
        .collect();

    let mut out = AxisTicks {
        positions: Vec::new(),
        labels: Vec::new(),
    };

    // Minors of the phantom major one spacing before the first tick.
    for &offset in &offsets {
        let position = positions[0] - spacing + offset;
        if position >= start && position < positions[0] {
            out.positions.push(position);
            out.labels.push(String::new());
        }
    }

    for i in 0..positions.len() - 1 {
        out.positions.push(positions[i]);
        out.labels.push(labels[i].clone());
        for &offset in &offsets {
            out.positions.push(positions[i] + offset);
            out.labels.push(String::new());
        }
    }
    out.positions.push(positions[positions.len() - 1]);
    out.labels.push(labels[labels.len() - 1].clone());

    // Trailing minors, useful when the axis does not end on a major tick.
    for &offset in &offsets {
        let position = positions[positions.len() - 1] + offset;
        if position > end {
            break;
        }
        out.positions.push(position);
        out.labels.push(String::new());
    }

    Ok(out)
}

/// Major tick positions for the rescaled level axis: level `l` sits at
/// `(l + 1/2) * (resolution - 1) / (fixed_point + 1)`.
pub fn level_ticks(fixed_point: u32, resolution: usize) -> AxisTicks {
    let fp = fixed_point.max(1);
    let res = (resolution - 1) as f64;
    let positions = (0..=fp)
        .map(|l| (l as f64 + 0.5) * res / (fp as f64 + 1.0))
        .collect();
    let labels = (0..=fp).map(|l| l.to_string()).collect();
    AxisTicks { positions, labels }
}

/// Evenly spaced ticks for a linear size axis (six majors from 0 to
/// max_size).
pub fn linear_size_ticks(max_size: u64, resolution: usize) -> AxisTicks {
    let tick_count = 6u32;
    let res = (resolution - 1) as f64;
    let max = max_size.max(1) as f64;
    let labels: Vec<u64> = (0..tick_count)
        .map(|i| (i as f64 * max / (tick_count - 1) as f64).round() as u64)
        .collect();
    AxisTicks {
        positions: labels.iter().map(|&l| l as f64 * res / max).collect(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
    }
}

/// Ticks for the padded logarithmic size axis: majors at powers of the base
/// (labeled `base^i`), with minor log ticks in between.
///
/// Data is normalized by `max_size` but the grid divides its logspace by
/// `denom = base^(log_max + padding) - base^(-padding)`, so size `base^i`
/// renders at grid exponent `i + log_base(denom / max_size)`. Tick positions
/// carry that shift; without it every label sits a factor
/// `denom / max_size` (~`base^padding`) below its data.
pub fn log_size_ticks(
    max_size: u64,
    resolution: usize,
    log_base: u32,
    size_padding: f64,
) -> Result<AxisTicks> {
    if log_base < 2 {
        return Err(Error::InvalidConfig(format!(
            "log base must be at least 2, got {log_base}"
        )));
    }
    let base = log_base as f64;
    let res = (resolution - 1) as f64;
    let max = max_size.max(1) as f64;
    let log_max = max.log(base);
    let span = log_max + 2.0 * size_padding;
    let denom = base.powf(log_max + size_padding) - base.powf(-size_padding);
    let shift = (denom / max).log(base);
    let position_of_exponent = |e: f64| (e + size_padding) / span * res;

    // log(base^k) can land just below k; nudge before flooring so exact
    // powers of the base keep their top major tick.
    let major_count = (log_max + 1e-9).floor() as u32 + 1;
    let positions: Vec<f64> = (0..major_count)
        .map(|i| position_of_exponent(i as f64 + shift))
        .collect();
    let labels: Vec<String> = (0..major_count)
        .map(|i| format!("{log_base}^{i}"))
        .collect();

    if positions.len() < 2 {
        // Everything fits below one decade; no minors to construct.
        return Ok(AxisTicks { positions, labels });
    }
    add_minor_log_ticks(&positions, &labels, log_base, 0.0, res)
}
