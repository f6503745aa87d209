//! plot/histogram.rs — block-size and degree histograms (linear and log10
//! variants) rendered as SVG bar charts.

use std::path::Path;

use plotters::prelude::*;

use crate::error::{Error, Result};

/// Fixed-width binning: `(bin_start, count)` per bin. Values outside
/// [min, max] are ignored.
pub fn histogram_counts(values: &[f64], min: f64, max: f64, bins: usize) -> Vec<(f64, usize)> {
    if bins == 0 || max <= min {
        return Vec::new();
    }
    let bin_width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &value in values {
        if value < min || value > max {
            continue;
        }
        let idx = (((value - min) / bin_width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    (0..bins)
        .map(|i| (min + i as f64 * bin_width, counts[i]))
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct HistogramOptions {
    pub bins: usize,
    /// Histogram log10(value) instead of the raw value; x tick labels show
    /// the de-logged magnitude.
    pub log_values: bool,
    /// Log-scale the count axis.
    pub log_counts: bool,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            bins: 100,
            log_values: false,
            log_counts: false,
        }
    }
}

pub fn render_histogram(
    path: &Path,
    caption: &str,
    values: &[f64],
    x_desc: &str,
    y_desc: &str,
    options: HistogramOptions,
) -> Result<()> {
    if options.bins == 0 {
        return Err(Error::InvalidConfig("histogram needs at least one bin".into()));
    }
    if values.is_empty() {
        return Err(Error::MalformedInput(format!(
            "no values to histogram for {}",
            path.display()
        )));
    }

    let data: Vec<f64> = if options.log_values {
        values
            .iter()
            .filter(|v| **v > 0.0)
            .map(|v| v.log10())
            .collect()
    } else {
        values.to_vec()
    };
    if data.is_empty() {
        return Err(Error::MalformedInput(
            "all values were non-positive under a log axis".into(),
        ));
    }

    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // A degenerate single-point distribution still gets one visible bar.
    let (min, max) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let counts = histogram_counts(&data, min, max, options.bins);
    let bin_width = (max - min) / options.bins as f64;
    let y_max = counts.iter().map(|(_, c)| *c as f64).fold(1.0, f64::max);

    let root = SVGBackend::new(path, (1000, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let delogged = |x: &f64| format!("{:.1E}", 10f64.powf(*x));
    let plain = |x: &f64| format!("{x:.0}");

    if options.log_counts {
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(min..max + bin_width, (0.5f64..y_max * 1.2).log_scale())?;
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(x_desc).y_desc(y_desc);
        if options.log_values {
            mesh.x_label_formatter(&delogged);
        } else {
            mesh.x_label_formatter(&plain);
        }
        mesh.draw()?;
        chart.draw_series(counts.iter().filter(|(_, c)| *c > 0).map(|&(x0, count)| {
            Rectangle::new(
                [(x0, 0.5), (x0 + bin_width, count as f64)],
                BLUE.mix(0.6).filled(),
            )
        }))?;
    } else {
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(min..max + bin_width, 0.0f64..y_max * 1.1)?;
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(x_desc).y_desc(y_desc);
        if options.log_values {
            mesh.x_label_formatter(&delogged);
        }
        mesh.draw()?;
        chart.draw_series(counts.iter().map(|&(x0, count)| {
            Rectangle::new(
                [(x0, 0.0), (x0 + bin_width, count as f64)],
                BLUE.mix(0.6).filled(),
            )
        }))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_cover_all_in_range_values() {
        let values = [0.0, 0.1, 0.5, 0.9, 1.0, 2.0];
        let counts = histogram_counts(&values, 0.0, 1.0, 4);
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 5); // 2.0 falls outside
        assert_eq!(counts.len(), 4);
        // The max value lands in the last bin, not one past it.
        assert_eq!(counts[3].1, 2);
    }

    #[test]
    fn zero_bins_or_empty_range_yield_nothing() {
        assert!(histogram_counts(&[1.0], 0.0, 1.0, 0).is_empty());
        assert!(histogram_counts(&[1.0], 1.0, 1.0, 10).is_empty());
    }
}
