//! plot/degree.rs — degree distributions of a summary graph.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::plot::histogram::{render_histogram, HistogramOptions};

/// Multiplicity of each distinct endpoint: how often every block occurs in
/// the given endpoint column of the edge list.
pub fn degree_counts(endpoints: &[u64]) -> Vec<f64> {
    let mut counter: BTreeMap<u64, u64> = BTreeMap::new();
    for &node in endpoints {
        *counter.entry(node).or_insert(0) += 1;
    }
    counter.values().map(|&c| c as f64).collect()
}

/// Histogram of per-node degrees with a log-scaled count axis.
pub fn render_degree_histogram(path: &Path, caption: &str, degrees: &[f64]) -> Result<()> {
    render_histogram(
        path,
        caption,
        degrees,
        "Degree",
        "log # summary nodes with given degree",
        HistogramOptions {
            bins: 100,
            log_values: false,
            log_counts: true,
        },
    )
}
