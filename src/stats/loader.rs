//! stats/loader.rs — one-shot loaders for the per-experiment result store.
//!
//! File layout under an experiment directory (levels 0..=fixed_point map to
//! 4-digit, 1-based file indices):
//!
//! ```text
//! statistics-0001.json .. statistics-NNNN.json
//! data_edge_statistics-0001.json .. data_edge_statistics-NNNN.json
//! graph_statistics.json
//! summary_graph_statistics.json
//! summary_graph-NNNN.json
//! ```
//!
//! Every loader is one call against static files; a missing expected file is
//! fatal for the run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};
use crate::stats::records::{
    DataEdgeStatistics, GraphStatistics, LevelStatistics, SummaryGraphEdges,
    SummaryGraphStatistics,
};

/// Block-size table of one level: the full multiset plus the running
/// accumulation of new blocks up to (and including) this level.
#[derive(Debug, Clone)]
pub struct LevelSizes {
    pub sizes: BTreeMap<u64, u64>,
    pub accumulated: BTreeMap<u64, u64>,
}

fn level_file(dir: &Path, stem: &str, level: u32) -> PathBuf {
    // Level 0 lives in the file indexed 0001.
    dir.join(format!("{}-{:04}.json", stem, level + 1))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::MissingData(format!("expected result file {}", path.display()))
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Deepest completed bisimulation level: the highest N for which the
/// per-level statistics file exists. Levels are contiguous, so the scan
/// stops at the first gap.
pub fn fixed_point(dir: &Path) -> Result<u32> {
    let mut level = 0u32;
    while level_file(dir, "statistics", level).exists() {
        level += 1;
    }
    if level == 0 {
        return Err(Error::MissingData(format!(
            "no statistics files under {}",
            dir.display()
        )));
    }
    let fp = level - 1;
    debug!(fixed_point = fp, dir = %dir.display(), "determined fixed point");
    Ok(fp)
}

/// Per-level bisimulation statistics for levels 0..=fixed_point.
pub fn load_level_statistics(dir: &Path, fixed_point: u32) -> Result<Vec<LevelStatistics>> {
    (0..=fixed_point)
        .map(|level| read_json(&level_file(dir, "statistics", level)))
        .collect()
}

/// Block-size tables for levels 0..=fixed_point, with running accumulation
/// of the per-level new blocks. Accumulated counts are non-decreasing in
/// level by construction.
pub fn load_sizes(dir: &Path, fixed_point: u32) -> Result<Vec<LevelSizes>> {
    let statistics = load_level_statistics(dir, fixed_point)?;
    let mut accumulated: BTreeMap<u64, u64> = BTreeMap::new();
    let mut out = Vec::with_capacity(statistics.len());
    for stats in statistics {
        for (&size, &count) in &stats.new_block_sizes {
            *accumulated.entry(size).or_insert(0) += count;
        }
        out.push(LevelSizes {
            sizes: stats.block_sizes,
            accumulated: accumulated.clone(),
        });
    }
    Ok(out)
}

/// Per-level statistics of the data-edge relation.
pub fn load_data_edge_statistics(dir: &Path, fixed_point: u32) -> Result<Vec<DataEdgeStatistics>> {
    (0..=fixed_point)
        .map(|level| read_json(&level_file(dir, "data_edge_statistics", level)))
        .collect()
}

pub fn load_graph_statistics(dir: &Path) -> Result<GraphStatistics> {
    read_json(&dir.join("graph_statistics.json"))
}

pub fn load_summary_graph_statistics(dir: &Path) -> Result<SummaryGraphStatistics> {
    read_json(&dir.join("summary_graph_statistics.json"))
}

/// Edge list of the level-k summary graph.
pub fn load_summary_graph(dir: &Path, k: u32) -> Result<SummaryGraphEdges> {
    let edges: SummaryGraphEdges = read_json(&dir.join(format!("summary_graph-{k:04}.json")))?;
    edges.len()?;
    Ok(edges)
}
