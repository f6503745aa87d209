//! stats/records.rs — serde records for the on-disk JSON statistics files.
//!
//! Field names mirror the keys written by the experiment pipeline, so the
//! renames below are load-bearing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-level statistics of the bisimulation run.
///
/// `block_sizes` maps block size → number of blocks of that size at this
/// level; `new_block_sizes` counts only blocks created by this refinement
/// step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelStatistics {
    #[serde(rename = "Block count")]
    pub block_count: u64,
    #[serde(rename = "Singleton count")]
    pub singleton_count: u64,
    #[serde(rename = "Time (ms)", default)]
    pub time_ms: f64,
    #[serde(rename = "Memory (B)", default)]
    pub memory_bytes: u64,
    #[serde(rename = "Block sizes", default)]
    pub block_sizes: BTreeMap<u64, u64>,
    #[serde(rename = "New block sizes", default)]
    pub new_block_sizes: BTreeMap<u64, u64>,
}

/// Per-level statistics of the data-edge relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEdgeStatistics {
    #[serde(rename = "Edge count")]
    pub edge_count: u64,
    #[serde(rename = "Time (ms)", default)]
    pub time_ms: f64,
    #[serde(rename = "Memory (B)", default)]
    pub memory_bytes: u64,
}

/// Whole-graph statistics (one file per experiment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStatistics {
    #[serde(rename = "Vertex count")]
    pub vertex_count: u64,
    #[serde(rename = "Edge count")]
    pub edge_count: u64,
    #[serde(rename = "Type count", default)]
    pub type_count: u64,
}

/// Summary-graph statistics (one file per experiment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryGraphStatistics {
    #[serde(rename = "Block count")]
    pub block_count: u64,
    #[serde(rename = "Edge count")]
    pub edge_count: u64,
    #[serde(rename = "Singleton count", default)]
    pub singleton_count: u64,
}

/// Edge list of the level-k summary graph.
///
/// `edge_index[0]` holds source blocks, `edge_index[1]` target blocks;
/// `edge_type` is parallel to both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryGraphEdges {
    pub edge_index: [Vec<u64>; 2],
    #[serde(default)]
    pub edge_type: Vec<u64>,
}

impl SummaryGraphEdges {
    /// Edge count, after checking the parallel arrays agree.
    pub fn len(&self) -> Result<usize> {
        let n = self.edge_index[0].len();
        if self.edge_index[1].len() != n {
            return Err(Error::MalformedInput(format!(
                "edge_index arrays differ in length: {} vs {}",
                n,
                self.edge_index[1].len()
            )));
        }
        if !self.edge_type.is_empty() && self.edge_type.len() != n {
            return Err(Error::MalformedInput(format!(
                "edge_type length {} does not match edge count {}",
                self.edge_type.len(),
                n
            )));
        }
        Ok(n)
    }

    pub fn sources(&self) -> &[u64] {
        &self.edge_index[0]
    }

    pub fn targets(&self) -> &[u64] {
        &self.edge_index[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_statistics_roundtrip_json_keys() {
        let json = r#"{
            "Block count": 12,
            "Singleton count": 3,
            "Time (ms)": 1.5,
            "Memory (B)": 4096,
            "Block sizes": {"1": 3, "2": 1},
            "New block sizes": {"2": 1}
        }"#;
        let stats: LevelStatistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.block_count, 12);
        assert_eq!(stats.block_sizes.get(&1), Some(&3));
        assert_eq!(stats.new_block_sizes.get(&2), Some(&1));
    }

    #[test]
    fn missing_optional_keys_default() {
        let json = r#"{"Block count": 1, "Singleton count": 0}"#;
        let stats: LevelStatistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.time_ms, 0.0);
        assert!(stats.block_sizes.is_empty());
    }

    #[test]
    fn summary_graph_edges_length_mismatch_rejected() {
        let edges = SummaryGraphEdges {
            edge_index: [vec![0, 1], vec![1]],
            edge_type: vec![],
        };
        assert!(edges.len().is_err());
    }
}
