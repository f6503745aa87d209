//! core/points.rs — (level, size, count) triples derived from block-size
//! tables, plus the weight policy used by the KDE aggregator.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::stats::LevelSizes;

/// One observation: `count` blocks of `size` vertices at bisimulation
/// `level`. Immutable once derived from the block-size table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPoint {
    pub level: u32,
    pub size: u64,
    pub count: u64,
}

/// How much one data point contributes to the density estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMode {
    /// Weight = number of blocks.
    BlockBased,
    /// Weight = number of vertices represented (count × size).
    VertexBased,
}

impl WeightMode {
    pub fn weight(&self, point: &DataPoint) -> f64 {
        match self {
            WeightMode::BlockBased => point.count as f64,
            WeightMode::VertexBased => (point.count * point.size) as f64,
        }
    }
}

impl FromStr for WeightMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "block_based" => Ok(WeightMode::BlockBased),
            "vertex_based" => Ok(WeightMode::VertexBased),
            other => Err(Error::InvalidConfig(format!(
                "weight mode must be \"block_based\" or \"vertex_based\", got {other:?}"
            ))),
        }
    }
}

/// Flatten per-level block-size tables into data points, one per distinct
/// (level, size) pair.
pub fn data_points(levels: &[LevelSizes]) -> Vec<DataPoint> {
    let mut out = Vec::new();
    for (level, table) in levels.iter().enumerate() {
        for (&size, &count) in &table.sizes {
            out.push(DataPoint {
                level: level as u32,
                size,
                count,
            });
        }
    }
    out
}

/// Largest block size over all data points.
pub fn max_size(points: &[DataPoint]) -> u64 {
    points.iter().map(|p| p.size).max().unwrap_or(1).max(1)
}

/// Kernel centers in the normalized domain: level / fixed_point on the first
/// axis, size / max_size on the second.
pub fn normalized_means(points: &[DataPoint], fixed_point: u32) -> Vec<[f64; 2]> {
    let fp = fixed_point.max(1) as f64;
    let maximum = max_size(points) as f64;
    points
        .iter()
        .map(|p| [p.level as f64 / fp, p.size as f64 / maximum])
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn table(entries: &[(u64, u64)]) -> LevelSizes {
        let sizes: BTreeMap<u64, u64> = entries.iter().copied().collect();
        LevelSizes {
            accumulated: sizes.clone(),
            sizes,
        }
    }

    #[test]
    fn triples_from_two_level_table() {
        // {0: {1: 3, 2: 1}, 1: {1: 1}} with fixed_point = 1
        let levels = vec![table(&[(1, 3), (2, 1)]), table(&[(1, 1)])];
        let points = data_points(&levels);
        assert_eq!(
            points,
            vec![
                DataPoint { level: 0, size: 1, count: 3 },
                DataPoint { level: 0, size: 2, count: 1 },
                DataPoint { level: 1, size: 1, count: 1 },
            ]
        );

        let vertex: Vec<f64> = points
            .iter()
            .map(|p| WeightMode::VertexBased.weight(p))
            .collect();
        assert_eq!(vertex, vec![3.0, 2.0, 1.0]);

        let block: Vec<f64> = points
            .iter()
            .map(|p| WeightMode::BlockBased.weight(p))
            .collect();
        assert_eq!(block, vec![3.0, 1.0, 1.0]);
    }

    #[test]
    fn weight_mode_parsing() {
        assert_eq!(
            "block_based".parse::<WeightMode>().unwrap(),
            WeightMode::BlockBased
        );
        assert_eq!(
            "vertex_based".parse::<WeightMode>().unwrap(),
            WeightMode::VertexBased
        );
        assert!("edge_based".parse::<WeightMode>().is_err());
    }

    #[test]
    fn means_are_normalized_to_unit_box() {
        let levels = vec![table(&[(1, 3), (8, 1)]), table(&[(4, 2)])];
        let points = data_points(&levels);
        let means = normalized_means(&points, 1);
        assert_eq!(means.len(), 3);
        for m in &means {
            assert!(m[0] >= 0.0 && m[0] <= 1.0);
            assert!(m[1] > 0.0 && m[1] <= 1.0);
        }
        // Largest size maps to exactly 1.
        assert!((means[1][1] - 1.0).abs() < 1e-12);
    }
}
