//! Result store access: serde records plus one-shot loaders.

pub mod loader;
pub mod records;

pub use loader::{
    fixed_point, load_data_edge_statistics, load_graph_statistics, load_level_statistics,
    load_sizes, load_summary_graph, load_summary_graph_statistics, LevelSizes,
};
pub use records::{
    DataEdgeStatistics, GraphStatistics, LevelStatistics, SummaryGraphEdges,
    SummaryGraphStatistics,
};
