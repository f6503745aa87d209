//! bisimviz — analysis and visualization of graph-bisimulation summarization
//! experiments.
//!
//! Loads precomputed per-level statistics (block-size tables, scalar run
//! statistics, summary-graph edge lists) from JSON result stores and renders
//! histograms, degree distributions and KDE heatmaps over the
//! (bisimulation level × block size) domain.

pub mod core;
pub mod error;
pub mod plot;
pub mod stats;

pub use error::{Error, Result};
