//! Numerical core: data points, kernels, coordinate grids, KDE aggregation
//! and log-axis tick construction.

pub mod grid;
pub mod kde;
pub mod kernel;
pub mod points;
pub mod ticks;
