//! Rendering: thin wrappers over plotters' SVG backend.

pub mod colormap;
pub mod degree;
pub mod heatmap;
pub mod histogram;
