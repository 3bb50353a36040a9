//! Charts module - scales and heatmap rendering

mod renderer;
mod scales;

pub use renderer::{boundary_group, HeatmapRenderer, RenderError};
pub use scales::{first_occurrence, BandScale, SequentialScale};
