//! # Merlive Render
//!
//! Turns projected allocation data into PNG charts.
//!
//! - [`layout`]: deterministic force-directed node placement
//! - [`geometry`]: pie and axis arithmetic, backend independent
//! - [`renderer`]: output settings, the [`ChartSink`] trait and the
//!   `plotters` implementation
//!
//! Drawing text needs a system sans-serif font.

#![warn(missing_docs)]

mod draw;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod renderer;

pub use error::RenderError;
pub use geometry::{pie_slices, value_axis_max, PieSlice};
pub use layout::{spring_layout, Point};
pub use renderer::{ChartSink, OutputConfig, PlottersRenderer, GRAPH_FILE, ROLE_STATS_FILE, SUMMARY_FILE};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{ChartSink, OutputConfig, PlottersRenderer, RenderError};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
