//! Output settings, the [`ChartSink`] seam, and the PNG renderer

use crate::draw::{draw_graph, draw_role_stats, draw_summary};
use crate::error::RenderError;
use crate::layout::DEFAULT_ITERATIONS;
use merlive_core::{AllocationGraph, AllocationStats};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Node-link diagram file name
pub const GRAPH_FILE: &str = "allocation_graph.png";
/// Pie and bar panels file name
pub const ROLE_STATS_FILE: &str = "role_stats.png";
/// Totals chart file name
pub const SUMMARY_FILE: &str = "summary_stats.png";

/// Where and how large the images are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory, created if missing
    pub dir: PathBuf,
    /// Pixel size of the graph image
    pub graph_size: (u32, u32),
    /// Pixel size of the role statistics image
    pub stats_size: (u32, u32),
    /// Pixel size of the summary image
    pub summary_size: (u32, u32),
    /// Simulation ticks for the graph layout
    pub layout_iterations: usize,
}

impl OutputConfig {
    /// Create default output settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory
    #[inline]
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Set the number of layout ticks
    #[inline]
    #[must_use]
    pub fn with_layout_iterations(mut self, iterations: usize) -> Self {
        self.layout_iterations = iterations;
        self
    }

    /// Full path of an artifact inside the output directory
    #[must_use]
    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            graph_size: (1200, 1000),
            stats_size: (1400, 600),
            summary_size: (1000, 600),
            layout_iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Something that turns projected data into chart files
///
/// Each method returns the path it wrote.
pub trait ChartSink {
    /// Write the allocation graph image
    fn render_graph(&self, graph: &AllocationGraph) -> Result<PathBuf, RenderError>;

    /// Write the users-per-role and permissions-per-role panels
    fn render_role_stats(&self, stats: &AllocationStats) -> Result<PathBuf, RenderError>;

    /// Write the totals chart
    fn render_summary(&self, stats: &AllocationStats) -> Result<PathBuf, RenderError>;
}

/// PNG renderer backed by `plotters`
#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer {
    config: OutputConfig,
}

impl PlottersRenderer {
    /// Create a renderer writing per `config`
    #[must_use]
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Output settings
    #[must_use]
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    fn prepare(&self, file: &str) -> Result<PathBuf, RenderError> {
        let dir = &self.config.dir;
        std::fs::create_dir_all(dir).map_err(|e| RenderError::io_error(dir, e))?;
        Ok(self.config.path_of(file))
    }
}

fn finish<DB: DrawingBackend>(root: &DrawingArea<DB, plotters::coord::Shift>, path: &Path) -> Result<(), RenderError>
where
    DB::ErrorType: 'static,
{
    root.present()?;
    tracing::info!(path = %path.display(), "chart written");
    Ok(())
}

impl ChartSink for PlottersRenderer {
    fn render_graph(&self, graph: &AllocationGraph) -> Result<PathBuf, RenderError> {
        let path = self.prepare(GRAPH_FILE)?;
        {
            let root = BitMapBackend::new(&path, self.config.graph_size).into_drawing_area();
            draw_graph(&root, graph, self.config.layout_iterations)?;
            finish(&root, &path)?;
        }
        Ok(path)
    }

    fn render_role_stats(&self, stats: &AllocationStats) -> Result<PathBuf, RenderError> {
        let path = self.prepare(ROLE_STATS_FILE)?;
        {
            let root = BitMapBackend::new(&path, self.config.stats_size).into_drawing_area();
            draw_role_stats(
                &root,
                &stats.users_by_role_series(),
                &stats.permissions_by_role_series(),
            )?;
            finish(&root, &path)?;
        }
        Ok(path)
    }

    fn render_summary(&self, stats: &AllocationStats) -> Result<PathBuf, RenderError> {
        let path = self.prepare(SUMMARY_FILE)?;
        {
            let root = BitMapBackend::new(&path, self.config.summary_size).into_drawing_area();
            draw_summary(&root, &stats.summary_series())?;
            finish(&root, &path)?;
        }
        Ok(path)
    }
}
