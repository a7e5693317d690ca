//! Fetch, project and render pipeline
//!
//! The graph and the statistics are independent branches: a failure in one
//! is recorded and the other still runs. Statistics are fetched once and
//! feed both the role panels and the summary chart.

use merlive_client::{AllocationSource, ClientError};
use merlive_core::{project_graph, project_stats, ProjectionError};
use merlive_render::{ChartSink, RenderError, GRAPH_FILE, ROLE_STATS_FILE, SUMMARY_FILE};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why an artifact was not produced
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Request failed
    #[error("request failed: {0}")]
    Client(#[from] ClientError),

    /// Response could not be turned into chart data
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Image could not be written
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// `true` when the server answered but had nothing to show
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::Projection(e) if e.is_no_data())
    }
}

/// The three image files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Node-link diagram
    Graph,
    /// Users and permissions per role
    RoleStats,
    /// Totals
    Summary,
}

impl Artifact {
    /// File name inside the output directory
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Graph => GRAPH_FILE,
            Self::RoleStats => ROLE_STATS_FILE,
            Self::Summary => SUMMARY_FILE,
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Result of one artifact
#[derive(Debug)]
pub enum StepOutcome {
    /// Image written to this path
    Written(PathBuf),
    /// This step failed
    Failed(PipelineError),
    /// Not attempted because a shared input failed earlier
    Skipped {
        /// Artifact whose failure is the cause
        because: Artifact,
    },
}

impl StepOutcome {
    /// Path written, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Written(path) => Some(path),
            _ => None,
        }
    }
}

/// Outcome of every artifact, in production order
#[derive(Debug, Default)]
pub struct RunReport {
    steps: Vec<(Artifact, StepOutcome)>,
}

impl RunReport {
    fn record(&mut self, artifact: Artifact, outcome: StepOutcome) {
        match &outcome {
            StepOutcome::Written(path) => tracing::debug!(%artifact, path = %path.display(), "step done"),
            StepOutcome::Failed(err) => tracing::debug!(%artifact, error = %err, "step failed"),
            StepOutcome::Skipped { because } => tracing::debug!(%artifact, %because, "step skipped"),
        }
        self.steps.push((artifact, outcome));
    }

    /// All steps
    #[must_use]
    pub fn steps(&self) -> &[(Artifact, StepOutcome)] {
        &self.steps
    }

    /// Outcome for one artifact
    #[must_use]
    pub fn outcome(&self, artifact: Artifact) -> Option<&StepOutcome> {
        self.steps.iter().find(|(a, _)| *a == artifact).map(|(_, o)| o)
    }

    /// Paths of written images
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.steps.iter().filter_map(|(_, o)| o.path())
    }

    /// `true` when every artifact was written
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|(_, o)| o.path().is_some())
    }
}

/// Fetch both data sets and write all three charts
///
/// Never fails as a whole; per-artifact errors land in the report.
pub async fn run_render<S, K>(source: &S, sink: &K) -> RunReport
where
    S: AllocationSource + ?Sized,
    K: ChartSink + ?Sized,
{
    let mut report = RunReport::default();

    let graph = match source.fetch_graph().await {
        Ok(payload) => project_graph(&payload)
            .map_err(PipelineError::from)
            .and_then(|graph| sink.render_graph(&graph).map_err(PipelineError::from)),
        Err(e) => Err(e.into()),
    };
    report.record(Artifact::Graph, into_outcome(graph));

    let stats = match source.fetch_stats().await {
        Ok(payload) => project_stats(&payload).map_err(PipelineError::from),
        Err(e) => Err(e.into()),
    };
    match stats {
        Ok(stats) => {
            report.record(Artifact::RoleStats, into_outcome(sink.render_role_stats(&stats).map_err(Into::into)));
            report.record(Artifact::Summary, into_outcome(sink.render_summary(&stats).map_err(Into::into)));
        }
        Err(e) => {
            report.record(Artifact::RoleStats, StepOutcome::Failed(e));
            report.record(
                Artifact::Summary,
                StepOutcome::Skipped {
                    because: Artifact::RoleStats,
                },
            );
        }
    }

    report
}

fn into_outcome(result: Result<PathBuf, PipelineError>) -> StepOutcome {
    match result {
        Ok(path) => StepOutcome::Written(path),
        Err(e) => StepOutcome::Failed(e),
    }
}
