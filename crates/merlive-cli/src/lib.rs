//! # Merlive CLI
//!
//! Library half of the `merlive` binary: configuration loading and the
//! fetch → project → render pipeline.

#![warn(missing_docs)]

pub mod config;
pub mod pipeline;

pub use config::{AppConfig, ConfigError};
pub use pipeline::{run_render, Artifact, PipelineError, RunReport, StepOutcome};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
