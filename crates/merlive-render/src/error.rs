//! Error types for rendering

use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;

/// Errors while producing an image file
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Output directory could not be prepared
    #[error("io error at {path}: {source}")]
    Io {
        /// Directory or file involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The drawing backend failed (fonts, encoding, file write)
    #[error("drawing failed: {0}")]
    Draw(String),
}

impl RenderError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw(value.to_string())
    }
}
