//! Error types for the drawing-analysis pipeline.
//!
//! Decode and metric failures are terminal for an invocation and surface as
//! [`AnalysisError`]. Insight failures live in [`crate::insight::InsightError`]
//! and never escape the orchestrator.

use thiserror::Error;

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that abort a pipeline invocation.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Payload could not be decoded, or the decoded raster has zero area.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A transform produced a value outside its numeric contract.
    #[error("metric computation failed: {0}")]
    MetricComputation(String),

    /// A visualization frame could not be encoded.
    #[error("frame encoding failed: {0}")]
    Encode(String),

    /// Parameters or runtime configuration are invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Filesystem access failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl AnalysisError {
    /// Create an invalid image error.
    #[must_use]
    pub fn invalid_image(details: impl Into<String>) -> Self {
        Self::InvalidImage(details.into())
    }

    /// Create a metric computation error.
    #[must_use]
    pub fn metric_computation(details: impl Into<String>) -> Self {
        Self::MetricComputation(details.into())
    }

    /// Create a frame encoding error.
    #[must_use]
    pub fn encode(details: impl Into<String>) -> Self {
        Self::Encode(details.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }

    /// Create an i/o error.
    #[must_use]
    pub fn io(details: impl Into<String>) -> Self {
        Self::Io(details.into())
    }
}
