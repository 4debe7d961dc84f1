#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod analysis;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod insight;
pub mod metrics;
pub mod pipeline;
pub mod types;
pub mod visualize;

// Individual transforms; usable on their own.
pub mod corners;
pub mod edges;
pub mod skeleton;
pub mod synthetic;
pub mod threshold;

// --- High-level re-exports -------------------------------------------------

// Main entry points: analyzer, parameters, results.
pub use crate::analysis::{AnalysisContext, AnalysisParams, EdgeParams, RenderParams};
pub use crate::error::{AnalysisError, AnalysisResult};
pub use crate::metrics::DrawingMetrics;
pub use crate::pipeline::DrawingAnalyzer;
pub use crate::types::BoundingBox;
pub use crate::visualize::{EncodedFrame, VisualizationSet, VisualizationStage};

// Reports and diagnostics.
pub use crate::diagnostics::{AnalysisReport, AnalysisTrace, PipelineState};

// Insight plumbing.
pub use crate::insight::{
    DisabledInsight, InsightError, InsightGenerator, InsightOutcome, InsightRequest,
};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use sketch_metrics::prelude::*;
///
/// # fn main() -> AnalysisResult<()> {
/// let raster = RasterImage::from(sketch_metrics::synthetic::demo_drawing());
/// let report = DrawingAnalyzer::default().analyze_raster(&raster)?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::RasterImage;
    pub use crate::{AnalysisParams, AnalysisReport, AnalysisResult, DrawingAnalyzer, DrawingMetrics};
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    pub use crate::corners::{harris_response, CornerParams, CornerResponse};
    pub use crate::edges::{detect_edges_canny, CannyResult, CannyStats};
    pub use crate::metrics::extract as extract_metrics;
    pub use crate::skeleton::skeletonize;
    pub use crate::threshold::{binarize_inv, otsu_threshold};
    pub use crate::visualize::{render as render_visualizations, render_frame};
    pub use crate::diagnostics::{StageTiming, TimingBreakdown};
}
