//! Reports and traces returned by the drawing analyzer.
//!
//! [`AnalysisReport`] is the main entry point, bundling the metrics, the
//! per-stage frames, the insight text and an [`AnalysisTrace`] describing the
//! thresholds, visited states and stage timings of the run.

pub mod pipeline;
pub mod timing;

pub use pipeline::{AnalysisReport, AnalysisTrace, InputDescriptor, PipelineState};
pub use timing::{StageTiming, TimingBreakdown};
