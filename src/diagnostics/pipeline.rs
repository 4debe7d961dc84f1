use crate::diagnostics::TimingBreakdown;
use crate::edges::CannyStats;
use crate::insight::InsightOutcome;
use crate::metrics::DrawingMetrics;
use crate::types::BoundingBox;
use crate::visualize::VisualizationSet;
use serde::Serialize;
use std::fmt::Write as _;

/// Result of a completed [`DrawingAnalyzer`](crate::DrawingAnalyzer) run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub metrics: DrawingMetrics,
    pub visualizations: VisualizationSet,
    pub insight: InsightOutcome,
    pub trace: AnalysisTrace,
}

fn format_bbox(bbox: Option<BoundingBox>) -> String {
    bbox.map(|b| format!("x={} y={} w={} h={}", b.x, b.y, b.width, b.height))
        .unwrap_or_else(|| "-".to_string())
}

impl AnalysisReport {
    /// Multi-line human readable summary.
    pub fn summary(&self) -> String {
        let m = &self.metrics;
        let t = &self.trace;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "input {}x{} ({} channel{}, {})",
            t.input.width,
            t.input.height,
            t.input.channels,
            if t.input.channels == 1 { "" } else { "s" },
            t.input.source
        );
        let _ = writeln!(out, "  stroke density   {:>8.2} %", m.stroke_density_pct);
        let _ = writeln!(out, "  edge complexity  {:>8.2} %", m.edge_complexity_pct);
        let _ = writeln!(out, "  skeleton length  {:>8} px", m.skeleton_length_px);
        let _ = writeln!(out, "  corners          {:>8}", m.corner_count);
        let _ = writeln!(out, "  global contrast  {:>8.2}", m.global_contrast);
        let _ = writeln!(out, "  space usage      {:>8.2} %", m.space_usage_pct);
        let _ = writeln!(
            out,
            "otsu={} bbox={} frames={} total_ms={:.3}",
            t.otsu_threshold,
            format_bbox(t.bbox),
            self.visualizations.len(),
            t.timings.total_ms
        );
        let _ = write!(
            out,
            "insight{}: {}",
            if self.insight.degraded { " (fallback)" } else { "" },
            self.insight.text
        );
        out
    }
}

/// Lifecycle of one invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineState {
    Received,
    Decoded,
    MetricsComputed,
    VisualizationsComputed,
    InsightRequested,
    Completed,
    Failed,
}

impl PipelineState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Received, Decoded)
                | (Received, Failed)
                | (Decoded, MetricsComputed)
                | (MetricsComputed, VisualizationsComputed)
                | (MetricsComputed, Failed)
                | (VisualizationsComputed, InsightRequested)
                | (InsightRequested, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Failed)
    }
}

/// Diagnostics recorded alongside the metrics.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTrace {
    pub input: InputDescriptor,
    pub otsu_threshold: u8,
    pub max_corner_response: f32,
    pub corner_threshold: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    pub edges: CannyStats,
    pub states: Vec<PipelineState>,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    /// How the raster reached the analyzer: `payload`, `bytes`, `path` or `raster`.
    pub source: String,
}
