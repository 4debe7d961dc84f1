//! Pipeline orchestrator.
//!
//! [`DrawingAnalyzer`] drives one invocation through
//! `Received → Decoded → MetricsComputed → VisualizationsComputed →
//! InsightRequested → Completed`. A decode failure enters `Failed` from
//! `Received`; metric and rendering failures enter it from `MetricsComputed`.
//! Either way the run surfaces an [`AnalysisError`]. An insight failure or
//! timeout only degrades the insight text.
//!
//! ```no_run
//! use sketch_metrics::{AnalysisParams, DrawingAnalyzer};
//!
//! # fn example(payload: &str) -> sketch_metrics::AnalysisResult<()> {
//! let analyzer = DrawingAnalyzer::new(AnalysisParams::default());
//! let report = analyzer.analyze_payload(payload)?;
//! println!("density {:.2}%", report.metrics.stroke_density_pct);
//! # Ok(())
//! # }
//! ```

mod insight_call;
mod states;

pub use states::StateLog;

use crate::analysis::{AnalysisContext, AnalysisParams};
use crate::diagnostics::timing::{elapsed_ms, timed, TimingBreakdown};
use crate::diagnostics::{AnalysisReport, AnalysisTrace, InputDescriptor, PipelineState};
use crate::error::AnalysisResult;
use crate::image::io::{decode_bytes, decode_payload, load_raster};
use crate::image::RasterImage;
use crate::insight::{DisabledInsight, InsightGenerator, InsightOutcome, InsightRequest};
use crate::metrics;
use crate::visualize;
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default bound on the insight call.
pub const DEFAULT_INSIGHT_TIMEOUT: Duration = Duration::from_secs(30);

/// Stateless drawing analyzer; share freely across threads.
#[derive(Clone)]
pub struct DrawingAnalyzer {
    params: AnalysisParams,
    insight: Arc<dyn InsightGenerator>,
    insight_timeout: Duration,
}

impl std::fmt::Debug for DrawingAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingAnalyzer")
            .field("params", &self.params)
            .field("insight_timeout", &self.insight_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for DrawingAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisParams::default())
    }
}

impl DrawingAnalyzer {
    /// Analyzer with insight generation disabled.
    pub fn new(params: AnalysisParams) -> Self {
        Self {
            params,
            insight: Arc::new(DisabledInsight),
            insight_timeout: DEFAULT_INSIGHT_TIMEOUT,
        }
    }

    pub fn with_insight(self, generator: impl InsightGenerator + 'static) -> Self {
        self.with_shared_insight(Arc::new(generator))
    }

    pub fn with_shared_insight(mut self, generator: Arc<dyn InsightGenerator>) -> Self {
        self.insight = generator;
        self
    }

    pub fn with_insight_timeout(mut self, timeout: Duration) -> Self {
        self.insight_timeout = timeout;
        self
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn insight_timeout(&self) -> Duration {
        self.insight_timeout
    }

    /// Analyze a base64 payload, with or without a data-URL marker.
    pub fn analyze_payload(&self, payload: &str) -> AnalysisResult<AnalysisReport> {
        self.run("payload", || decode_payload(payload))
    }

    /// Analyze an encoded raster (PNG, JPEG).
    pub fn analyze_bytes(&self, bytes: &[u8]) -> AnalysisResult<AnalysisReport> {
        self.run("bytes", || decode_bytes(bytes))
    }

    /// Analyze an image file.
    pub fn analyze_path(&self, path: &Path) -> AnalysisResult<AnalysisReport> {
        self.run("path", || load_raster(path))
    }

    /// Analyze an already decoded raster.
    pub fn analyze_raster(&self, raster: &RasterImage) -> AnalysisResult<AnalysisReport> {
        let start = Instant::now();
        let mut states = StateLog::new();
        states.advance(PipelineState::Decoded);
        self.finish(raster, "raster", states, TimingBreakdown::default(), start)
    }

    /// Analyze many payloads on the rayon pool. Results keep input order and
    /// each entry fails independently.
    #[cfg(feature = "parallel")]
    pub fn analyze_batch<S: AsRef<str> + Sync>(
        &self,
        payloads: &[S],
    ) -> Vec<AnalysisResult<AnalysisReport>> {
        payloads
            .par_iter()
            .map(|p| self.analyze_payload(p.as_ref()))
            .collect()
    }

    fn run(
        &self,
        source: &str,
        decode: impl FnOnce() -> AnalysisResult<RasterImage>,
    ) -> AnalysisResult<AnalysisReport> {
        let start = Instant::now();
        let mut states = StateLog::new();
        let (decoded, decode_ms) = timed(decode);
        let raster = match decoded {
            Ok(raster) => raster,
            Err(err) => {
                states.fail(&err);
                return Err(err);
            }
        };
        states.advance(PipelineState::Decoded);
        let mut timings = TimingBreakdown::default();
        timings.push("decode", decode_ms);
        self.finish(&raster, source, states, timings, start)
    }

    fn finish(
        &self,
        raster: &RasterImage,
        source: &str,
        mut states: StateLog,
        mut timings: TimingBreakdown,
        start: Instant,
    ) -> AnalysisResult<AnalysisReport> {
        debug!(
            "DrawingAnalyzer: {source} decoded to {}x{}x{}",
            raster.width(),
            raster.height(),
            raster.channels()
        );
        let (ctx, metrics, metrics_ms) = self.compute_metrics(raster, &mut states)?;

        let (visualizations, render_ms) = timed(|| visualize::render(&ctx));
        let visualizations = states.guard(|| visualizations)?;
        states.advance(PipelineState::VisualizationsComputed);

        states.advance(PipelineState::InsightRequested);
        let (insight, insight_ms) = timed(|| self.request_insight(&metrics));
        states.advance(PipelineState::Completed);

        timings.extend(&ctx.timings);
        timings.push("metrics", metrics_ms);
        timings.push("visualize", render_ms);
        timings.push("insight", insight_ms);
        timings.total_ms = elapsed_ms(start);

        let fraction = ctx.params.corners.response_fraction;
        let trace = AnalysisTrace {
            input: InputDescriptor {
                width: raster.width(),
                height: raster.height(),
                channels: raster.channels(),
                source: source.to_string(),
            },
            otsu_threshold: ctx.otsu_threshold,
            max_corner_response: ctx.corner_response.max,
            corner_threshold: ctx.corner_response.threshold(fraction),
            bbox: ctx.bbox,
            edges: ctx.edge_stats.clone(),
            states: states.into_states(),
            timings,
        };
        debug!(
            "DrawingAnalyzer: completed in {:.3} ms (insight degraded: {})",
            trace.timings.total_ms, insight.degraded
        );
        Ok(AnalysisReport {
            metrics,
            visualizations,
            insight,
            trace,
        })
    }

    /// Run the metric engine. Its failures are recorded from `MetricsComputed`.
    fn compute_metrics<'a>(
        &self,
        raster: &'a RasterImage,
        states: &mut StateLog,
    ) -> AnalysisResult<(AnalysisContext<'a>, metrics::DrawingMetrics, f64)> {
        states.advance(PipelineState::MetricsComputed);
        states.guard(|| {
            let ctx = AnalysisContext::build(raster, &self.params)?;
            let (metrics, metrics_ms) = timed(|| metrics::extract(&ctx));
            Ok((ctx, metrics?, metrics_ms))
        })
    }

    /// Ask the generator for an insight, bounded by the configured timeout.
    /// Never fails: errors become a degraded outcome.
    pub fn request_insight(&self, metrics: &metrics::DrawingMetrics) -> InsightOutcome {
        let request = InsightRequest::new(metrics);
        match insight_call::generate_with_timeout(
            Arc::clone(&self.insight),
            request,
            self.insight_timeout,
        ) {
            Ok(text) => InsightOutcome::generated(text),
            Err(err) => {
                warn!("insight generation degraded: {err}");
                InsightOutcome::fallback(&err)
            }
        }
    }
}
