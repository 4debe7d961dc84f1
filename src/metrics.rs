//! Metric extraction engine.
//!
//! Turns an [`AnalysisContext`] into the six [`DrawingMetrics`]. Ratios are
//! expressed in percent of the image area and, like the contrast, rounded to
//! two decimals; counts are exact.

use crate::analysis::AnalysisContext;
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Quantitative description of one drawing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingMetrics {
    /// Foreground share of the canvas, in [0, 100].
    pub stroke_density_pct: f64,
    /// Canny edge pixels as a share of the canvas, in [0, 100].
    pub edge_complexity_pct: f64,
    /// Number of skeleton pixels.
    pub skeleton_length_px: u64,
    /// Number of pixels above the Harris cut-off.
    pub corner_count: u64,
    /// Population standard deviation of the grayscale intensities.
    pub global_contrast: f64,
    /// Bounding-box area as a share of the canvas, in [0, 100].
    pub space_usage_pct: f64,
}

impl DrawingMetrics {
    /// Metric names in report order.
    pub const KEYS: [&'static str; 6] = [
        "strokeDensityPct",
        "edgeComplexityPct",
        "skeletonLengthPx",
        "cornerCount",
        "globalContrast",
        "spaceUsagePct",
    ];

    /// Ordered `(name, value)` pairs, as handed to the insight generator.
    pub fn entries(&self) -> Vec<(String, Value)> {
        let values = [
            Value::from(self.stroke_density_pct),
            Value::from(self.edge_complexity_pct),
            Value::from(self.skeleton_length_px),
            Value::from(self.corner_count),
            Value::from(self.global_contrast),
            Value::from(self.space_usage_pct),
        ];
        Self::KEYS
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

/// Round half away from zero to two decimals.
#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn percent(count: u64, total: u64) -> f64 {
    round2(count as f64 / total as f64 * 100.0)
}

fn check_percent(name: &str, v: f64) -> AnalysisResult<f64> {
    if !v.is_finite() || !(0.0..=100.0).contains(&v) {
        return Err(AnalysisError::metric_computation(format!(
            "{name} = {v} outside [0, 100]"
        )));
    }
    Ok(v)
}

/// Compute the six metrics from the shared intermediates.
pub fn extract(ctx: &AnalysisContext<'_>) -> AnalysisResult<DrawingMetrics> {
    ctx.check_dimensions()?;
    let total = ctx.area() as u64;
    if total == 0 {
        return Err(AnalysisError::invalid_image("raster has zero area"));
    }

    let stroke_density_pct =
        check_percent("strokeDensityPct", percent(ctx.binary.count() as u64, total))?;
    let edge_complexity_pct =
        check_percent("edgeComplexityPct", percent(ctx.edges.count() as u64, total))?;
    let space_usage_pct = check_percent(
        "spaceUsagePct",
        ctx.bbox.map_or(0.0, |b| percent(b.area(), total)),
    )?;

    let (_, std_dev) = ctx.gray.mean_std_dev();
    let global_contrast = round2(std_dev);
    if !global_contrast.is_finite() || global_contrast < 0.0 {
        return Err(AnalysisError::metric_computation(format!(
            "globalContrast = {global_contrast} is not a non-negative number"
        )));
    }
    if !ctx.corner_response.max.is_finite() {
        return Err(AnalysisError::metric_computation(
            "corner response maximum is not finite",
        ));
    }

    Ok(DrawingMetrics {
        stroke_density_pct,
        edge_complexity_pct,
        skeleton_length_px: ctx.skeleton.count() as u64,
        corner_count: ctx.corner_mask.count() as u64,
        global_contrast,
        space_usage_pct,
    })
}
