//! Parameter types shared by metric extraction and visualization.
//!
//! A single [`AnalysisParams`] value produces a single
//! [`AnalysisContext`](super::AnalysisContext); both the metric engine and
//! the frame renderer read from that context, so the numbers and the pictures
//! always come from the same thresholds.
//!
//! Defaults reproduce the reference behaviour: Canny 100/200, Harris block 2,
//! aperture 3, k = 0.04 and a 1% corner fraction.

use crate::corners::{CornerParams, SUPPORTED_APERTURE};
use crate::error::{AnalysisError, AnalysisResult};
use crate::image::io::FrameFormat;
use serde::{Deserialize, Serialize};

/// Top-level parameters for one pipeline run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Canny thresholds.
    pub edges: EdgeParams,
    /// Harris corner settings.
    pub corners: CornerParams,
    /// Overlay colors and frame encoding.
    pub render: RenderParams,
}

impl AnalysisParams {
    /// Reject values the transforms cannot honour.
    pub fn validate(&self) -> AnalysisResult<()> {
        let e = &self.edges;
        if !(e.low_threshold.is_finite() && e.high_threshold.is_finite()) {
            return Err(AnalysisError::config("edge thresholds must be finite"));
        }
        if e.low_threshold < 0.0 || e.high_threshold < 0.0 {
            return Err(AnalysisError::config("edge thresholds must be non-negative"));
        }
        let c = &self.corners;
        if c.block_size == 0 {
            return Err(AnalysisError::config("corner block_size must be >= 1"));
        }
        if c.aperture != SUPPORTED_APERTURE {
            return Err(AnalysisError::config(format!(
                "corner aperture {} unsupported (only {SUPPORTED_APERTURE})",
                c.aperture
            )));
        }
        if !c.k.is_finite() || !c.response_fraction.is_finite() {
            return Err(AnalysisError::config("corner k and response_fraction must be finite"));
        }
        if !(0.0..=1.0).contains(&c.response_fraction) {
            return Err(AnalysisError::config("corner response_fraction must lie in [0, 1]"));
        }
        if self.render.bbox_thickness == 0 {
            return Err(AnalysisError::config("bbox_thickness must be >= 1"));
        }
        if let FrameFormat::Jpeg { quality } = self.render.frame_format {
            if !(1..=100).contains(&quality) {
                return Err(AnalysisError::config("jpeg quality must lie in [1, 100]"));
            }
        }
        Ok(())
    }
}

/// Canny hysteresis thresholds on the L1 Sobel magnitude (0–255 input scale).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            low_threshold: 100.0,
            high_threshold: 200.0,
        }
    }
}

/// Overlay styling and the encoding used for non-mask frames.
///
/// Mask frames (`binarized`, `edges`, `skeleton`) are always PNG so they stay
/// lossless; `frame_format` applies to `original`, `corners` and
/// `boundingBox`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    pub corner_color: [u8; 3],
    pub bbox_color: [u8; 3],
    pub bbox_thickness: u32,
    pub frame_format: FrameFormat,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            corner_color: [255, 0, 0],
            bbox_color: [0, 255, 0],
            bbox_thickness: 3,
            frame_format: FrameFormat::Png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let params = AnalysisParams::default();
        params.validate().unwrap();
        assert_eq!(params.edges.low_threshold, 100.0);
        assert_eq!(params.edges.high_threshold, 200.0);
        assert_eq!(params.corners.block_size, 2);
        assert_eq!(params.corners.k, 0.04);
        assert_eq!(params.corners.response_fraction, 0.01);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let params: AnalysisParams =
            serde_json::from_str(r#"{"edges": {"high_threshold": 150.0}}"#).unwrap();
        assert_eq!(params.edges.low_threshold, 100.0);
        assert_eq!(params.edges.high_threshold, 150.0);
        assert_eq!(params.corners, CornerParams::default());
    }

    #[test]
    fn jpeg_format_parses_from_tagged_json() {
        let params: AnalysisParams = serde_json::from_str(
            r#"{"render": {"frame_format": {"kind": "jpeg", "quality": 90}}}"#,
        )
        .unwrap();
        assert_eq!(params.render.frame_format, FrameFormat::Jpeg { quality: 90 });
        params.validate().unwrap();
    }

    #[test]
    fn unsupported_aperture_is_rejected() {
        let mut params = AnalysisParams::default();
        params.corners.aperture = 5;
        assert!(matches!(params.validate(), Err(AnalysisError::Config(_))));
        let mut params = AnalysisParams::default();
        params.corners.response_fraction = 1.5;
        assert!(params.validate().is_err());
    }
}
