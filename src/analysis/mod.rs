//! Shared intermediates for one pipeline invocation.
//!
//! [`AnalysisContext::build`] runs every transform exactly once: grayscale
//! reduction, Otsu binarization, Canny edges, the Harris response with its
//! corner mask, Zhang–Suen thinning and the bounding box. The metric engine
//! and the visualization generator both read from the same context, so a
//! frame always shows exactly the pixels its metric counted.
//!
//! With the `parallel` feature the three independent branches (threshold and
//! skeleton, edges, corners) run on rayon's pool. Results do not depend on
//! scheduling.

pub mod params;

pub use params::{AnalysisParams, EdgeParams, RenderParams};

use crate::corners::{harris_response, CornerResponse};
use crate::diagnostics::timing::{elapsed_ms, timed, TimingBreakdown};
use crate::edges::{detect_edges_canny, CannyResult, CannyStats};
use crate::error::{AnalysisError, AnalysisResult};
use crate::image::{
    BinaryMask, EdgeMap, GrayImageU8, ImageF32, ImageView, Mask, RasterImage, SkeletonMask,
};
use crate::skeleton::skeletonize;
use crate::threshold::{binarize_inv, otsu_threshold};
use crate::types::BoundingBox;
use log::debug;
use std::time::Instant;

/// Every intermediate derived from one source raster.
#[derive(Clone, Debug)]
pub struct AnalysisContext<'a> {
    pub source: &'a RasterImage,
    pub params: AnalysisParams,
    pub gray: GrayImageU8,
    pub otsu_threshold: u8,
    pub binary: BinaryMask,
    pub edges: EdgeMap,
    pub edge_stats: CannyStats,
    pub corner_response: CornerResponse,
    pub corner_mask: Mask,
    pub skeleton: SkeletonMask,
    pub bbox: Option<BoundingBox>,
    pub timings: TimingBreakdown,
}

struct StrokeBranch {
    threshold: u8,
    binary: BinaryMask,
    skeleton: SkeletonMask,
    bbox: Option<BoundingBox>,
    threshold_ms: f64,
    skeleton_ms: f64,
}

fn stroke_branch(gray: &GrayImageU8) -> StrokeBranch {
    let ((threshold, binary), threshold_ms) = timed(|| {
        let view = gray.as_view();
        let t = otsu_threshold(&view);
        (t, binarize_inv(&view, t))
    });
    let (skeleton, skeleton_ms) = timed(|| skeletonize(&binary));
    let bbox = binary.bounding_box();
    StrokeBranch {
        threshold,
        binary,
        skeleton,
        bbox,
        threshold_ms,
        skeleton_ms,
    }
}

#[cfg(feature = "parallel")]
fn run_branches(
    gray: &GrayImageU8,
    levels: &ImageF32,
    params: &AnalysisParams,
) -> (StrokeBranch, (CannyResult, f64), (CornerResponse, f64)) {
    let (strokes, (edges, corners)) = rayon::join(
        || stroke_branch(gray),
        || {
            rayon::join(
                || timed(|| run_canny(levels, params)),
                || timed(|| harris_response(levels, &params.corners)),
            )
        },
    );
    (strokes, edges, corners)
}

#[cfg(not(feature = "parallel"))]
fn run_branches(
    gray: &GrayImageU8,
    levels: &ImageF32,
    params: &AnalysisParams,
) -> (StrokeBranch, (CannyResult, f64), (CornerResponse, f64)) {
    let strokes = stroke_branch(gray);
    let edges = timed(|| run_canny(levels, params));
    let corners = timed(|| harris_response(levels, &params.corners));
    (strokes, edges, corners)
}

fn run_canny(levels: &ImageF32, params: &AnalysisParams) -> CannyResult {
    detect_edges_canny(
        levels,
        params.edges.low_threshold,
        params.edges.high_threshold,
    )
}

impl<'a> AnalysisContext<'a> {
    /// Compute all intermediates for `source`.
    ///
    /// Fails with [`AnalysisError::Config`] for invalid parameters and
    /// [`AnalysisError::InvalidImage`] for a zero-area raster.
    pub fn build(source: &'a RasterImage, params: &AnalysisParams) -> AnalysisResult<Self> {
        params.validate()?;
        if source.area() == 0 {
            return Err(AnalysisError::invalid_image(format!(
                "raster has zero area ({}x{})",
                source.width(),
                source.height()
            )));
        }
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let (gray, gray_ms) = timed(|| source.to_gray());
        timings.push("grayscale", gray_ms);
        let levels = gray.as_view().to_f32();

        let (strokes, (canny, canny_ms), (corner_response, harris_ms)) =
            run_branches(&gray, &levels, params);
        timings.push("threshold", strokes.threshold_ms);
        timings.push("edges", canny_ms);
        timings.push("corners", harris_ms);
        timings.push("skeleton", strokes.skeleton_ms);

        let corner_mask = corner_response.corner_mask(params.corners.response_fraction);
        timings.total_ms = elapsed_ms(total_start);

        debug!(
            "AnalysisContext::build {}x{} otsu={} fg={} edges={} corners={} skeleton={} total_ms={:.3}",
            gray.width(),
            gray.height(),
            strokes.threshold,
            strokes.binary.count(),
            canny.edges.count(),
            corner_mask.count(),
            strokes.skeleton.count(),
            timings.total_ms
        );

        let ctx = Self {
            source,
            params: params.clone(),
            gray,
            otsu_threshold: strokes.threshold,
            binary: strokes.binary,
            edges: canny.edges,
            edge_stats: canny.stats,
            corner_response,
            corner_mask,
            skeleton: strokes.skeleton,
            bbox: strokes.bbox,
            timings,
        };
        ctx.check_dimensions()?;
        Ok(ctx)
    }

    pub fn width(&self) -> usize {
        self.gray.width()
    }

    pub fn height(&self) -> usize {
        self.gray.height()
    }

    /// Pixel count of the source raster.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Every intermediate must match the source dimensions.
    pub fn check_dimensions(&self) -> AnalysisResult<()> {
        let expected = (self.source.width(), self.source.height());
        let layers: [(&str, (usize, usize)); 6] = [
            ("gray", (self.gray.width(), self.gray.height())),
            ("binary", (self.binary.width(), self.binary.height())),
            ("edges", (self.edges.width(), self.edges.height())),
            (
                "corner response",
                (self.corner_response.response.w, self.corner_response.response.h),
            ),
            ("corners", (self.corner_mask.width(), self.corner_mask.height())),
            ("skeleton", (self.skeleton.width(), self.skeleton.height())),
        ];
        for (name, dims) in layers {
            if dims != expected {
                return Err(AnalysisError::metric_computation(format!(
                    "{name} is {}x{}, source is {}x{}",
                    dims.0, dims.1, expected.0, expected.1
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn canvas_with_square() -> RasterImage {
        let mut img = GrayImage::from_pixel(60, 40, Luma([255]));
        for y in 10..20 {
            for x in 20..35 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        RasterImage::from(img)
    }

    #[test]
    fn intermediates_share_source_dimensions() {
        let raster = canvas_with_square();
        let ctx = AnalysisContext::build(&raster, &AnalysisParams::default()).unwrap();
        assert_eq!((ctx.width(), ctx.height()), (60, 40));
        ctx.check_dimensions().unwrap();
        assert_eq!(ctx.binary.count(), 150);
        assert_eq!(
            ctx.bbox,
            Some(BoundingBox {
                x: 20,
                y: 10,
                width: 15,
                height: 10
            })
        );
        assert!(!ctx.edges.is_empty());
        assert!(!ctx.corner_mask.is_empty());
        assert!(!ctx.skeleton.is_empty());
    }

    #[test]
    fn timings_cover_each_stage() {
        let raster = canvas_with_square();
        let ctx = AnalysisContext::build(&raster, &AnalysisParams::default()).unwrap();
        for label in ["grayscale", "threshold", "edges", "corners", "skeleton"] {
            assert!(ctx.timings.stage_ms(label).is_some(), "missing {label}");
        }
    }

    #[test]
    fn invalid_params_are_rejected_before_work() {
        let raster = canvas_with_square();
        let mut params = AnalysisParams::default();
        params.corners.aperture = 7;
        let err = AnalysisContext::build(&raster, &params).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn zero_area_raster_is_invalid() {
        let raster = RasterImage::from(GrayImage::new(0, 5));
        let err = AnalysisContext::build(&raster, &AnalysisParams::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImage(_)));
    }
}
