//! Visualization step generator.
//!
//! Renders one frame per processing stage from the same
//! [`AnalysisContext`] the metrics were computed from:
//!
//! | stage | content | encoding |
//! |---|---|---|
//! | `original` | source raster | configured format |
//! | `binarized` | stroke mask, foreground white | PNG |
//! | `edges` | Canny edge map | PNG |
//! | `corners` | source with every counted corner pixel painted | configured format |
//! | `skeleton` | thinned mask | PNG |
//! | `boundingBox` | source with the stroke bounding box outlined | configured format |

use crate::analysis::{AnalysisContext, RenderParams};
use crate::error::{AnalysisError, AnalysisResult};
use crate::image::io::{encode_image, to_base64, FrameFormat};
use crate::image::Mask;
use crate::types::BoundingBox;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use log::debug;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Processing stage a frame illustrates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualizationStage {
    Original,
    Binarized,
    Edges,
    Corners,
    Skeleton,
    BoundingBox,
}

impl VisualizationStage {
    /// Every stage in presentation order.
    pub const ALL: [VisualizationStage; 6] = [
        Self::Original,
        Self::Binarized,
        Self::Edges,
        Self::Corners,
        Self::Skeleton,
        Self::BoundingBox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Binarized => "binarized",
            Self::Edges => "edges",
            Self::Corners => "corners",
            Self::Skeleton => "skeleton",
            Self::BoundingBox => "boundingBox",
        }
    }

    /// Mask stages are always stored losslessly.
    pub fn is_mask(&self) -> bool {
        matches!(self, Self::Binarized | Self::Edges | Self::Skeleton)
    }
}

impl std::fmt::Display for VisualizationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One encoded frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedFrame {
    pub stage: VisualizationStage,
    pub format: FrameFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedFrame {
    pub fn to_base64(&self) -> String {
        to_base64(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.to_base64())
    }

    /// Decode the frame back into pixels.
    pub fn decode(&self) -> AnalysisResult<DynamicImage> {
        image::load_from_memory(&self.bytes)
            .map_err(|e| AnalysisError::encode(format!("{} frame: {e}", self.stage)))
    }

    /// File name for the frame, e.g. `boundingBox.png`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stage, self.format.extension())
    }
}

/// Ordered frames; serialized as a JSON object `stage -> base64`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisualizationSet {
    frames: Vec<EncodedFrame>,
}

impl VisualizationSet {
    pub fn get(&self, stage: VisualizationStage) -> Option<&EncodedFrame> {
        self.frames.iter().find(|f| f.stage == stage)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EncodedFrame> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn stages(&self) -> Vec<VisualizationStage> {
        self.frames.iter().map(|f| f.stage).collect()
    }
}

impl Serialize for VisualizationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.frames.len()))?;
        for frame in &self.frames {
            map.serialize_entry(frame.stage.as_str(), &frame.to_base64())?;
        }
        map.end()
    }
}

/// Render and encode all six frames, in [`VisualizationStage::ALL`] order.
pub fn render(ctx: &AnalysisContext<'_>) -> AnalysisResult<VisualizationSet> {
    ctx.check_dimensions()?;

    #[cfg(feature = "parallel")]
    let frames = VisualizationStage::ALL[..]
        .par_iter()
        .map(|&stage| render_frame(ctx, stage))
        .collect::<AnalysisResult<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let frames = VisualizationStage::ALL
        .iter()
        .map(|&stage| render_frame(ctx, stage))
        .collect::<AnalysisResult<Vec<_>>>()?;

    debug!(
        "visualize::render {} frames, {} bytes",
        frames.len(),
        frames.iter().map(|f| f.bytes.len()).sum::<usize>()
    );
    Ok(VisualizationSet { frames })
}

/// Render a single stage.
pub fn render_frame(
    ctx: &AnalysisContext<'_>,
    stage: VisualizationStage,
) -> AnalysisResult<EncodedFrame> {
    let render = &ctx.params.render;
    let image = match stage {
        VisualizationStage::Original => ctx.source.to_dynamic(),
        VisualizationStage::Binarized => mask_frame(&ctx.binary),
        VisualizationStage::Edges => mask_frame(&ctx.edges),
        VisualizationStage::Skeleton => mask_frame(&ctx.skeleton),
        VisualizationStage::Corners => {
            let mut canvas = ctx.source.to_rgb();
            paint_mask(&mut canvas, &ctx.corner_mask, Rgb(render.corner_color));
            DynamicImage::ImageRgb8(canvas)
        }
        VisualizationStage::BoundingBox => {
            let mut canvas = ctx.source.to_rgb();
            if let Some(bbox) = ctx.bbox {
                draw_bbox(&mut canvas, &bbox, render);
            }
            DynamicImage::ImageRgb8(canvas)
        }
    };
    let format = if stage.is_mask() {
        FrameFormat::Png
    } else {
        render.frame_format
    };
    let bytes = encode_image(&image, format)?;
    Ok(EncodedFrame {
        stage,
        format,
        width: image.width(),
        height: image.height(),
        bytes,
    })
}

fn mask_frame(mask: &Mask) -> DynamicImage {
    DynamicImage::ImageLuma8(mask.to_gray_image())
}

/// Paint every foreground pixel of `mask` onto `canvas`.
pub fn paint_mask(canvas: &mut RgbImage, mask: &Mask, color: Rgb<u8>) {
    for (x, y) in mask.iter_set() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// Outline from `(x, y)` to `(x + width, y + height)`, `thickness` pixels
/// wide and centred on that outline. Parts outside the canvas are clipped.
pub fn draw_bbox(canvas: &mut RgbImage, bbox: &BoundingBox, render: &RenderParams) {
    let t = render.bbox_thickness as i32;
    let (x0, y0) = (bbox.x as i32, bbox.y as i32);
    let (x1, y1) = (x0 + bbox.width as i32, y0 + bbox.height as i32);
    let color = Rgb(render.bbox_color);
    for d in -(t / 2)..(t - t / 2) {
        let width = x1 - x0 - 2 * d + 1;
        let height = y1 - y0 - 2 * d + 1;
        if width <= 0 || height <= 0 {
            continue;
        }
        let rect = Rect::at(x0 + d, y0 + d).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}
