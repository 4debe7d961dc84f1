//! Owned 8-bit grayscale matrix derived from a decoded raster.
use super::ImageU8;
use image::{GrayImage, RgbImage};

/// BT.601 luma weights in 14-bit fixed point (R, G, B).
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Owned 8-bit grayscale buffer with stride and borrowed view conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer given raw bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        let stride = width;
        Self {
            width,
            height,
            stride,
            data,
        }
    }

    /// Reduce an RGB raster with fixed-point BT.601 luma.
    pub fn from_rgb(rgb: &RgbImage) -> Self {
        let data = rgb.pixels().map(|px| luma(px.0)).collect();
        Self::new(rgb.width() as usize, rgb.height() as usize, data)
    }

    /// Copy a single-channel raster.
    pub fn from_gray(gray: &GrayImage) -> Self {
        Self::new(
            gray.width() as usize,
            gray.height() as usize,
            gray.as_raw().clone(),
        )
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw intensities in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.stride,
            data: &self.data,
        }
    }

    /// Population mean and standard deviation of the intensities.
    ///
    /// Accumulates in f64 over integer sums so repeated calls are
    /// bit-identical. Returns `(0, 0)` for an empty buffer.
    pub fn mean_std_dev(&self) -> (f64, f64) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.data.len() as f64;
        let (sum, sum_sq) = self.data.iter().fold((0u64, 0u64), |(s, sq), &v| {
            let v = v as u64;
            (s + v, sq + v * v)
        });
        let mean = sum as f64 / n;
        let variance = (sum_sq as f64 / n - mean * mean).max(0.0);
        (mean, variance.sqrt())
    }
}

#[inline]
fn luma([r, g, b]: [u8; 3]) -> u8 {
    let acc = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + (1 << (LUMA_SHIFT - 1));
    (acc >> LUMA_SHIFT) as u8
}
