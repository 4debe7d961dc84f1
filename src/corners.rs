//! Harris corner response.
//!
//! For every pixel the structure tensor
//! `M = Σ_w [[Ix², IxIy], [IxIy, Iy²]]` is summed over a `block_size ×
//! block_size` window (unnormalized, anchored at `-(block_size / 2)`), and the
//! response is `det(M) − k · trace(M)²`. Derivatives come from a 3×3 Sobel
//! scaled by `1 / (2^(aperture-1) · block_size)`; both the derivative and the
//! window sum use reflect-101 borders.
//!
//! Corners are the pixels whose response is strictly above a fraction of the
//! map's maximum. A non-positive maximum (flat or purely edge-like images)
//! yields no corners.
use crate::edges::grad::{sobel_gradients, BorderMode, GradientNorm};
use crate::image::{ImageF32, ImageView, Mask};
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

/// Only the 3×3 Sobel aperture is implemented.
pub const SUPPORTED_APERTURE: usize = 3;

/// Harris parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerParams {
    /// Side of the window summing the structure tensor.
    pub block_size: usize,
    /// Sobel aperture; must equal [`SUPPORTED_APERTURE`].
    pub aperture: usize,
    /// Harris sensitivity `k`.
    pub k: f32,
    /// Fraction of the maximum response a corner must exceed.
    pub response_fraction: f32,
}

impl Default for CornerParams {
    fn default() -> Self {
        Self {
            block_size: 2,
            aperture: SUPPORTED_APERTURE,
            k: 0.04,
            response_fraction: 0.01,
        }
    }
}

/// Dense Harris response with its maximum.
#[derive(Clone, Debug)]
pub struct CornerResponse {
    pub response: ImageF32,
    pub max: f32,
}

impl CornerResponse {
    /// Response level a pixel must exceed to count as a corner.
    pub fn threshold(&self, fraction: f32) -> f32 {
        fraction * self.max
    }

    /// Pixels strictly above `fraction · max`; empty when `max ≤ 0`.
    pub fn corner_mask(&self, fraction: f32) -> Mask {
        let w = self.response.w;
        let h = self.response.h;
        if self.max <= 0.0 {
            return Mask::new(w, h);
        }
        let threshold = self.threshold(fraction);
        Mask::from_fn(w, h, |x, y| self.response.get(x, y) > threshold)
    }
}

/// Compute the Harris response of a grayscale float image (0–255 scale).
pub fn harris_response(gray: &ImageF32, params: &CornerParams) -> CornerResponse {
    let w = gray.w;
    let h = gray.h;
    let mut response = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return CornerResponse { response, max: 0.0 };
    }

    let block = params.block_size.max(1);
    let scale = 1.0 / ((1usize << (params.aperture.max(1) - 1)) * block) as f32;
    let grad = sobel_gradients(gray, BorderMode::Reflect101, GradientNorm::L2);

    let mut ixx = ImageF32::new(w, h);
    let mut ixy = ImageF32::new(w, h);
    let mut iyy = ImageF32::new(w, h);
    for y in 0..h {
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        for x in 0..w {
            let dx = gx_row[x] * scale;
            let dy = gy_row[x] * scale;
            ixx.set(x, y, dx * dx);
            ixy.set(x, y, dx * dy);
            iyy.set(x, y, dy * dy);
        }
    }

    let anchor = (block / 2) as isize;
    let border = BorderMode::Reflect101;
    let mut max = f32::NEG_INFINITY;
    for y in 0..h {
        for x in 0..w {
            let mut a = 0.0f32;
            let mut b = 0.0f32;
            let mut c = 0.0f32;
            for wy in 0..block as isize {
                let sy = border.resolve(y as isize + wy - anchor, h);
                for wx in 0..block as isize {
                    let sx = border.resolve(x as isize + wx - anchor, w);
                    a += ixx.get(sx, sy);
                    b += ixy.get(sx, sy);
                    c += iyy.get(sx, sy);
                }
            }
            let m = Matrix2::new(a, b, b, c);
            let trace = m.trace();
            let r = m.determinant() - params.k * trace * trace;
            response.set(x, y, r);
            max = max.max(r);
        }
    }

    CornerResponse { response, max }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(w: usize, h: usize, v: f32) -> ImageF32 {
        ImageF32::filled(w, h, v)
    }

    #[test]
    fn flat_image_has_zero_response_and_no_corners() {
        let img = filled(20, 20, 128.0);
        let resp = harris_response(&img, &CornerParams::default());
        assert_eq!(resp.max, 0.0);
        assert!(resp.corner_mask(0.01).is_empty());
    }

    #[test]
    fn straight_edge_scores_below_square_corner() {
        let params = CornerParams::default();
        let mut edge = filled(30, 30, 255.0);
        for y in 0..30 {
            for x in 0..15 {
                edge.set(x, y, 0.0);
            }
        }
        let edge_resp = harris_response(&edge, &params);
        // A straight edge has a rank-1 tensor: response is never positive.
        assert!(edge_resp.max <= 0.0);
        assert!(edge_resp.corner_mask(0.01).is_empty());

        let mut corner = filled(30, 30, 255.0);
        for y in 10..20 {
            for x in 10..20 {
                corner.set(x, y, 0.0);
            }
        }
        let resp = harris_response(&corner, &params);
        assert!(resp.max > 0.0);
        let mask = resp.corner_mask(params.response_fraction);
        assert!(!mask.is_empty());
        // Responses cluster near the four corners of the square.
        for (x, y) in mask.iter_set() {
            let near_x = x.abs_diff(10) <= 2 || x.abs_diff(19) <= 2;
            let near_y = y.abs_diff(10) <= 2 || y.abs_diff(19) <= 2;
            assert!(near_x && near_y, "unexpected corner at ({x}, {y})");
        }
    }

    #[test]
    fn threshold_scales_with_fraction() {
        let resp = CornerResponse {
            response: filled(2, 2, 1.0),
            max: 50.0,
        };
        assert_eq!(resp.threshold(0.01), 0.5);
        assert_eq!(resp.corner_mask(0.01).count(), 4);
    }
}
