//! Image gradients (3×3 Sobel) with configurable border handling.
//!
//! - Convolves the Sobel kernel pair (`X` and `Y`) over a float image.
//! - Border samples are synthesized either by replication (`aaa|abc`) or by
//!   reflection without repeating the edge pixel (`cb|abc`).
//! - Outputs per-pixel `gx`, `gy` and a magnitude in the requested norm.
//!
//! Complexity: O(W·H) per pass; memory: three float buffers.
use crate::image::{ImageF32, ImageView, ImageViewMut};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// How samples outside the image are synthesized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderMode {
    /// `aaa|abc|ccc`
    Replicate,
    /// `cb|abc|ba`
    Reflect101,
}

impl BorderMode {
    /// Map a possibly out-of-range coordinate into `[0, n)`.
    #[inline]
    pub fn resolve(self, i: isize, n: usize) -> usize {
        debug_assert!(n > 0);
        let last = n as isize - 1;
        match self {
            Self::Replicate => i.clamp(0, last) as usize,
            Self::Reflect101 => {
                if n == 1 {
                    return 0;
                }
                let period = 2 * last;
                let mut j = i.rem_euclid(period);
                if j > last {
                    j = period - j;
                }
                j as usize
            }
        }
    }
}

/// Norm used to combine `gx` and `gy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientNorm {
    /// `|gx| + |gy|`
    L1,
    /// `sqrt(gx^2 + gy^2)`
    L2,
}

/// Per-pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative (convolution with kernel X)
    pub gx: ImageF32,
    /// Vertical derivative (convolution with kernel Y)
    pub gy: ImageF32,
    /// Magnitude per pixel in the requested norm
    pub mag: ImageF32,
}

fn gradients_with_kernels(
    l: &ImageF32,
    kernel_x: &Kernel3,
    kernel_y: &Kernel3,
    border: BorderMode,
    norm: GradientNorm,
) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let yi = y as isize;
        let rows = [
            l.row(border.resolve(yi - 1, h)),
            l.row(y),
            l.row(border.resolve(yi + 1, h)),
        ];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let xi = x as isize;
            let x_idx = [border.resolve(xi - 1, w), x, border.resolve(xi + 1, w)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, yy_row) in rows.iter().enumerate() {
                let kx_row = &kernel_x[ky];
                let ky_row = &kernel_y[ky];
                sum_x += yy_row[x_idx[0]] * kx_row[0]
                    + yy_row[x_idx[1]] * kx_row[1]
                    + yy_row[x_idx[2]] * kx_row[2];
                sum_y += yy_row[x_idx[0]] * ky_row[0]
                    + yy_row[x_idx[1]] * ky_row[1]
                    + yy_row[x_idx[2]] * ky_row[2];
            }

            out_gx[x] = sum_x;
            out_gy[x] = sum_y;
            out_mag[x] = match norm {
                GradientNorm::L1 => sum_x.abs() + sum_y.abs(),
                GradientNorm::L2 => (sum_x * sum_x + sum_y * sum_y).sqrt(),
            };
        }
    }

    Grad { gx, gy, mag }
}

/// Compute Sobel gradients on a single-channel float image.
pub fn sobel_gradients(l: &ImageF32, border: BorderMode, norm: GradientNorm) -> Grad {
    gradients_with_kernels(l, &SOBEL_KERNEL_X, &SOBEL_KERNEL_Y, border, norm)
}
