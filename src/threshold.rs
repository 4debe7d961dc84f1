//! Automatic binarization with Otsu's method.
//!
//! The threshold `t` splits the histogram into a class of intensities `≤ t`
//! and a class `> t`; the chosen `t` maximizes the between-class variance
//! `q1·q2·(μ1 − μ2)²`. Candidates whose class weight falls below
//! `f32::EPSILON` are skipped and only a strictly larger variance replaces the
//! current best, so ties resolve to the lowest intensity and a single-valued
//! histogram (no valid split) resolves to 0.
//!
//! Strokes are darker than paper, so the mask is inverted: pixels at or below
//! the threshold are foreground.
use crate::image::{ImageU8, ImageView, Mask};

/// 256-bin intensity histogram.
pub fn histogram(gray: &ImageU8) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for row in gray.rows() {
        for &v in row {
            hist[v as usize] += 1;
        }
    }
    hist
}

/// Otsu threshold of a histogram. See the module docs for the tie-break.
pub fn otsu_from_histogram(hist: &[u64; 256]) -> u8 {
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 0;
    }
    let scale = 1.0 / total as f64;
    let mu: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum::<f64>()
        * scale;

    let eps = f32::EPSILON as f64;
    let mut q1 = 0.0f64;
    let mut mu1 = 0.0f64;
    let mut best_sigma = 0.0f64;
    let mut best = 0u8;
    for (i, &h) in hist.iter().enumerate() {
        let p_i = h as f64 * scale;
        mu1 *= q1;
        q1 += p_i;
        let q2 = 1.0 - q1;
        if q1.min(q2) < eps || q1.max(q2) > 1.0 - eps {
            continue;
        }
        mu1 = (mu1 + i as f64 * p_i) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let diff = mu1 - mu2;
        let sigma = q1 * q2 * diff * diff;
        if sigma > best_sigma {
            best_sigma = sigma;
            best = i as u8;
        }
    }
    best
}

/// Otsu threshold of a grayscale view.
pub fn otsu_threshold(gray: &ImageU8) -> u8 {
    otsu_from_histogram(&histogram(gray))
}

/// Inverted binarization: `true` where `gray ≤ threshold`.
pub fn binarize_inv(gray: &ImageU8, threshold: u8) -> Mask {
    Mask::from_fn(gray.w, gray.h, |x, y| gray.get(x, y) <= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(w: usize, h: usize, data: &[u8]) -> ImageU8<'_> {
        ImageU8 {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[test]
    fn uniform_histogram_resolves_to_zero() {
        for level in [0u8, 128, 255] {
            let data = vec![level; 64];
            assert_eq!(otsu_threshold(&view(8, 8, &data)), 0);
        }
    }

    #[test]
    fn two_level_image_splits_at_lower_level() {
        let mut data = vec![255u8; 100];
        data[..30].fill(0);
        let t = otsu_threshold(&view(10, 10, &data));
        assert_eq!(t, 0);
        let mask = binarize_inv(&view(10, 10, &data), t);
        assert_eq!(mask.count(), 30);
    }

    #[test]
    fn bimodal_split_lies_between_modes() {
        let mut data = vec![200u8; 200];
        for (i, v) in data.iter_mut().enumerate().take(80) {
            *v = 40 + (i % 5) as u8;
        }
        let t = otsu_threshold(&view(20, 10, &data));
        assert!((44..200).contains(&t), "threshold {t} outside the modes");
        assert_eq!(binarize_inv(&view(20, 10, &data), t).count(), 80);
    }

    #[test]
    fn all_black_image_is_fully_foreground() {
        let data = vec![0u8; 16];
        let gray = view(4, 4, &data);
        let mask = binarize_inv(&gray, otsu_threshold(&gray));
        assert_eq!(mask.count(), 16);
    }
}
