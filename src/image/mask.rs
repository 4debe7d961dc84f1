//! Boolean pixel masks: binarized strokes, edge maps and skeletons.
//!
//! Masks share the dimensions of the raster they were derived from and are
//! never resized. Foreground pixels are `true`.
use crate::image::{ImageView, ImageViewMut};
use crate::types::BoundingBox;
use image::{GrayImage, Luma};

/// Foreground intensity used when a mask is rendered as a two-tone image.
pub const MASK_ON: u8 = 255;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    w: usize,
    h: usize,
    data: Vec<bool>,
}

/// Strokes from the inverted Otsu threshold.
pub type BinaryMask = Mask;
/// Pixels kept by the Canny detector.
pub type EdgeMap = Mask;
/// Unit-width centerlines of a [`BinaryMask`].
pub type SkeletonMask = Mask;

impl Mask {
    /// All-background mask of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![false; w * h],
        }
    }

    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: bool) {
        self.data[y * self.w + x] = v;
    }

    /// Value at signed coordinates; anything outside the mask is background.
    #[inline]
    pub fn get_or_background(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return false;
        }
        self.get(x as usize, y as usize)
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// Foreground coordinates in row-major order.
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.w.max(1);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(move |(i, _)| (i % w, i / w))
    }

    /// Tight box around the foreground, `None` for an empty mask.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0usize;
        let mut max_y = 0usize;
        let mut any = false;
        for y in 0..self.h {
            let row = self.row(y);
            let Some(first) = row.iter().position(|&v| v) else {
                continue;
            };
            // `position` succeeded, so `rposition` cannot fail.
            let last = row.iter().rposition(|&v| v).unwrap_or(first);
            any = true;
            min_x = min_x.min(first);
            max_x = max_x.max(last);
            min_y = min_y.min(y);
            max_y = y;
        }
        any.then(|| BoundingBox {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }

    /// Render as a two-tone grayscale image (foreground [`MASK_ON`], background 0).
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.w as u32, self.h as u32, |x, y| {
            Luma([if self.get(x as usize, y as usize) { MASK_ON } else { 0 }])
        })
    }
}

impl ImageView for Mask {
    type Pixel = bool;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[bool] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for Mask {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [bool] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_of_empty_mask_is_none() {
        let mask = Mask::new(8, 8);
        assert!(mask.bounding_box().is_none());
        assert!(mask.is_empty());
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn bounding_box_spans_extreme_pixels() {
        let mut mask = Mask::new(10, 6);
        mask.set(2, 1, true);
        mask.set(7, 4, true);
        mask.set(5, 3, true);
        let bbox = mask.bounding_box().unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                x: 2,
                y: 1,
                width: 6,
                height: 4
            }
        );
        assert_eq!(bbox.max_corner(), (7, 4));
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn single_pixel_box_is_one_by_one() {
        let mut mask = Mask::new(3, 3);
        mask.set(1, 1, true);
        assert_eq!(mask.bounding_box().unwrap().area(), 1);
    }

    #[test]
    fn gray_rendering_matches_count() {
        let mask = Mask::from_fn(5, 4, |x, y| (x + y) % 2 == 0);
        let img = mask.to_gray_image();
        let on = img.pixels().filter(|p| p.0[0] == MASK_ON).count();
        assert_eq!(on, mask.count());
        let coords: Vec<_> = mask.iter_set().take(2).collect();
        assert_eq!(coords, vec![(0, 0), (2, 0)]);
    }
}
