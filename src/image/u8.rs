//! Borrowed 8-bit grayscale view.
use crate::image::{ImageF32, ImageView};

/// Read-only view over 8-bit intensities; rows are `stride` bytes apart.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Float copy holding the raw intensities (0–255).
    pub fn to_f32(&self) -> ImageF32 {
        ImageF32::from_fn(self.w, self.h, |x, y| f32::from(self.get(x, y)))
    }
}

impl<'a> ImageView for ImageU8<'a> {
    type Pixel = u8;

    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
