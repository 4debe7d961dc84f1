//! Decoded source raster: either 3-channel color or single-channel gray.
use super::GrayImageU8;
use image::{DynamicImage, GrayImage, RgbImage};

#[derive(Clone, Debug, PartialEq)]
pub enum RasterImage {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl RasterImage {
    /// Collapse any decoded image to RGB or gray. Alpha is dropped.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if img.color().has_color() {
            Self::Rgb(img.into_rgb8())
        } else {
            Self::Gray(img.into_luma8())
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::Gray(img) => img.width() as usize,
            Self::Rgb(img) => img.width() as usize,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Gray(img) => img.height() as usize,
            Self::Rgb(img) => img.height() as usize,
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            Self::Gray(_) => 1,
            Self::Rgb(_) => 3,
        }
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Grayscale matrix used by every transform.
    pub fn to_gray(&self) -> GrayImageU8 {
        match self {
            Self::Gray(img) => GrayImageU8::from_gray(img),
            Self::Rgb(img) => GrayImageU8::from_rgb(img),
        }
    }

    /// Color copy used as the canvas for overlays.
    pub fn to_rgb(&self) -> RgbImage {
        match self {
            Self::Gray(img) => DynamicImage::ImageLuma8(img.clone()).into_rgb8(),
            Self::Rgb(img) => img.clone(),
        }
    }

    pub fn to_dynamic(&self) -> DynamicImage {
        match self {
            Self::Gray(img) => DynamicImage::ImageLuma8(img.clone()),
            Self::Rgb(img) => DynamicImage::ImageRgb8(img.clone()),
        }
    }
}

impl From<GrayImage> for RasterImage {
    fn from(img: GrayImage) -> Self {
        Self::Gray(img)
    }
}

impl From<RgbImage> for RasterImage {
    fn from(img: RgbImage) -> Self {
        Self::Rgb(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba, RgbaImage};

    #[test]
    fn alpha_is_dropped_on_conversion() {
        let rgba = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 0]));
        let raster = RasterImage::from_dynamic(DynamicImage::ImageRgba8(rgba));
        assert_eq!(raster.channels(), 3);
        assert_eq!((raster.width(), raster.height()), (4, 2));
    }

    #[test]
    fn gray_source_stays_single_channel() {
        let raster = RasterImage::from(GrayImage::from_pixel(3, 3, Luma([77])));
        assert_eq!(raster.channels(), 1);
        assert!(raster.to_gray().data().iter().all(|&v| v == 77));
        assert_eq!(raster.to_rgb().get_pixel(1, 1).0, [77, 77, 77]);
    }
}
