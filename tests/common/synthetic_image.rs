use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use imageproc::rect::Rect;
use sketch_metrics::image::io::to_base64;
use sketch_metrics::synthetic::filled_rect_sheet;
use std::io::Cursor;

/// White canvas with one black axis-aligned rectangle.
pub fn canvas_with_rect(size: u32, x0: u32, y0: u32, w: u32, h: u32) -> GrayImage {
    assert!(size > 0 && w > 0 && h > 0, "image dimensions must be positive");
    filled_rect_sheet(size, size, Rect::at(x0 as i32, y0 as i32).of_size(w, h))
}

/// Same canvas stored as three identical channels.
pub fn rgb_canvas_with_rect(size: u32, x0: u32, y0: u32, w: u32, h: u32) -> RgbImage {
    let gray = canvas_with_rect(size, x0, y0, w, h);
    RgbImage::from_fn(size, size, |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}

pub fn uniform_gray(width: u32, height: u32, level: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([level]))
}

pub fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("png encoding of a synthetic image");
    buf.into_inner()
}

/// Base64 PNG payload, optionally with a data-URL marker.
pub fn png_payload(img: DynamicImage, with_marker: bool) -> String {
    let b64 = to_base64(&png_bytes(img));
    if with_marker {
        format!("data:image/png;base64,{b64}")
    } else {
        b64
    }
}
