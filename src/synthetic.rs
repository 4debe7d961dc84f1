//! Synthetic sketches for demos and smoke tests.
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

const PAPER: Luma<u8> = Luma([255]);
const INK: Luma<u8> = Luma([0]);

/// 400×400 white sheet with a thick circle, a thin diagonal and a filled
/// square: a mix of curved, straight and dense strokes.
pub fn demo_drawing() -> GrayImage {
    let mut img = GrayImage::from_pixel(400, 400, PAPER);
    // Ring of radius 150, 10 px wide.
    draw_filled_circle_mut(&mut img, (200, 200), 155, INK);
    draw_filled_circle_mut(&mut img, (200, 200), 145, PAPER);
    // 3 px diagonal.
    for (ox, oy) in [(0.0, 0.0), (1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
        draw_line_segment_mut(&mut img, (50.0 + ox, 50.0 + oy), (350.0 + ox, 350.0 + oy), INK);
    }
    draw_filled_rect_mut(&mut img, Rect::at(250, 80).of_size(71, 71), INK);
    img
}

/// White `width × height` sheet with one filled black rectangle.
pub fn filled_rect_sheet(width: u32, height: u32, rect: Rect) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, PAPER);
    draw_filled_rect_mut(&mut img, rect, INK);
    img
}
