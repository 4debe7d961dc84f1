pub use crate::image::{ImageF32, ImageU8};
use serde::{Deserialize, Serialize};

/// Minimal axis-aligned rectangle enclosing every foreground pixel of a mask.
///
/// `width` and `height` count pixels, so a single foreground pixel yields a
/// 1×1 box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Inclusive right/bottom pixel coordinates. A degenerate box collapses
    /// onto its origin.
    pub fn max_corner(&self) -> (u32, u32) {
        (
            self.x + self.width.saturating_sub(1),
            self.y + self.height.saturating_sub(1),
        )
    }
}
