//! Edge processing: Sobel gradients and Canny-style edge maps.
//!
//! - Gradient computation with replicate or reflect-101 borders and L1/L2
//!   magnitudes (`grad`).
//! - Non-maximum suppression plus hysteresis producing a boolean edge map
//!   (`nms`).
//!
//! Both the Canny detector and the Harris corner response build on the same
//! Sobel kernels.

pub mod grad;
pub mod nms;

/// Per-pixel gradients.
pub use grad::{sobel_gradients, BorderMode, Grad, GradientNorm};
/// Canny detector returning a dense edge map.
pub use nms::{detect_edges_canny, CannyResult, CannyStats};
