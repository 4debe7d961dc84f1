//! Raster types and I/O.
//!
//! Decoded sources are [`RasterImage`]s. Every transform works on the
//! [`GrayImageU8`] derived from it (borrowed as [`ImageU8`]), on float buffers
//! ([`ImageF32`]) or on boolean [`Mask`]s of identical dimensions.
pub mod f32;
pub mod gray;
pub mod io;
pub mod mask;
pub mod raster;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::gray::GrayImageU8;
pub use self::mask::{BinaryMask, EdgeMap, Mask, SkeletonMask};
pub use self::raster::RasterImage;
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::u8::ImageU8;
