// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Type-safe pixel format definitions for raster images.
//!
//! Each pixel format is a zero-sized type tying a channel order to the
//! concrete `#[repr(C)]` pixel struct you actually read and write:
//!
//! - [`Rgba8`] - 4-channel 8-bit, R,G,B,A byte order (what PNG decodes to)
//! - [`Bgra8`] - 4-channel 8-bit, B,G,R,A byte order (what Targa stores)
//!
//! Formats are zero-sized types rather than an enum so that buffers with
//! different channel orders are different types; handing an RGBA buffer to
//! code that expects BGRA is a compile error rather than a color-swapped
//! texture in the engine.
//!
//! # Examples
//!
//! ```
//! use tgapack::pixel_formats::{BgraPixel, RgbaPixel};
//!
//! // Channel permutation is a plain `From` impl.
//! let red = RgbaPixel { r: 255, g: 0, b: 0, a: 255 };
//! let swizzled = BgraPixel::from(red);
//! assert_eq!(swizzled, BgraPixel { b: 0, g: 0, r: 255, a: 255 });
//! ```

pub(crate) mod png_support;

use crate::pixel_formats::sealed::{PixelFormat, ReprC};

/// Sealed traits for pixel format type safety.
///
/// Only the formats defined in this crate can be used with
/// [`Raster`](crate::raster::Raster); this keeps channel orders the converter
/// does not understand out of the pipeline.
pub(crate) mod sealed {
    use std::fmt::Debug;

    /// Core trait for pixel format types.
    pub trait PixelFormat: Debug + Send + Sync + 'static {
        /// Number of bytes per pixel for this format.
        const BYTES_PER_PIXEL: u8;

        /// The concrete pixel type with guaranteed C-compatible memory layout.
        type CPixel: Copy + Clone + Debug + PartialEq + Send + ReprC;
    }

    /// Marker trait indicating C-compatible memory layout.
    ///
    /// # Safety
    ///
    /// Implementations promise no padding, no uninitialized bytes, and stable
    /// field ordering, so a slice of pixels can be viewed as a byte slice.
    pub unsafe trait ReprC {}
}

/// Convert a slice of C-compatible pixels to raw bytes.
pub(crate) fn pixel_as_bytes<T: ReprC>(t: &[T]) -> &[u8] {
    //safe because we know that T is repr(C)
    //(we offloaded the safety check to the ReprC trait)
    unsafe { std::slice::from_raw_parts(t.as_ptr() as *const u8, std::mem::size_of_val(t)) }
}

/// 8-bit-per-channel format in R,G,B,A byte order.
///
/// The layout every PNG input is normalized to before conversion.
#[derive(Debug, Clone)]
pub struct Rgba8;
impl PixelFormat for Rgba8 {
    const BYTES_PER_PIXEL: u8 = 4;
    type CPixel = RgbaPixel;
}

/// 8-bit-per-channel format in B,G,R,A byte order.
///
/// The per-pixel layout a 32-bit Targa file stores, which id Tech 3-family
/// engines read back without further shuffling.
#[derive(Debug, Clone)]
pub struct Bgra8;
impl PixelFormat for Bgra8 {
    const BYTES_PER_PIXEL: u8 = 4;
    type CPixel = BgraPixel;
}

/// Pixel type for [`Rgba8`].
///
/// Field order matches the byte order in memory.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RgbaPixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
unsafe impl ReprC for RgbaPixel {}

/// Pixel type for [`Bgra8`].
///
/// Field order matches the byte order in memory, so serializing a slice of
/// these is exactly the Targa pixel stream.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BgraPixel {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}
unsafe impl ReprC for BgraPixel {}

impl From<RgbaPixel> for BgraPixel {
    fn from(val: RgbaPixel) -> Self {
        BgraPixel {
            b: val.b,
            g: val.g,
            r: val.r,
            a: val.a,
        }
    }
}
