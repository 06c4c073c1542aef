use crate::error::Error;
use crate::pixel_formats::{Rgba8, RgbaPixel};
use png::{BitDepth, ColorType, Transformations};

/// Formats the PNG decoder can be asked to normalize an arbitrary PNG into.
pub unsafe trait PngPixelFormat {
    fn png_color_type() -> ColorType;
    fn png_bit_depth() -> BitDepth;
}

unsafe impl PngPixelFormat for Rgba8 {
    fn png_color_type() -> ColorType {
        ColorType::Rgba
    }

    fn png_bit_depth() -> BitDepth {
        BitDepth::Eight
    }
}

/// Decoder transformations that reduce every PNG color model to 8 bits per
/// channel with an alpha channel: palettes and sub-byte grays expand, 16-bit
/// samples strip to 8, opaque images gain an opaque alpha channel.
pub(crate) fn decode_transformations() -> Transformations {
    Transformations::EXPAND | Transformations::STRIP_16 | Transformations::ALPHA
}

/// Reshapes one decoded frame into RGBA pixels.
///
/// With [`decode_transformations`] applied, the decoder only ever hands back
/// 8-bit Rgba or 8-bit GrayscaleAlpha; gray pixels replicate their luma into
/// all three color channels. Any other layout, or a byte count that disagrees
/// with the reported dimensions, means a decoder assumption broke and the
/// conversion stops.
pub(crate) fn frame_to_rgba(info: &png::OutputInfo, bytes: &[u8]) -> Result<Vec<RgbaPixel>, Error> {
    let pixel_count = info.width as usize * info.height as usize;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(pixel_count)?;
    match (info.color_type, info.bit_depth) {
        (color_type, bit_depth)
            if color_type == Rgba8::png_color_type() && bit_depth == Rgba8::png_bit_depth() =>
        {
            if bytes.len() != pixel_count * 4 {
                return Err(Error::UnexpectedPixelLayout {
                    expected: pixel_count * 4,
                    actual: bytes.len(),
                });
            }
            for px in bytes.chunks_exact(4) {
                pixels.push(RgbaPixel {
                    r: px[0],
                    g: px[1],
                    b: px[2],
                    a: px[3],
                });
            }
        }
        (ColorType::GrayscaleAlpha, BitDepth::Eight) => {
            if bytes.len() != pixel_count * 2 {
                return Err(Error::UnexpectedPixelLayout {
                    expected: pixel_count * 2,
                    actual: bytes.len(),
                });
            }
            for px in bytes.chunks_exact(2) {
                pixels.push(RgbaPixel {
                    r: px[0],
                    g: px[0],
                    b: px[0],
                    a: px[1],
                });
            }
        }
        (_, _) => {
            return Err(Error::UnexpectedPixelLayout {
                expected: pixel_count * 4,
                actual: bytes.len(),
            });
        }
    }
    Ok(pixels)
}
