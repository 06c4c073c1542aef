/*! Software raster images with top-left origin.

[`Raster`] is the in-memory form every input takes before encoding: a packed,
row-major pixel buffer addressed from the top-left corner, tagged with one of
the formats from [`crate::pixel_formats`]. The PNG loading path normalizes
everything the decoder accepts (palette, grayscale, 16-bit, missing alpha)
into a `Raster<Rgba8>`.

# Coordinate system

- Origin (0, 0) is at the top-left
- X increases to the right
- Y increases downward

Targa wants the opposite vertical convention; that flip happens later, in
[`crate::targa::TgaImage::from_raster`], not here.
*/

use crate::error::Error;
use crate::pixel_formats::Rgba8;
use crate::pixel_formats::png_support::{decode_transformations, frame_to_rgba};
use crate::pixel_formats::sealed::PixelFormat;
use std::ops::Index;
use std::path::Path;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Integer coordinates of one pixel.
///
/// The origin (0, 0) is the top-left corner.
///
/// # Examples
///
/// ```
/// use tgapack::raster::Texel;
///
/// let texel = Texel { x: 10, y: 20 };
/// let origin = Texel::ZERO;
/// assert_eq!(origin.x, 0);
/// assert_eq!(origin.y, 0);
/// # _ = texel;
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Texel {
    /// X coordinate (horizontal position)
    pub x: u32,
    /// Y coordinate (vertical position)
    pub y: u32,
}
impl Texel {
    /// The origin texel at coordinates (0, 0).
    pub const ZERO: Texel = Texel { x: 0, y: 0 };

    /// Converts texel coordinates to a linear array index.
    const fn vec_offset(&self, width: u32) -> usize {
        width as usize * self.y as usize + self.x as usize
    }
}

/// A packed top-left-origin image.
///
/// # Examples
///
/// ```
/// use tgapack::pixel_formats::{Rgba8, RgbaPixel};
/// use tgapack::raster::{Raster, Texel};
///
/// // A 2x2 gradient
/// let raster = Raster::<Rgba8>::new_with(2, 2, |texel| RgbaPixel {
///     r: (texel.x * 100) as u8,
///     g: (texel.y * 100) as u8,
///     b: 0,
///     a: 255,
/// });
/// assert_eq!(raster[Texel { x: 1, y: 0 }].r, 100);
/// ```
#[derive(Debug)]
pub struct Raster<Format: PixelFormat> {
    data: Vec<Format::CPixel>,
    width: u32,
    height: u32,
}

impl<Format: PixelFormat> Raster<Format> {
    /// Creates a new raster with pixels initialized by a function.
    ///
    /// Mostly useful for tests and procedural fixtures; real inputs come from
    /// [`Raster::from_png_path`].
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new_with<F: Fn(Texel) -> Format::CPixel>(
        width: u32,
        height: u32,
        initialize_with: F,
    ) -> Self {
        assert!(width > 0 && height > 0);
        let mut vec = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                vec.push(initialize_with(Texel { x, y }))
            }
        }
        Self {
            width,
            height,
            data: vec,
        }
    }

    /// Returns the width of the image in pixels.
    #[inline] pub fn width(&self) -> u32 {
        self.width
    }
    /// Returns the height of the image in pixels.
    #[inline] pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel data in row-major order, top row first.
    #[inline] pub fn pixels(&self) -> &[Format::CPixel] {
        &self.data
    }
}

impl Raster<Rgba8> {
    /// Loads a PNG file and normalizes it to 8-bit RGBA.
    ///
    /// Any bit depth or color model the decoder accepts comes back as a
    /// top-left-origin RGBA8 buffer: palettes and sub-byte grays expand,
    /// 16-bit samples strip to 8, gray replicates into the color channels,
    /// and opaque images gain an opaque alpha channel.
    ///
    /// # Errors
    ///
    /// [`Error::InputNotFound`] if the file cannot be read, plus everything
    /// [`Raster::from_png_bytes`] reports.
    pub fn from_png_path(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read(path).map_err(|e| Error::InputNotFound {
            path: path.to_owned(),
            source: e,
        })?;
        Self::from_png_bytes(&data)
    }

    /// Decodes an in-memory PNG stream.
    ///
    /// # Errors
    ///
    /// [`Error::InputNotAPng`] if the stream does not start with the PNG
    /// signature, [`Error::Decode`] if the stream is malformed,
    /// [`Error::UnexpectedPixelLayout`] if the decoder's output disagrees
    /// with its own reported dimensions, [`Error::OutOfMemory`] if a pixel
    /// buffer cannot be allocated.
    pub fn from_png_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < PNG_SIGNATURE.len() || data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
            return Err(Error::InputNotAPng);
        }

        let mut decoder = png::Decoder::new(data);
        decoder.set_transformations(decode_transformations());
        let mut reader = decoder.read_info()?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(reader.output_buffer_size())?;
        buf.resize(reader.output_buffer_size(), 0);
        let info = reader.next_frame(&mut buf)?;

        let pixels = frame_to_rgba(&info, &buf)?;
        //the decoder rejects empty images before we get here
        assert!(info.width > 0 && info.height > 0);
        Ok(Self {
            data: pixels,
            width: info.width,
            height: info.height,
        })
    }
}

impl<Format: PixelFormat> Index<Texel> for Raster<Format> {
    type Output = Format::CPixel;

    fn index(&self, index: Texel) -> &Self::Output {
        assert!(index.x < self.width && index.y < self.height);
        &self.data[index.vec_offset(self.width)]
    }
}
