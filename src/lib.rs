/*! tgapack converts PNG images into the run-length-encoded 32-bit Targa
files id Tech 3-family engines load as textures.

PNG and Targa disagree about nearly everything below the pixels: PNG hands
back rows top-to-bottom in R,G,B,A order, while the engines expect Targa's
bottom-to-top rows in B,G,R,A order, wrapped in type-10 RLE packets. The
interesting code here is that reordering and the packer; PNG decoding itself
is delegated to the `png` crate.

The pipeline, in order:

1. [`raster::Raster::from_png_path`] decodes and normalizes any PNG the
   decoder accepts into a top-left-origin RGBA8 buffer.
2. [`targa::TgaImage::from_raster`] flips rows and swizzles channels.
3. [`targa::TgaImage::into_data`] packs the pixels into RLE packets behind
   an 18-byte header.

[`convert_png_to_tga`] runs all three against the filesystem; the `tgapack`
binary is a two-argument wrapper around it.

Everything is synchronous and single-pass: one image per invocation, each
buffer owned by exactly one stage, and either a complete output file or a
terminal [`Error`].
*/

mod convert;
mod error;
pub mod pixel_formats;
pub mod raster;
pub mod targa;

pub use convert::convert_png_to_tga;
pub use error::Error;
