// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Run-length-encoded 32-bit Targa output.

This is the half of the pipeline id Tech 3-family engines actually care
about. A [`TgaImage`] holds pixels the way the file format wants them
(B,G,R,A byte order, bottom row first), and [`TgaImage::into_data`]
serializes the 18-byte type-10 header followed by the RLE packet stream.

# Packet scheme

Each packet is one header byte followed by pixel data. If the header's high
bit is set, the low 7 bits hold `count - 1` and a single 4-byte pixel
follows, to be repeated `count` times. If the high bit is clear, `count`
literal pixels follow. `count` is 1..=128 either way. Packets cover the
image left-to-right, bottom-to-top as one flat sequence, so a packet may
span scanline boundaries; the format permits this and readers handle it.

The packer is greedy, the standard Targa heuristic rather than an optimal
packing: a stretch of 2 or more identical pixels always becomes a run
packet, and a raw packet ends as soon as the next two pixels are equal (a
pairwise check, not a full run scan).
*/

use crate::error::Error;
use crate::pixel_formats::sealed::PixelFormat;
use crate::pixel_formats::{Bgra8, BgraPixel, Rgba8, pixel_as_bytes};
use crate::raster::{Raster, Texel};

/// Size of the Targa file header in bytes.
const HEADER_LEN: usize = 18;
/// Image type 10: run-length-encoded true-color.
const IMAGE_TYPE_RLE_TRUE_COLOR: u8 = 10;
/// Longest pixel count a single packet can carry.
const MAX_PACKET_PIXELS: usize = 128;
/// Largest width or height the header's 16-bit dimension fields can hold.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// A bottom-left-origin BGRA image ready for Targa serialization.
///
/// Construction already enforces the format limits, so serialization itself
/// cannot fail: [`TgaImage::into_data`] is infallible and the caller decides
/// what sink the bytes go to.
///
/// # Examples
///
/// ```
/// use tgapack::pixel_formats::BgraPixel;
/// use tgapack::targa::TgaImage;
///
/// let px = BgraPixel { b: 0, g: 0, r: 255, a: 255 };
/// let tga = TgaImage::new(2, 1, &[px, px]);
/// let data = tga.into_data();
/// assert_eq!(data[2], 10); // type 10: RLE true-color
/// assert_eq!(data[18], 0x81); // one run packet of two pixels
/// ```
#[derive(Debug, Clone)]
pub struct TgaImage {
    width: u16,
    height: u16,
    pixels: Vec<BgraPixel>,
}

impl TgaImage {
    /// Wraps an already-ordered pixel buffer.
    ///
    /// `pixels` must hold `width * height` BGRA pixels, bottom row first,
    /// left to right within each row.
    ///
    /// # Panics
    ///
    /// Panics if the buffer length disagrees with the dimensions.
    pub fn new(width: u16, height: u16, pixels: &[BgraPixel]) -> Self {
        assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels: pixels.to_vec(),
        }
    }

    /// Reorders a decoded raster into Targa's conventions.
    ///
    /// PNG hands rows over top-to-bottom in R,G,B,A order; Targa wants rows
    /// bottom-to-top in B,G,R,A order. The transform allocates a fresh
    /// buffer, so the raster survives unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionTooLarge`] if either dimension exceeds
    /// [`MAX_DIMENSION`] (checked before any other work),
    /// [`Error::OutOfMemory`] if the output buffer cannot be allocated.
    pub fn from_raster(raster: &Raster<Rgba8>) -> Result<Self, Error> {
        if raster.width() > MAX_DIMENSION || raster.height() > MAX_DIMENSION {
            return Err(Error::DimensionTooLarge {
                width: raster.width(),
                height: raster.height(),
            });
        }
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(raster.width() as usize * raster.height() as usize)?;
        for y in (0..raster.height()).rev() {
            for x in 0..raster.width() {
                pixels.push(raster[Texel { x, y }].into());
            }
        }
        Ok(Self {
            width: raster.width() as u16,
            height: raster.height() as u16,
            pixels,
        })
    }

    /// Returns the width in pixels.
    #[inline] pub fn width(&self) -> u16 {
        self.width
    }
    /// Returns the height in pixels.
    #[inline] pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns the pixel data, bottom row first.
    #[inline] pub fn pixels(&self) -> &[BgraPixel] {
        &self.pixels
    }

    /// The 18-byte type-10 header. Multi-byte fields are little-endian.
    fn header(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        //bytes 0..2: no image ID, no color map
        header[2] = IMAGE_TYPE_RLE_TRUE_COLOR;
        //bytes 3..8: color map spec, all zero
        //bytes 8..12: x/y origin, both zero
        header[12..14].copy_from_slice(&self.width.to_le_bytes());
        header[14..16].copy_from_slice(&self.height.to_le_bytes());
        header[16] = 32; //bits per pixel
        header[17] = 8; //descriptor: 8 alpha bits, no flip flags
        header
    }

    /// Serializes the image to the complete Targa byte stream: header, then
    /// RLE packets until every pixel is covered.
    pub fn into_data(self) -> Vec<u8> {
        let bpp = Bgra8::BYTES_PER_PIXEL as usize;
        //worst case is one raw packet per pixel: header byte + pixel each
        let mut out = Vec::with_capacity(HEADER_LEN + self.pixels.len() * (bpp + 1));
        out.extend_from_slice(&self.header());

        let pixels = &self.pixels;
        let mut i = 0;
        while i < pixels.len() {
            //longest run of identical pixels starting here, capped at 128
            let mut run = 1;
            while i + run < pixels.len() && run < MAX_PACKET_PIXELS && pixels[i + run] == pixels[i]
            {
                run += 1;
            }

            if run >= 2 {
                out.push(0x80 | (run as u8 - 1));
                out.extend_from_slice(pixel_as_bytes(&pixels[i..i + 1]));
                i += run;
                continue;
            }

            //raw packet: extend until the next pair of equal pixels, which
            //belongs to the run packet that follows it
            let mut raw = 1;
            while i + raw < pixels.len() && raw < MAX_PACKET_PIXELS {
                if i + raw + 1 < pixels.len() && pixels[i + raw] == pixels[i + raw + 1] {
                    break;
                }
                raw += 1;
            }

            out.push(raw as u8 - 1);
            out.extend_from_slice(pixel_as_bytes(&pixels[i..i + raw]));
            i += raw;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_formats::RgbaPixel;

    /// Walks an encoded stream, checking packet invariants, and re-derives
    /// the flat pixel sequence.
    fn decode_packets(data: &[u8]) -> Vec<BgraPixel> {
        assert!(data.len() >= HEADER_LEN);
        let mut pixels = Vec::new();
        let mut i = HEADER_LEN;
        while i < data.len() {
            let header = data[i];
            let count = (header & 0x7F) as usize + 1;
            assert!((1..=MAX_PACKET_PIXELS).contains(&count));
            i += 1;
            if header & 0x80 != 0 {
                let px = BgraPixel {
                    b: data[i],
                    g: data[i + 1],
                    r: data[i + 2],
                    a: data[i + 3],
                };
                i += 4;
                for _ in 0..count {
                    pixels.push(px);
                }
            } else {
                for _ in 0..count {
                    pixels.push(BgraPixel {
                        b: data[i],
                        g: data[i + 1],
                        r: data[i + 2],
                        a: data[i + 3],
                    });
                    i += 4;
                }
            }
        }
        //no trailing bytes, no packet ran past the end
        assert_eq!(i, data.len());
        pixels
    }

    /// Asserts that no two adjacent run packets encode the same pixel with a
    /// combined length the packer should have merged.
    fn assert_no_mergeable_runs(data: &[u8]) {
        let mut prev_run: Option<(BgraPixel, usize)> = None;
        let mut i = HEADER_LEN;
        while i < data.len() {
            let header = data[i];
            let count = (header & 0x7F) as usize + 1;
            i += 1;
            if header & 0x80 != 0 {
                let px = BgraPixel {
                    b: data[i],
                    g: data[i + 1],
                    r: data[i + 2],
                    a: data[i + 3],
                };
                if let Some((prev_px, prev_count)) = prev_run {
                    assert!(
                        prev_px != px || prev_count + count > MAX_PACKET_PIXELS,
                        "adjacent run packets of {px:?} should have been merged"
                    );
                }
                prev_run = Some((px, count));
                i += 4;
            } else {
                prev_run = None;
                i += count * 4;
            }
        }
    }

    fn bgra(b: u8, g: u8, r: u8, a: u8) -> BgraPixel {
        BgraPixel { b, g, r, a }
    }

    #[test]
    fn header_layout() {
        let px = bgra(1, 2, 3, 4);
        let data = TgaImage::new(300, 2, &vec![px; 600]).into_data();
        assert_eq!(data[0], 0); //no image ID
        assert_eq!(data[1], 0); //no color map
        assert_eq!(data[2], 10); //RLE true-color
        assert_eq!(&data[3..12], &[0; 9]); //color map spec + origin
        assert_eq!(&data[12..14], &300u16.to_le_bytes()); //width
        assert_eq!(&data[14..16], &2u16.to_le_bytes()); //height
        assert_eq!(data[16], 32); //pixel depth
        assert_eq!(data[17], 8); //descriptor
    }

    #[test]
    fn two_identical_pixels_become_one_run_packet() {
        let red = BgraPixel::from(RgbaPixel { r: 255, g: 0, b: 0, a: 255 });
        let data = TgaImage::new(2, 1, &[red, red]).into_data();
        assert_eq!(data.len(), HEADER_LEN + 5);
        assert_eq!(data[18], 0x81);
        assert_eq!(&data[19..23], &[0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn three_distinct_pixels_become_one_raw_packet() {
        let pixels = [
            BgraPixel::from(RgbaPixel { r: 1, g: 2, b: 3, a: 4 }),
            BgraPixel::from(RgbaPixel { r: 5, g: 6, b: 7, a: 8 }),
            BgraPixel::from(RgbaPixel { r: 1, g: 2, b: 3, a: 4 }),
        ];
        let data = TgaImage::new(3, 1, &pixels).into_data();
        assert_eq!(data.len(), HEADER_LEN + 1 + 12);
        assert_eq!(data[18], 0x02);
        assert_eq!(&data[19..23], &[3, 2, 1, 4]);
        assert_eq!(&data[23..27], &[7, 6, 5, 8]);
        assert_eq!(&data[27..31], &[3, 2, 1, 4]);
    }

    #[test]
    fn raw_packet_stops_before_a_run() {
        let a = bgra(1, 1, 1, 1);
        let b = bgra(2, 2, 2, 2);
        let c = bgra(3, 3, 3, 3);
        let data = TgaImage::new(4, 1, &[a, b, b, c]).into_data();
        //raw(a), run(b,b), raw(c)
        assert_eq!(data[18], 0x00);
        assert_eq!(&data[19..23], &[1, 1, 1, 1]);
        assert_eq!(data[23], 0x81);
        assert_eq!(&data[24..28], &[2, 2, 2, 2]);
        assert_eq!(data[28], 0x00);
        assert_eq!(&data[29..33], &[3, 3, 3, 3]);
        assert_eq!(data.len(), HEADER_LEN + 15);
    }

    #[test]
    fn trailing_pair_joins_the_raw_packet() {
        //the final pixel has no successor, so the raw packet absorbs it
        let a = bgra(1, 1, 1, 1);
        let b = bgra(2, 2, 2, 2);
        let data = TgaImage::new(2, 1, &[a, b]).into_data();
        assert_eq!(data[18], 0x01);
        assert_eq!(data.len(), HEADER_LEN + 1 + 8);
    }

    #[test]
    fn long_runs_split_at_128() {
        let px = bgra(9, 8, 7, 6);
        let data = TgaImage::new(300, 1, &vec![px; 300]).into_data();
        assert_eq!(data[18], 0xFF); //128
        assert_eq!(data[23], 0xFF); //128
        assert_eq!(data[28], 0x80 | 43); //44
        assert_eq!(data.len(), HEADER_LEN + 3 * 5);
        assert_eq!(decode_packets(&data).len(), 300);
    }

    #[test]
    fn long_raw_stretches_split_at_128() {
        let pixels: Vec<BgraPixel> = (0..200u16)
            .map(|i| bgra(i as u8, (i >> 8) as u8, 0, 255))
            .collect();
        let data = TgaImage::new(200, 1, &pixels).into_data();
        assert_eq!(data[18], 0x7F); //128 literals
        assert_eq!(data[18 + 1 + 128 * 4], 0x47); //72 literals
        assert_eq!(decode_packets(&data), pixels);
    }

    #[test]
    fn from_raster_flips_rows_and_swizzles() {
        //three rows, each a solid distinct color
        let rows = [
            RgbaPixel { r: 10, g: 11, b: 12, a: 13 },
            RgbaPixel { r: 20, g: 21, b: 22, a: 23 },
            RgbaPixel { r: 30, g: 31, b: 32, a: 33 },
        ];
        let raster = Raster::<Rgba8>::new_with(2, 3, |texel| rows[texel.y as usize]);
        let tga = TgaImage::from_raster(&raster).unwrap();
        assert_eq!(tga.width(), 2);
        assert_eq!(tga.height(), 3);
        //scanline 0 of the output is the bottom input row, swizzled
        assert_eq!(tga.pixels()[0], bgra(32, 31, 30, 33));
        assert_eq!(tga.pixels()[1], bgra(32, 31, 30, 33));
        assert_eq!(tga.pixels()[2], bgra(22, 21, 20, 23));
        assert_eq!(tga.pixels()[4], bgra(12, 11, 10, 13));
        //the raster is untouched
        assert_eq!(raster.pixels()[0], rows[0]);
    }

    #[test]
    fn bottom_row_precedes_top_row_in_the_stream() {
        let raster = Raster::<Rgba8>::new_with(1, 2, |texel| {
            if texel.y == 0 {
                RgbaPixel { r: 9, g: 9, b: 9, a: 9 }
            } else {
                RgbaPixel { r: 1, g: 1, b: 1, a: 1 }
            }
        });
        let data = TgaImage::from_raster(&raster).unwrap().into_data();
        assert_eq!(decode_packets(&data), vec![bgra(1, 1, 1, 1), bgra(9, 9, 9, 9)]);
    }

    #[test]
    fn oversized_dimensions_are_rejected_before_encoding() {
        let raster = Raster::<Rgba8>::new_with(MAX_DIMENSION + 1, 1, |_| RgbaPixel::default());
        let err = TgaImage::from_raster(&raster).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionTooLarge { width: 65536, height: 1 }
        ));

        let raster = Raster::<Rgba8>::new_with(1, MAX_DIMENSION + 1, |_| RgbaPixel::default());
        let err = TgaImage::from_raster(&raster).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionTooLarge { width: 1, height: 65536 }
        ));
    }

    #[test]
    fn round_trip_over_a_mixed_buffer() {
        //deterministic mix of runs and literals, long enough to overflow
        //packet caps and span scanline boundaries
        let mut pixels = Vec::new();
        let mut state = 0x2545F491u32;
        while pixels.len() < 64 * 64 {
            state = state.wrapping_mul(747796405).wrapping_add(2891336453);
            let px = bgra(state as u8, (state >> 8) as u8, (state >> 16) as u8, 255);
            let repeat = (state >> 24) as usize % 7 + 1;
            for _ in 0..repeat {
                pixels.push(px);
            }
        }
        pixels.truncate(64 * 64);
        let data = TgaImage::new(64, 64, &pixels).into_data();
        assert_eq!(decode_packets(&data), pixels);
        assert_no_mergeable_runs(&data);
    }
}
