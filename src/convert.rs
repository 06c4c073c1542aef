// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The one-shot file-to-file conversion pipeline.

use crate::error::Error;
use crate::pixel_formats::Rgba8;
use crate::raster::Raster;
use crate::targa::TgaImage;
use std::io::Write;
use std::path::Path;

/// Converts a PNG file into an RLE-compressed 32-bit Targa file.
///
/// One linear pass: decode and normalize the PNG, reorder rows and channels
/// for Targa, pack, write. There is no partial-success mode; if writing
/// fails partway, the incomplete output file is removed before the error
/// surfaces, so a truncated `.tga` is never left behind silently.
///
/// # Errors
///
/// Any [`Error`] except [`Error::Usage`]; each stage's failure aborts the
/// conversion at that point.
///
/// # Examples
///
/// ```no_run
/// # //this is no_run due to file IO
/// use std::path::Path;
///
/// tgapack::convert_png_to_tga(Path::new("shot.png"), Path::new("shot.tga"))?;
/// # Ok::<(), tgapack::Error>(())
/// ```
pub fn convert_png_to_tga(input: &Path, output: &Path) -> Result<(), Error> {
    let raster = Raster::<Rgba8>::from_png_path(input)?;
    logwise::info_sync!(
        "decoded {width}x{height} from {path}",
        width = raster.width(),
        height = raster.height(),
        path = logwise::privacy::LogIt(input)
    );

    let data = TgaImage::from_raster(&raster)?.into_data();

    let file = std::fs::File::create(output).map_err(|e| Error::OutputOpenFailed {
        path: output.to_owned(),
        source: e,
    })?;
    let mut writer = std::io::BufWriter::new(file);
    if let Err(e) = writer.write_all(&data).and_then(|()| writer.flush()) {
        drop(writer);
        logwise::warn_sync!(
            "removing partial output {path}",
            path = logwise::privacy::LogIt(output)
        );
        let _ = std::fs::remove_file(output);
        return Err(Error::OutputWriteFailed {
            path: output.to_owned(),
            source: e,
        });
    }
    logwise::info_sync!("wrote {bytes} bytes of RLE TGA", bytes = data.len());
    Ok(())
}
