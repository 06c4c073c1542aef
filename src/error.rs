// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The crate-level error enum.
//!
//! Every fallible operation in the pipeline surfaces one of these variants.
//! All are terminal: each is reported to stderr with the failing path or step
//! and the process exits with a failure code.

use std::path::PathBuf;

/// Any failure the conversion pipeline can surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file could not be read.
    #[error("cannot read input {path}: {source}")]
    InputNotFound {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The input stream does not begin with the PNG signature.
    #[error("input is not a valid PNG")]
    InputNotAPng,

    /// The PNG decoder rejected the stream.
    #[error("PNG decode failed: {0}")]
    Decode(#[from] png::DecodingError),

    /// The decoder's output buffer disagreed with its reported dimensions.
    #[error("unexpected PNG row format: expected {expected} bytes, got {actual}")]
    UnexpectedPixelLayout {
        /// Byte count implied by the reported dimensions.
        expected: usize,
        /// Byte count the decoder actually produced.
        actual: usize,
    },

    /// A pixel buffer could not be allocated.
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] std::collections::TryReserveError),

    /// A dimension exceeds what the 16-bit TGA header fields can hold.
    #[error("image dimension too large: {width}x{height} exceeds 65535")]
    DimensionTooLarge {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// The output file could not be created.
    #[error("cannot create output {path}: {source}")]
    OutputOpenFailed {
        /// Path that could not be opened for writing.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the output file failed partway.
    #[error("cannot write output {path}: {source}")]
    OutputWriteFailed {
        /// Path being written when the failure occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The binary was invoked with the wrong number of arguments.
    #[error("Usage: {program} <input.png> <output.tga>")]
    Usage {
        /// Program name (argv[0]).
        program: String,
    },
}
