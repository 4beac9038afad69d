//! # A std::io QOI (Quite Okay Image) decoding and encoding library
//!
//! This crate converts between RGBA pixel data and QOI formatted byte streams in a single forward pass.
//!
//! This is a safe crate that uses [`std::io::Read`] and [`std::io::Write`] for its input and output.
//! Output is byte-for-byte reproducible: the same pixels always encode to the same bytes.
//!
//! ## Usage
//!
//! Encoding accepts anything implementing [`PixelSource`]: an owned [`Raster`], borrowed `3` or `4` byte
//! pixel data wrapped in [`RawPixels`], or your own image type.\
//! Decoding always produces a [`Raster`] of `4` byte pixels (red, green, blue, alpha).
//!
//! ### Decoding
//!
//! Be careful with the width and height values from the header when calculating the pixel amount.
//! The [QOI specification] states they are stored as unsigned 32bit integers in the header.
//! This makes the maximum size of a QOI image in pixels [`u32::MAX`] multiplied by [`u32::MAX`].
//! Use [`QoiDecoder::with_pixel_limit`] when decoding untrusted input.
//!
//! ```no_run
//! # fn main() -> Result<(), io_qoi::QoiError> {
//! let file = std::fs::File::open("image.qoi").map_err(|source| io_qoi::QoiError::Io {
//!     location: io_qoi::Location::Header,
//!     source,
//! })?;
//! let decoder = io_qoi::QoiDecoder::new(file)?.with_pixel_limit(8192 * 8192);
//! let header = decoder.header(); // dimensions are known before any pixel is decoded
//! let raster = decoder.decode()?;
//! assert_eq!(raster.width(), header.width());
//! // raster.as_bytes() is now filled with 4 byte pixel (RGBA) values
//! # Ok(())
//! # }
//! ```
//!
//! ### Encoding
//!
//! ```
//! # fn main() -> Result<(), io_qoi::QoiError> {
//! let input = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]; // 2x2 pixels, 3 bytes each
//! let pixels = io_qoi::RawPixels::new(&input, 2, 2, 3)?;
//! let output = io_qoi::encode_to_vec(&pixels)?;
//! // output is now a valid QOI image ready to be written to a file
//! let raster = io_qoi::decode_from_slice(&output)?;
//! assert_eq!(raster.get(1, 1), Some(io_qoi::Pixel::new(255, 255, 255, 255)));
//! # Ok(())
//! # }
//! ```
//!
//! [QOI specification]: <https://qoiformat.org/qoi-specification.pdf>
#![forbid(unsafe_code)]

mod cache;
mod chunk;
mod consts;
mod cursor;
mod decoder;
mod encoder;
mod error;
mod header;
mod pixel;
mod raster;

pub use crate::cache::ColorCache;
pub use crate::chunk::{Chunk, CodecState};
pub use crate::consts::{END_MARKER, MAGIC_BYTES};
pub use crate::cursor::PixelCursor;
pub use crate::decoder::{decode, decode_from_slice, decode_header, QoiDecoder};
pub use crate::encoder::{encode, encode_to_vec, QoiEncoder};
pub use crate::error::{Location, QoiError};
pub use crate::header::QoiHeader;
pub use crate::pixel::Pixel;
pub use crate::raster::{Channels, PixelSource, Raster, RawPixels};
