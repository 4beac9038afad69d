use std::io::{Read, Write};

use crate::{
    consts::{HEADER_SIZE, MAGIC_BYTES},
    error::{Location, QoiError},
};

/// The header data of a QOI image.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct QoiHeader {
    width: u32,
    height: u32,
    channels: u8,
    colorspace: u8,
}

impl QoiHeader {
    /// Creates a header. The magic bytes are always "qoif".
    #[must_use]
    pub const fn new(width: u32, height: u32, channels: u8, colorspace: u8) -> Self {
        Self {width, height, channels, colorspace}
    }
    /// The magic bytes of a QOI image. They are always "qoif" ([`113`, `111`, `105`, `102`]).
    #[must_use]
    pub const fn magic_bytes(&self) -> [u8; 4] {
        MAGIC_BYTES
    }
    /// The width of a QOI image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }
    /// The height of a QOI image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
    /// The channels of a QOI image: `3` (RGB) or `4` (RGBA).
    ///
    /// Purely informative, decoding always produces `4` byte pixels.
    #[must_use]
    pub const fn channels(&self) -> u8 {
        self.channels
    }
    /// The colorspace byte of a QOI image. The encoder always writes `0`.
    #[must_use]
    pub const fn colorspace(&self) -> u8 {
        self.colorspace
    }
    /// Width multiplied by height. Cannot overflow a [`u64`].
    #[must_use]
    pub const fn pixel_amount(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
    /// Convert the header to its `14` byte wire form.
    #[must_use]
    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut output = [0; HEADER_SIZE];
        output[0..4].copy_from_slice(&MAGIC_BYTES);
        output[4..8].copy_from_slice(&self.width.to_be_bytes());
        output[8..12].copy_from_slice(&self.height.to_be_bytes());
        output[12] = self.channels;
        output[13] = self.colorspace;
        output
    }
    /// Parses the `14` byte wire form.
    ///
    /// Only the magic bytes are validated, channels and colorspace are kept as found.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the magic bytes are not "qoif".
    pub fn from_bytes(input: &[u8; HEADER_SIZE]) -> Result<Self, QoiError> {
        let magic = [input[0], input[1], input[2], input[3]];
        if magic != MAGIC_BYTES {return Err(QoiError::MalformedMagic(magic));}
        let width = u32::from_be_bytes([input[4], input[5], input[6], input[7]]);
        let height = u32::from_be_bytes([input[8], input[9], input[10], input[11]]);
        Ok(Self {width, height, channels: input[12], colorspace: input[13]})
    }
    /// Reads exactly `14` bytes from `reader` and parses them.
    ///
    /// # Errors
    ///
    /// Will return `Err` if fewer than `14` bytes are available, the reader fails or the magic bytes are wrong.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self, QoiError> {
        let mut input = [0; HEADER_SIZE];
        reader.read_exact(&mut input).map_err(|e| QoiError::from_io(Location::Header, e))?;
        Self::from_bytes(&input)
    }
    /// Writes the `14` byte wire form to `writer`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the writer fails.
    pub fn write_to<W: Write + ?Sized>(self, writer: &mut W) -> Result<(), QoiError> {
        writer.write_all(&self.to_bytes()).map_err(|e| QoiError::from_io(Location::Header, e))
    }
}
