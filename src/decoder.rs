use std::io::{BufReader, Read};

use crate::{
    chunk::{Chunk, CodecState},
    consts::END_MARKER,
    cursor::RasterWriter,
    error::{Location, QoiError},
    header::QoiHeader,
    raster::Raster,
};

/// Reads just the `14` byte header, leaving the rest of `reader` untouched.
///
/// Useful to learn the dimensions of an image before committing to decode it.
///
/// # Errors
///
/// Will return `Err` if fewer than `14` bytes are available, the reader fails or the magic bytes are not "qoif".
pub fn decode_header<R: Read>(mut reader: R) -> Result<QoiHeader, QoiError> {
    QoiHeader::read_from(&mut reader)
}

/// A decoder for the QOI image format.
///
/// Creating one reads the header, [`QoiDecoder::decode`] then reads every chunk and the end marker.
#[allow(clippy::module_name_repetitions)]
pub struct QoiDecoder<R: Read> {
    reader: BufReader<R>,
    header: QoiHeader,
    pixel_limit: Option<u64>,
}

impl<R: Read> QoiDecoder<R> {
    /// Reads and validates the header from `reader`.
    ///
    /// Only the magic bytes are validated. The channels and colorspace values are informative.
    ///
    /// # Errors
    ///
    /// Will return `Err` if fewer than `14` bytes are available, the reader fails or the magic bytes are not "qoif".
    pub fn new(reader: R) -> Result<Self, QoiError> {
        let mut reader = BufReader::new(reader);
        let header = QoiHeader::read_from(&mut reader)?;
        log::debug!("read header: {}x{}, {} channels, colorspace {}",
                    header.width(), header.height(), header.channels(), header.colorspace());
        Ok(Self {reader, header, pixel_limit: None})
    }
    /// Refuses to decode images with more than `limit` pixels. Checked before any pixel memory is allocated.
    #[must_use]
    pub const fn with_pixel_limit(mut self, limit: u64) -> Self {
        self.pixel_limit = Some(limit);
        self
    }
    /// The header read from the stream.
    #[must_use]
    pub const fn header(&self) -> QoiHeader {
        self.header
    }
    /// Decodes every chunk into a [`Raster`] and verifies the end marker.
    ///
    /// A run chunk longer than the pixels left in the raster is cut short rather than treated as an error.
    ///
    /// The whole raster (`width * height * 4` bytes) is allocated from the header before any chunk is read.
    /// Without [`QoiDecoder::with_pixel_limit`] a header alone can request gigabytes.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the following is true:
    ///
    /// 1: The image exceeds the configured pixel limit or does not fit in memory.\
    /// 2: The stream ends inside a chunk or the end marker. The error carries the position being decoded.\
    /// 3: The end marker contains incorrect bytes. Correct end marker bytes are [`0`, `0`, `0`, `0`, `0`, `0`, `0`, `1`].\
    /// 4: The reader fails.
    pub fn decode(mut self) -> Result<Raster, QoiError> {
        let (width, height) = (self.header.width(), self.header.height());
        if let Some(limit) = self.pixel_limit {
            let pixels = self.header.pixel_amount();
            if pixels > limit {return Err(QoiError::PixelLimitExceeded {pixels, limit});}
        }
        let mut raster = Raster::new(width, height)?;
        let mut writer = RasterWriter::new(raster.bytes_mut(), width);
        let mut state = CodecState::new();
        let mut chunks = 0_u64;
        while !writer.is_full() {
            let (x, y) = writer.position();
            let chunk = Chunk::read_from(&mut self.reader).map_err(|e| QoiError::from_io(Location::Chunk {x, y}, e))?;
            let (pixel, count) = state.apply(chunk);
            let written = writer.put(pixel, count);
            if written < count {log::trace!("run of {count} at {{x: {x}, y: {y}}} clipped to {written} pixels");}
            chunks += 1;
        }
        let mut end = [0; 8];
        self.reader.read_exact(&mut end).map_err(|e| QoiError::from_io(Location::EndMarker, e))?;
        if end != END_MARKER {return Err(QoiError::BadEndMarker(end));}
        log::debug!("decoded {width}x{height} image from {chunks} chunks");
        Ok(raster)
    }
}

/// Decodes a complete QOI image from `reader`.
///
/// No pixel limit is applied, see [`QoiDecoder::with_pixel_limit`] for untrusted input.
///
/// # Errors
///
/// See [`QoiDecoder::new`] and [`QoiDecoder::decode`].
pub fn decode<R: Read>(reader: R) -> Result<Raster, QoiError> {
    QoiDecoder::new(reader)?.decode()
}

/// Decodes a complete QOI image held in memory.
///
/// No pixel limit is applied, see [`QoiDecoder::with_pixel_limit`] for untrusted input.
///
/// # Errors
///
/// See [`QoiDecoder::new`] and [`QoiDecoder::decode`].
pub fn decode_from_slice(input: &[u8]) -> Result<Raster, QoiError> {
    decode(input)
}
