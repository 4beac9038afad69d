use std::io::{BufWriter, Write};

use crate::{
    chunk::{Chunk, CodecState},
    consts::{END_MARKER, HEADER_SIZE},
    cursor::PixelCursor,
    error::{Location, QoiError},
    header::QoiHeader,
    raster::PixelSource,
};

/// An encoder for the QOI image format.
///
/// To generate a [`QoiEncoder`] and retrieve a [`QoiHeader`] you provide anything implementing [`PixelSource`].\
/// Calling [`QoiEncoder::encode`] writes the header, every chunk and the end marker to a writer in one pass.
#[allow(clippy::module_name_repetitions)]
pub struct QoiEncoder<'a, S: PixelSource + ?Sized> {
    source: &'a S,
    header: QoiHeader,
}

impl<'a, S: PixelSource + ?Sized> QoiEncoder<'a, S> {
    /// Generates a [`QoiEncoder`] for `source`.
    ///
    /// The header takes its channels value from [`PixelSource::channels`] and a colorspace of `0`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the width or height of `source` do not fit in a [`u32`].
    pub fn new(source: &'a S) -> Result<Self, QoiError> {
        let (width, height) = (source.width(), source.height());
        let overflow = || QoiError::DimensionOverflow {width: width as u64, height: height as u64};
        let header = QoiHeader::new(u32::try_from(width).map_err(|_| overflow())?,
                                    u32::try_from(height).map_err(|_| overflow())?,
                                    source.channels().into(),
                                    0);
        Ok(Self {source, header})
    }
    /// The header that [`QoiEncoder::encode`] will write.
    #[must_use]
    pub const fn header(&self) -> QoiHeader {
        self.header
    }
    /// Encodes every pixel and writes the complete QOI image to `writer`. Returns the amount of bytes written.
    ///
    /// Writes are buffered internally and flushed before returning.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the writer fails. The error carries the part of the image being written.
    pub fn encode<W: Write>(&self, writer: W) -> Result<u64, QoiError> {
        let mut writer = BufWriter::new(writer);
        self.header.write_to(&mut writer)?;
        let mut written = HEADER_SIZE as u64;
        let mut chunks = 0_u64;
        let mut cursor = PixelCursor::new(self.source);
        let mut state = CodecState::new();
        loop {
            let (x, y) = cursor.position();
            let Some(chunk) = Chunk::select(&mut cursor, &state) else {break};
            chunk.write_to(&mut writer).map_err(|e| QoiError::from_io(chunk_location(x, y), e))?;
            state.apply(chunk);
            written += chunk.encoded_len() as u64;
            chunks += 1;
        }
        writer.write_all(&END_MARKER).map_err(|e| QoiError::from_io(Location::EndMarker, e))?;
        writer.flush().map_err(|e| QoiError::from_io(Location::EndMarker, e))?;
        written += END_MARKER.len() as u64;
        log::debug!("encoded {}x{} image into {chunks} chunks, {written} bytes",
                    self.header.width(), self.header.height());
        Ok(written)
    }
}

#[allow(clippy::cast_possible_truncation)] // cursor positions are below the u32 width and height checked in new
fn chunk_location(x: usize, y: usize) -> Location {
    Location::Chunk {x: x as u32, y: y as u32}
}

/// Encodes `source` as a complete QOI image into `writer`.
///
/// # Errors
///
/// See [`QoiEncoder::new`] and [`QoiEncoder::encode`].
pub fn encode<W: Write, S: PixelSource + ?Sized>(writer: W, source: &S) -> Result<(), QoiError> {
    QoiEncoder::new(source)?.encode(writer).map(|_| ())
}

/// Encodes `source` as a complete QOI image into a new [`Vec`].
///
/// # Errors
///
/// Will return `Err` if the width or height of `source` do not fit in a [`u32`].
pub fn encode_to_vec<S: PixelSource + ?Sized>(source: &S) -> Result<Vec<u8>, QoiError> {
    let encoder = QoiEncoder::new(source)?;
    let mut output = Vec::with_capacity(HEADER_SIZE + END_MARKER.len());
    encoder.encode(&mut output)?;
    Ok(output)
}
