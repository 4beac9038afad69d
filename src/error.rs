/// Where in a QOI stream an error happened.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Location {
    /// The `14` byte header.
    Header,
    /// The chunk producing the pixel at `x`, `y` of the raster.
    Chunk {
        /// Column of the first pixel the chunk produces.
        x: u32,
        /// Row of the first pixel the chunk produces.
        y: u32,
    },
    /// The `8` byte end marker.
    EndMarker,
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Chunk {x, y} => write!(f, "chunk starting at {{x: {x}, y: {y}}}"),
            Self::EndMarker => write!(f, "end marker"),
        }
    }
}

/// The possible errors when decoding or encoding QOI images.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, thiserror::Error)]
pub enum QoiError {
    /// The magic bytes of the header are not "qoif" ([`113`, `111`, `105`, `102`]). Shows the encountered values.
    #[error("Invalid magic bytes: {0:?}")]
    MalformedMagic([u8; 4]),
    /// The stream ended before the header, a chunk or the end marker was complete.
    #[error("Stream ended early while reading {0}")]
    TruncatedStream(Location),
    /// The `8` bytes after the last chunk are not [`0`, `0`, `0`, `0`, `0`, `0`, `0`, `1`]. Shows the detected bytes.
    #[error("Wrong bytes for end marker, detected: {0:?}")]
    BadEndMarker([u8; 8]),
    /// The width or height do not fit the header fields, or the raster does not fit in memory.
    #[error("Dimensions of {width}x{height} pixels are too large")]
    DimensionOverflow {
        /// Width in pixels.
        width: u64,
        /// Height in pixels.
        height: u64,
    },
    /// The header describes more pixels than the decoder was configured to accept.
    #[error("Image of {pixels} pixels exceeds the limit of {limit} pixels")]
    PixelLimitExceeded {
        /// Width multiplied by height.
        pixels: u64,
        /// The configured limit.
        limit: u64,
    },
    /// The channels value is not `3` (RGB) or `4` (RGBA). Shows the encountered value.
    #[error("Invalid channels value: {0}")]
    InvalidChannelsValue(u8),
    /// The input data is not divisible by specified channels. Shows total size of input data in bytes and specified channels.
    #[error("Malformed input: input data of {0} bytes detected which cannot represent {1} byte pixels")]
    IncorrectInputData(usize, u8),
    /// The specified width and height do not match the input pixel data. Shows specified width and height and actual pixel amount.
    #[error("Specified {0} width and {1} height but input contains {2} pixels")]
    InputHeaderMismatch(u64, u64, u64),
    /// The underlying reader or writer failed.
    #[error("I/O error in {location}")]
    Io {
        /// The part of the stream being read or written.
        location: Location,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl QoiError {
    // unexpected end of input is a truncated stream, anything else passes through with its location
    pub(crate) fn from_io(location: Location, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {Self::TruncatedStream(location)}
        else {Self::Io {location, source}}
    }
}
