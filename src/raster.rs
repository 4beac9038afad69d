use crate::{error::QoiError, pixel::Pixel};

/// The pixel layout of raw input data or of the channels header field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Channels {
    /// `3` byte pixels (red, green, blue).
    Rgb = 3,
    /// `4` byte pixels (red, green, blue, alpha).
    Rgba = 4,
}

impl Channels {
    /// Bytes per pixel.
    #[must_use]
    pub const fn bytes(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Channels {
    type Error = QoiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            _ => Err(QoiError::InvalidChannelsValue(value)),
        }
    }
}

impl From<Channels> for u8 {
    fn from(channels: Channels) -> Self {
        channels as u8
    }
}

/// Anything that can hand out non-premultiplied RGBA pixels in a rectangular grid.
///
/// The encoder walks `(0, 0)` to `(width - 1, height - 1)` row by row, calling [`PixelSource::pixel`] once per position.
pub trait PixelSource {
    /// Width in pixels.
    fn width(&self) -> usize;
    /// Height in pixels.
    fn height(&self) -> usize;
    /// The pixel at column `x` of row `y`. Only called with in bounds coordinates.
    fn pixel(&self, x: usize, y: usize) -> Pixel;
    /// The value written into the channels header field.
    fn channels(&self) -> Channels {
        Channels::Rgba
    }
}

/// An owned row-major grid of RGBA pixels, `4` bytes each.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Creates a raster filled with transparent black.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the amount of bytes needed does not fit in a [`usize`].
    pub fn new(width: u32, height: u32) -> Result<Self, QoiError> {
        let size = Self::byte_size(width, height)?;
        Ok(Self {width, height, data: vec![0; size]})
    }
    /// Wraps existing RGBA bytes.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, QoiError> {
        let size = Self::byte_size(width, height)?;
        if data.len() % 4 != 0 {return Err(QoiError::IncorrectInputData(data.len(), 4));}
        if data.len() != size {
            return Err(QoiError::InputHeaderMismatch(width.into(), height.into(), (data.len() / 4) as u64));
        }
        Ok(Self {width, height, data})
    }
    /// Builds a raster from a pixel for every position.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the amount of bytes needed does not fit in a [`usize`].
    pub fn from_fn<F: FnMut(u32, u32) -> Pixel>(width: u32, height: u32, mut f: F) -> Result<Self, QoiError> {
        let size = Self::byte_size(width, height)?;
        let mut data = Vec::with_capacity(size);
        for y in 0..height {
            for x in 0..width {data.extend_from_slice(&f(x, y).to_array());}
        }
        Ok(Self {width, height, data})
    }
    fn byte_size(width: u32, height: u32) -> Result<usize, QoiError> {
        usize::try_from(width).ok()
            .and_then(|w| usize::try_from(height).ok().and_then(|h| w.checked_mul(h)))
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or(QoiError::DimensionOverflow {width: width.into(), height: height.into()})
    }
    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }
    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
    /// The pixel at `x`, `y` or [`None`] if out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {return None;}
        let offset = self.offset(x as usize, y as usize);
        Some(Pixel::new(self.data[offset], self.data[offset + 1], self.data[offset + 2], self.data[offset + 3]))
    }
    /// Overwrites the pixel at `x`, `y`. Returns `false` if out of bounds.
    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) -> bool {
        if x >= self.width || y >= self.height {return false;}
        let offset = self.offset(x as usize, y as usize);
        self.data[offset..offset + 4].copy_from_slice(&pixel.to_array());
        true
    }
    /// Iterates every pixel in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data.chunks_exact(4).map(|rgba| Pixel::new(rgba[0], rgba[1], rgba[2], rgba[3]))
    }
    /// The RGBA bytes in row-major order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
    /// Consumes the raster and returns its RGBA bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * 4
    }
}

impl PixelSource for Raster {
    fn width(&self) -> usize {
        self.width as usize
    }
    fn height(&self) -> usize {
        self.height as usize
    }
    fn pixel(&self, x: usize, y: usize) -> Pixel {
        let offset = self.offset(x, y);
        Pixel::new(self.data[offset], self.data[offset + 1], self.data[offset + 2], self.data[offset + 3])
    }
}

/// Borrowed pixel bytes in `3` byte (RGB) or `4` byte (RGBA) layout.
///
/// `3` byte pixels are read as fully opaque.
#[derive(Clone, Copy, Debug)]
pub struct RawPixels<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: Channels,
}

impl<'a> RawPixels<'a> {
    /// Validates `data` against the specified dimensions and channels.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the following is true:
    ///
    /// 1: The channels value is not `3` (RGB) or `4` (RGBA).\
    /// 2: The amount of bytes in data are not divisible by the specified channels value.\
    /// 3: The specified width and height calculate to a different amount of pixels compared to the data.
    pub fn new(data: &'a [u8], width: usize, height: usize, channels: u8) -> Result<Self, QoiError> {
        let channels = Channels::try_from(channels)?;
        if data.len() % channels.bytes() != 0 {return Err(QoiError::IncorrectInputData(data.len(), channels.into()));}
        let actual_pixel_amount = data.len() / channels.bytes();
        if width.checked_mul(height) != Some(actual_pixel_amount) {
            return Err(QoiError::InputHeaderMismatch(width as u64, height as u64, actual_pixel_amount as u64));
        }
        Ok(Self {data, width, height, channels})
    }
}

impl PixelSource for RawPixels<'_> {
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn pixel(&self, x: usize, y: usize) -> Pixel {
        let offset = (y * self.width + x) * self.channels.bytes();
        let alpha = if self.channels == Channels::Rgba {self.data[offset + 3]} else {255};
        Pixel::new(self.data[offset], self.data[offset + 1], self.data[offset + 2], alpha)
    }
    fn channels(&self) -> Channels {
        self.channels
    }
}
