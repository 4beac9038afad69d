use crate::{pixel::Pixel, raster::PixelSource};

/// Row-major walk over a [`PixelSource`], one pixel at a time. Used by the encoder.
pub struct PixelCursor<'a, S: PixelSource + ?Sized> {
    source: &'a S,
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    current: Option<Pixel>, // None once every pixel has been consumed
}

impl<'a, S: PixelSource + ?Sized> PixelCursor<'a, S> {
    /// Starts at the top left pixel of `source`.
    pub fn new(source: &'a S) -> Self {
        let (width, height) = (source.width(), source.height());
        let current = if width == 0 || height == 0 {None} else {Some(source.pixel(0, 0))};
        Self {source, width, height, x: 0, y: 0, current}
    }
    /// The pixel under the cursor, [`None`] once every pixel has been consumed.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> Option<Pixel> {
        self.current
    }
    /// Column and row of the pixel under the cursor.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }
    /// Moves to the next pixel in row-major order. Does nothing past the end.
    #[inline]
    pub fn advance(&mut self) {
        if self.current.is_none() {return;}
        self.x += 1;
        if self.x == self.width {self.x = 0; self.y += 1;}
        self.current = if self.y < self.height {Some(self.source.pixel(self.x, self.y))} else {None};
    }
}

/// Fills RGBA bytes in row-major order, never past the end. Used by the decoder.
pub struct RasterWriter<'a> {
    data: &'a mut [u8],
    width: u32,
    index: usize,    // next pixel to write, always increments
    capacity: usize, // total pixels that fit in data
}

impl<'a> RasterWriter<'a> {
    pub fn new(data: &'a mut [u8], width: u32) -> Self {
        let capacity = data.len() / 4;
        Self {data, width, index: 0, capacity}
    }
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.index == self.capacity
    }
    #[inline]
    pub const fn written(&self) -> usize {
        self.index
    }
    // coordinates of the next pixel to be written
    #[allow(clippy::cast_possible_truncation)] // index < width * height and both are u32
    #[inline]
    pub const fn position(&self) -> (u32, u32) {
        if self.width == 0 {return (0, 0);}
        let width = self.width as usize;
        ((self.index % width) as u32, (self.index / width) as u32)
    }
    // writes pixel up to count times, stopping at the end of the raster. returns how many were written.
    pub fn put(&mut self, pixel: Pixel, count: usize) -> usize {
        let count = count.min(self.capacity - self.index);
        let rgba = pixel.to_array();
        let start = self.index * 4;
        for slot in self.data[start..start + count * 4].chunks_exact_mut(4) {slot.copy_from_slice(&rgba);}
        self.index += count;
        count
    }
}
