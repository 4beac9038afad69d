use crate::{consts::ZERO_PIXEL, pixel::Pixel};

/// The 64 slot memory of recently seen pixels.
///
/// Slots are addressed by [`Pixel::hash_index`]. Every slot starts as the zero pixel (all channels `0`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColorCache {
    slots: [Pixel; 64],
}

impl ColorCache {
    /// Creates a cache with every slot set to the zero pixel.
    #[must_use]
    pub const fn new() -> Self {
        Self {slots: [ZERO_PIXEL; 64]}
    }
    /// Overwrites the slot for `pixel` regardless of what it held.
    #[inline]
    pub fn insert(&mut self, pixel: Pixel) {
        self.slots[pixel.hash_index() as usize] = pixel;
    }
    /// Returns the slot index of `pixel` only if that slot holds exactly `pixel`.
    ///
    /// A different pixel with the same hash is a miss.
    #[inline]
    #[must_use]
    pub fn lookup(&self, pixel: Pixel) -> Option<u8> {
        let index = pixel.hash_index();
        (self.slots[index as usize] == pixel).then_some(index)
    }
    /// Returns the pixel stored in slot `index`. Only the low 6 bits of `index` are used.
    #[inline]
    #[must_use]
    pub const fn get(&self, index: u8) -> Pixel {
        self.slots[(index & 0x3f) as usize]
    }
}

impl Default for ColorCache {
    fn default() -> Self {
        Self::new()
    }
}
