/// A single non-premultiplied RGBA pixel with 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Pixel {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel, `255` is fully opaque.
    pub alpha: u8,
}

impl Pixel {
    /// Creates a pixel from its four channels.
    #[inline]
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {red, green, blue, alpha}
    }
    /// Creates a pixel from `[red, green, blue, alpha]`.
    #[inline]
    #[must_use]
    pub const fn from_array(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
    /// Returns the pixel as `[red, green, blue, alpha]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
    /// The color cache slot of this pixel. Guaranteed to be `0..=63`.
    #[inline]
    #[must_use]
    pub const fn hash_index(self) -> u8 { // (r*3 + g*5 + b*7 + a*11) mod 256, then mod 64
        self.red.wrapping_mul(3)
            .wrapping_add(self.green.wrapping_mul(5))
            .wrapping_add(self.blue.wrapping_mul(7))
            .wrapping_add(self.alpha.wrapping_mul(11)) % 64
    }
    /// Red, green and blue differences from `old` to `self`, computed mod 256 then read as signed.
    #[allow(clippy::cast_possible_wrap)]
    #[inline]
    #[must_use]
    pub const fn delta(self, old: Self) -> (i8, i8, i8) {
        (self.red.wrapping_sub(old.red) as i8,
         self.green.wrapping_sub(old.green) as i8,
         self.blue.wrapping_sub(old.blue) as i8)
    }
    /// The (red, green, blue) deltas from `old` when each fits in `-2..=1` and alpha is unchanged.
    #[inline]
    #[must_use]
    pub const fn diff(self, old: Self) -> Option<(i8, i8, i8)> {
        if self.alpha != old.alpha {return None;}
        let (red, green, blue) = self.delta(old);
        if red < -2 || red > 1 || green < -2 || green > 1 || blue < -2 || blue > 1 {return None;}
        Some((red, green, blue))
    }
    /// The (green, red - green, blue - green) deltas from `old` when green fits in `-32..=31`,
    /// the others in `-8..=7` and alpha is unchanged.
    ///
    /// Red and blue relative to green also wrap.
    #[inline]
    #[must_use]
    pub const fn luma(self, old: Self) -> Option<(i8, i8, i8)> {
        if self.alpha != old.alpha {return None;}
        let (red, green, blue) = self.delta(old);
        let red_green = red.wrapping_sub(green);
        let blue_green = blue.wrapping_sub(green);
        if green < -32 || green > 31 {return None;}
        if red_green < -8 || red_green > 7 || blue_green < -8 || blue_green > 7 {return None;}
        Some((green, red_green, blue_green))
    }
    /// Adds signed rgb deltas with 8bit wraparound. Alpha is carried over.
    #[allow(clippy::cast_sign_loss)]
    #[inline]
    #[must_use]
    pub const fn offset(self, red: i8, green: i8, blue: i8) -> Self {
        Self::new(self.red.wrapping_add(red as u8),
                  self.green.wrapping_add(green as u8),
                  self.blue.wrapping_add(blue as u8),
                  self.alpha)
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(rgba: [u8; 4]) -> Self {
        Self::from_array(rgba)
    }
}

impl From<Pixel> for [u8; 4] {
    fn from(pixel: Pixel) -> Self {
        pixel.to_array()
    }
}
