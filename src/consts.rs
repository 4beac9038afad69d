use crate::pixel::Pixel;

pub const MAGIC_BYTES: [u8; 4] = [b'q', b'o', b'i', b'f'];
pub const END_MARKER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];
pub const HEADER_SIZE: usize = 14;
pub const DEFAULT_PIXEL: Pixel = Pixel::new(0, 0, 0, 255); // previous pixel before the first chunk
pub const ZERO_PIXEL: Pixel = Pixel::new(0, 0, 0, 0);      // every color cache slot starts as this
pub const MAX_RUN: u8 = 62;                                // 6bit run field with a bias of -1, 63/64 clash with RGB/RGBA tags

// chunk tags, 8bit tags are checked before the 2bit ones
pub const TAG_INDEX: u8 = 0b0000_0000;
pub const TAG_DIFF: u8 = 0b0100_0000;
pub const TAG_LUMA: u8 = 0b1000_0000;
pub const TAG_RUN: u8 = 0b1100_0000;
pub const TAG_RGB: u8 = 0b1111_1110;
pub const TAG_RGBA: u8 = 0b1111_1111;
pub const TAG_MASK: u8 = 0b1100_0000;
