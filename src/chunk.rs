use std::io::{self, Read, Write};

use crate::{
    cache::ColorCache,
    consts::{DEFAULT_PIXEL, MAX_RUN, TAG_DIFF, TAG_INDEX, TAG_LUMA, TAG_MASK, TAG_RGB, TAG_RGBA, TAG_RUN},
    cursor::PixelCursor,
    pixel::Pixel,
    raster::PixelSource,
};

/// One unit of a QOI data stream, producing one or more pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Chunk {
    /// Repeats the previous pixel `1..=62` times.
    Run(u8),
    /// The pixel stored in color cache slot `0..=63`.
    Index(u8),
    /// Small rgb differences from the previous pixel, each `-2..=1`.
    Diff {red: i8, green: i8, blue: i8},
    /// Green difference `-32..=31`, red and blue differences relative to green each `-8..=7`.
    Luma {green: i8, red_green: i8, blue_green: i8},
    /// New rgb values, alpha of the previous pixel.
    Rgb {red: u8, green: u8, blue: u8},
    /// A complete new pixel.
    Rgba(Pixel),
}

impl Chunk {
    /// Picks the smallest chunk for the pixels at the cursor and advances past the pixels it covers.
    ///
    /// Candidates are tried in a fixed order: run, index, diff, luma, rgb and finally rgba.
    /// Returns [`None`] once the cursor has no pixels left.
    pub fn select<S: PixelSource + ?Sized>(cursor: &mut PixelCursor<'_, S>, state: &CodecState) -> Option<Self> {
        let pixel = cursor.current()?;
        let previous = state.previous;
        if pixel == previous {
            let mut run = 0;
            while cursor.current() == Some(previous) && run < MAX_RUN {
                run += 1;
                cursor.advance();
            }
            return Some(Self::Run(run));
        }
        cursor.advance();
        let chunk = if let Some(index) = state.cache.lookup(pixel) {
            Self::Index(index)
        } else if let Some((red, green, blue)) = pixel.diff(previous) {
            Self::Diff {red, green, blue}
        } else if let Some((green, red_green, blue_green)) = pixel.luma(previous) {
            Self::Luma {green, red_green, blue_green}
        } else if pixel.alpha == previous.alpha {
            Self::Rgb {red: pixel.red, green: pixel.green, blue: pixel.blue}
        } else {
            Self::Rgba(pixel)
        };
        Some(chunk)
    }
    /// Encoded size in bytes.
    #[must_use]
    pub const fn encoded_len(self) -> usize {
        match self {
            Self::Run(_) | Self::Index(_) | Self::Diff {..} => 1,
            Self::Luma {..} => 2,
            Self::Rgb {..} => 4,
            Self::Rgba(_) => 5,
        }
    }
    /// How many pixels the chunk produces.
    #[must_use]
    pub const fn pixel_count(self) -> usize {
        if let Self::Run(run) = self {run as usize} else {1}
    }
    /// The wire form of the chunk. Only the first [`Chunk::encoded_len`] bytes are meaningful.
    ///
    /// Fields are cut to the width of their bit field so the tag is never altered.
    /// A run length outside `1..=62` is clamped into that range.
    #[allow(clippy::cast_sign_loss)]
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 5] {
        match self {
            Self::Run(run) => {                                            // QOI_OP_RUN: 2bit tag (11), 6bit run, bias -1
                let run = if run == 0 {1} else if run > MAX_RUN {MAX_RUN} else {run};
                [TAG_RUN | (run - 1), 0, 0, 0, 0]
            },
            Self::Index(index) => [TAG_INDEX | (index & 0x3f), 0, 0, 0, 0], // QOI_OP_INDEX: 2bit tag (00), 6bit index
            Self::Diff {red, green, blue} => {                             // QOI_OP_DIFF: 2bit tag (01), 3x2bit diffs, bias 2
                let red = (red as u8).wrapping_add(2) & 0x03;
                let green = (green as u8).wrapping_add(2) & 0x03;
                let blue = (blue as u8).wrapping_add(2) & 0x03;
                [TAG_DIFF | red << 4 | green << 2 | blue, 0, 0, 0, 0]
            },
            Self::Luma {green, red_green, blue_green} => {                 // QOI_OP_LUMA: 2bit tag (10), 6bit green, bias 32
                let green = (green as u8).wrapping_add(32) & 0x3f;
                let red_green = (red_green as u8).wrapping_add(8) & 0x0f;
                let blue_green = (blue_green as u8).wrapping_add(8) & 0x0f;
                [TAG_LUMA | green, red_green << 4 | blue_green, 0, 0, 0]   // 4bit red, 4bit blue, bias 8
            },
            Self::Rgb {red, green, blue} => [TAG_RGB, red, green, blue, 0],
            Self::Rgba(pixel) => [TAG_RGBA, pixel.red, pixel.green, pixel.blue, pixel.alpha],
        }
    }
    /// Classifies a chunk from its first byte and decodes it from the bytes that follow.
    ///
    /// Only the first [`Chunk::payload_len`] bytes of `payload` are read for `tag`.
    #[allow(clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn from_bytes(tag: u8, payload: &[u8; 4]) -> Self {
        match tag {
            TAG_RGBA => Self::Rgba(Pixel::new(payload[0], payload[1], payload[2], payload[3])),
            TAG_RGB => Self::Rgb {red: payload[0], green: payload[1], blue: payload[2]},
            _ => match tag & TAG_MASK {
                TAG_RUN => Self::Run((tag & 0x3f) + 1),
                TAG_LUMA => Self::Luma {green: (tag & 0x3f) as i8 - 32,
                                        red_green: (payload[0] >> 4) as i8 - 8,
                                        blue_green: (payload[0] & 0x0f) as i8 - 8},
                TAG_DIFF => Self::Diff {red: ((tag >> 4) & 0x03) as i8 - 2,
                                        green: ((tag >> 2) & 0x03) as i8 - 2,
                                        blue: (tag & 0x03) as i8 - 2},
                _ => Self::Index(tag & 0x3f),
            },
        }
    }
    /// Bytes that follow a tag byte.
    #[must_use]
    pub const fn payload_len(tag: u8) -> usize {
        match tag {
            TAG_RGBA => 4,
            TAG_RGB => 3,
            _ if tag & TAG_MASK == TAG_LUMA => 1,
            _ => 0,
        }
    }
    /// Reads one chunk, consuming exactly its encoded bytes.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the reader fails or ends inside the chunk.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut tag = [0];
        reader.read_exact(&mut tag)?;
        let mut payload = [0; 4];
        reader.read_exact(&mut payload[..Self::payload_len(tag[0])])?;
        Ok(Self::from_bytes(tag[0], &payload))
    }
    /// Writes the encoded bytes of the chunk.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the writer fails.
    pub fn write_to<W: Write + ?Sized>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes()[..self.encoded_len()])
    }
}

/// The state every chunk depends on: the color cache and the last produced pixel.
///
/// Lives for one encode or decode pass.
#[derive(Clone, Debug)]
pub struct CodecState {
    /// Every pixel produced so far, by hash slot.
    pub cache: ColorCache,
    /// The last pixel produced. Starts as opaque black.
    pub previous: Pixel,
}

impl CodecState {
    /// An empty cache and an opaque black previous pixel.
    #[must_use]
    pub const fn new() -> Self {
        Self {cache: ColorCache::new(), previous: DEFAULT_PIXEL}
    }
    /// Computes the pixel `chunk` produces and how many times, then records it as seen.
    pub fn apply(&mut self, chunk: Chunk) -> (Pixel, usize) {
        let previous = self.previous;
        let pixel = match chunk {
            Chunk::Run(_) => previous,
            Chunk::Index(index) => self.cache.get(index),
            Chunk::Diff {red, green, blue} => previous.offset(red, green, blue),
            Chunk::Luma {green, red_green, blue_green} => {
                previous.offset(green.wrapping_add(red_green), green, green.wrapping_add(blue_green))
            },
            Chunk::Rgb {red, green, blue} => Pixel::new(red, green, blue, previous.alpha),
            Chunk::Rgba(pixel) => pixel,
        };
        self.cache.insert(pixel);
        self.previous = pixel;
        (pixel, chunk.pixel_count())
    }
}

impl Default for CodecState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{consts::DEFAULT_PIXEL, cursor::PixelCursor, pixel::Pixel, raster::Raster};
    use super::{Chunk, CodecState};

    fn select_all(pixels: &[Pixel]) -> Vec<Chunk> {
        let raster = Raster::from_fn(pixels.len() as u32, 1, |x, _| pixels[x as usize]).unwrap();
        let mut cursor = PixelCursor::new(&raster);
        let mut state = CodecState::new();
        let mut chunks = Vec::new();
        while let Some(chunk) = Chunk::select(&mut cursor, &state) {
            state.apply(chunk);
            chunks.push(chunk);
        }
        chunks
    }

    #[test]
    fn infallible_to_bytes() {
        assert!(Chunk::Run(1).to_bytes()[0] == 192);
        assert!(Chunk::Run(62).to_bytes()[0] == 253);
        assert!(Chunk::Index(53).to_bytes()[0] == 53);
        assert!(Chunk::Diff {red: -1, green: -1, blue: -1}.to_bytes()[0] == 85);
        assert!(Chunk::Diff {red: -2, green: -2, blue: -2}.to_bytes()[0] == 64);
        assert!(Chunk::Diff {red: 1, green: 1, blue: 1}.to_bytes()[0] == 127);
        assert!(Chunk::Luma {green: 2, red_green: -2, blue_green: -2}.to_bytes()[..2] == [162, 102]);
        assert!(Chunk::Luma {green: 30, red_green: -4, blue_green: -1}.to_bytes()[..2] == [190, 71]);
        assert!(Chunk::Rgb {red: 128, green: 128, blue: 128}.to_bytes()[..4] == [254, 128, 128, 128]);
        assert!(Chunk::Rgba(Pixel::new(0, 0, 0, 222)).to_bytes() == [255, 0, 0, 0, 222]);
    }
    #[test]
    fn infallible_to_bytes_keeps_tag_for_out_of_range_fields() {
        assert!(Chunk::Run(0).to_bytes()[0] == 192);                // clamped to a run of 1
        assert!(Chunk::Run(63).to_bytes()[0] == 253);               // clamped to a run of 62, not the rgb tag
        assert!(Chunk::Run(255).to_bytes()[0] == 253);
        assert!(Chunk::Index(64).to_bytes()[0] == 0);               // not the diff tag
        assert!(Chunk::Index(255).to_bytes()[0] == 63);
        let diff = Chunk::Diff {red: 127, green: -128, blue: 2}.to_bytes()[0];
        assert!(diff & 0xc0 == 0x40);
        let luma = Chunk::Luma {green: 127, red_green: -128, blue_green: 100}.to_bytes();
        assert!(luma[0] & 0xc0 == 0x80);
        for chunk in [Chunk::Run(63), Chunk::Index(64), Chunk::Diff {red: 127, green: 127, blue: 127},
                      Chunk::Luma {green: -128, red_green: 127, blue_green: -128}] {
            let mut output = Vec::new();
            assert!(chunk.write_to(&mut output).is_ok());
            assert!(output.len() == chunk.encoded_len());
            let read = Chunk::read_from(&mut &output[..]);
            assert!(matches!((chunk, read), (Chunk::Run(_), Ok(Chunk::Run(_)))
                                          | (Chunk::Index(_), Ok(Chunk::Index(_)))
                                          | (Chunk::Diff {..}, Ok(Chunk::Diff {..}))
                                          | (Chunk::Luma {..}, Ok(Chunk::Luma {..}))));
        }
    }
    #[test]
    fn infallible_len() {
        assert!(Chunk::Run(5).encoded_len() == 1);
        assert!(Chunk::Index(5).encoded_len() == 1);
        assert!(Chunk::Diff {red: 0, green: 0, blue: 0}.encoded_len() == 1);
        assert!(Chunk::Luma {green: 0, red_green: 0, blue_green: 0}.encoded_len() == 2);
        assert!(Chunk::Rgb {red: 0, green: 0, blue: 0}.encoded_len() == 4);
        assert!(Chunk::Rgba(DEFAULT_PIXEL).encoded_len() == 5);
        assert!(Chunk::Run(5).pixel_count() == 5);
        assert!(Chunk::Rgba(DEFAULT_PIXEL).pixel_count() == 1);
    }
    #[test]
    fn infallible_from_bytes() {
        assert!(Chunk::from_bytes(192, &[0; 4]) == Chunk::Run(1));
        assert!(Chunk::from_bytes(253, &[0; 4]) == Chunk::Run(62));
        assert!(Chunk::from_bytes(10, &[0; 4]) == Chunk::Index(10));
        assert!(Chunk::from_bytes(91, &[0; 4]) == Chunk::Diff {red: -1, green: 0, blue: 1});
        assert!(Chunk::from_bytes(162, &[102, 0, 0, 0]) == Chunk::Luma {green: 2, red_green: -2, blue_green: -2});
        assert!(Chunk::from_bytes(128, &[0; 4]) == Chunk::Luma {green: -32, red_green: -8, blue_green: -8});
        assert!(Chunk::from_bytes(254, &[1, 2, 3, 0]) == Chunk::Rgb {red: 1, green: 2, blue: 3});
        assert!(Chunk::from_bytes(255, &[1, 2, 3, 4]) == Chunk::Rgba(Pixel::new(1, 2, 3, 4)));
    }
    #[test]
    fn infallible_payload_len() {
        assert!(Chunk::payload_len(255) == 4);
        assert!(Chunk::payload_len(254) == 3);
        assert!(Chunk::payload_len(253) == 0); // longest run, not rgb
        assert!(Chunk::payload_len(191) == 1);
        assert!(Chunk::payload_len(128) == 1);
        assert!(Chunk::payload_len(127) == 0);
        assert!(Chunk::payload_len(0) == 0);
    }
    #[test]
    fn good_read_from() {
        let input = [255, 1, 2, 3, 4, 162, 102, 192];
        let mut reader = &input[..];
        assert!(Chunk::read_from(&mut reader).ok() == Some(Chunk::Rgba(Pixel::new(1, 2, 3, 4))));
        assert!(Chunk::read_from(&mut reader).ok() == Some(Chunk::Luma {green: 2, red_green: -2, blue_green: -2}));
        assert!(Chunk::read_from(&mut reader).ok() == Some(Chunk::Run(1)));
        assert!(reader.is_empty());
    }
    #[test]
    fn bad_read_from_truncated() {
        let input = [255, 1, 2];
        let err = Chunk::read_from(&mut &input[..]);
        assert!(matches!(err, Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
        let err = Chunk::read_from(&mut &[0u8; 0][..]);
        assert!(matches!(err, Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    }
    #[test]
    fn good_write_to() {
        let mut output = Vec::new();
        assert!(Chunk::Luma {green: 2, red_green: -2, blue_green: -2}.write_to(&mut output).is_ok());
        assert!(Chunk::Index(3).write_to(&mut output).is_ok());
        assert!(output == [162, 102, 3]);
    }
    #[test]
    fn good_apply() {
        let mut state = CodecState::new();
        assert!(state.apply(Chunk::Run(3)) == (DEFAULT_PIXEL, 3));
        assert!(state.cache.lookup(DEFAULT_PIXEL) == Some(53));
        assert!(state.apply(Chunk::Diff {red: -1, green: -1, blue: -1}) == (Pixel::new(255, 255, 255, 255), 1));
        assert!(state.apply(Chunk::Luma {green: 2, red_green: -2, blue_green: -2}) == (Pixel::new(255, 1, 255, 255), 1));
        assert!(state.apply(Chunk::Rgba(Pixel::new(9, 9, 9, 9))) == (Pixel::new(9, 9, 9, 9), 1));
        assert!(state.apply(Chunk::Rgb {red: 1, green: 2, blue: 3}) == (Pixel::new(1, 2, 3, 9), 1));
        assert!(state.apply(Chunk::Index(53)) == (DEFAULT_PIXEL, 1));
        assert!(state.previous == DEFAULT_PIXEL);
    }
    #[test]
    fn good_select_priority_order() {
        let chunks = select_all(&[Pixel::new(0, 0, 0, 255),      // same as starting previous pixel
                                  Pixel::new(0, 0, 0, 222),      // alpha changed
                                  Pixel::new(0, 0, 0, 222),
                                  Pixel::new(0, 0, 0, 222),
                                  Pixel::new(0, 0, 0, 255),      // seen before
                                  Pixel::new(0, 0, 0, 222),      // seen before
                                  Pixel::new(0, 0, 0, 222),
                                  Pixel::new(0, 2, 0, 222),      // green +2
                                  Pixel::new(128, 128, 128, 222),
                                  Pixel::new(129, 127, 128, 222)]);
        assert!(chunks == [Chunk::Run(1),
                           Chunk::Rgba(Pixel::new(0, 0, 0, 222)),
                           Chunk::Run(2),
                           Chunk::Index(53),
                           Chunk::Index(10),
                           Chunk::Run(1),
                           Chunk::Luma {green: 2, red_green: -2, blue_green: -2},
                           Chunk::Rgb {red: 128, green: 128, blue: 128},
                           Chunk::Diff {red: 1, green: -1, blue: 0}]);
    }
    #[test]
    fn good_select_zero_pixel_is_index() {
        let chunks = select_all(&[Pixel::new(0, 0, 0, 0)]);
        assert!(chunks == [Chunk::Index(0)]);
    }
    #[test]
    fn good_select_splits_long_runs() {
        let chunks = select_all(&[DEFAULT_PIXEL; 63]);
        assert!(chunks == [Chunk::Run(62), Chunk::Run(1)]);
        let chunks = select_all(&[DEFAULT_PIXEL; 124]);
        assert!(chunks == [Chunk::Run(62), Chunk::Run(62)]);
    }
    #[test]
    fn good_select_run_beats_index() {
        let red = Pixel::new(200, 0, 0, 255);
        let chunks = select_all(&[red, red]);
        assert!(chunks == [Chunk::Rgb {red: 200, green: 0, blue: 0}, Chunk::Run(1)]);
    }
    #[test]
    fn bad_select_index_on_collision() {
        let first = Pixel::new(1, 0, 0, 0);
        let collides = Pixel::new(65, 0, 0, 0);
        assert!(first.hash_index() == collides.hash_index());
        let chunks = select_all(&[first, Pixel::new(50, 60, 70, 0), collides]);
        assert!(chunks[2] == Chunk::Rgb {red: 65, green: 0, blue: 0});
        let chunks = select_all(&[first, Pixel::new(50, 60, 70, 0), first]);
        assert!(chunks[2] == Chunk::Index(3));
    }
    #[test]
    fn good_select_diff_boundaries() {
        let base = Pixel::new(100, 100, 100, 255);
        let chunks = select_all(&[base, Pixel::new(98, 101, 98, 255)]);
        assert!(chunks[1] == Chunk::Diff {red: -2, green: 1, blue: -2});
        let chunks = select_all(&[base, Pixel::new(97, 97, 97, 255)]);     // -3 falls to luma
        assert!(chunks[1] == Chunk::Luma {green: -3, red_green: 0, blue_green: 0});
        let chunks = select_all(&[base, Pixel::new(102, 102, 102, 255)]);  // +2 falls to luma
        assert!(chunks[1] == Chunk::Luma {green: 2, red_green: 0, blue_green: 0});
    }
    #[test]
    fn good_select_luma_boundaries() {
        let base = Pixel::new(100, 100, 100, 255);
        let chunks = select_all(&[base, Pixel::new(68, 68, 68, 255)]);
        assert!(chunks[1] == Chunk::Luma {green: -32, red_green: 0, blue_green: 0});
        let chunks = select_all(&[base, Pixel::new(131, 131, 131, 255)]);
        assert!(chunks[1] == Chunk::Luma {green: 31, red_green: 0, blue_green: 0});
        let chunks = select_all(&[base, Pixel::new(67, 67, 67, 255)]);
        assert!(chunks[1] == Chunk::Rgb {red: 67, green: 67, blue: 67});
        let chunks = select_all(&[base, Pixel::new(132, 132, 132, 255)]);
        assert!(chunks[1] == Chunk::Rgb {red: 132, green: 132, blue: 132});
    }
    #[test]
    fn good_select_wraparound_is_diff() {
        let chunks = select_all(&[Pixel::new(255, 255, 255, 255)]);
        assert!(chunks == [Chunk::Diff {red: -1, green: -1, blue: -1}]);
    }
}
