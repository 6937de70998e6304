use crate::diff::xor_lines;
use crate::frame::Framer;
use crate::pack::pack_row;
use crate::repeat::LineRepeat;
use crate::source::RowSource;
use crate::{bytes_per_line, Error, DEVICE_WIDTH, DEVICE_WIDTH_BYTES};
use std::{io, mem};

/// Streams scanlines into a GraphOn raster download.
pub struct RasterEncoder<W> {
    framer: Framer<W>,
    width: usize,
    height: usize,
    row: usize,
    previous: Vec<u8>,
    current: Vec<u8>,
    diff: Vec<u8>,
    repeat: LineRepeat,
}

impl<W: io::Write> RasterEncoder<W> {
    /// Checks the width against the device and writes the download header.
    /// Nothing is written when the image is too wide.
    pub fn new(writer: W, width: usize, height: usize) -> Result<Self, Error> {
        if width > DEVICE_WIDTH {
            return Err(Error::ImageTooWide {
                width,
                max: DEVICE_WIDTH,
            });
        }
        let bytes = bytes_per_line(width);
        debug_assert!(bytes <= DEVICE_WIDTH_BYTES);
        debug!("encoding {width}x{height}, {bytes} bytes per line");

        let mut framer = Framer::new(writer);
        framer.begin(height, bytes * 8)?;
        Ok(RasterEncoder {
            framer,
            width,
            height,
            row: 0,
            previous: vec![0; bytes],
            current: vec![0; bytes],
            diff: vec![0; bytes],
            repeat: LineRepeat::new(bytes),
        })
    }

    /// Encodes the next row, `true` meaning black.
    pub fn update(&mut self, row: &[bool]) -> Result<(), Error> {
        if row.len() != self.width {
            return Err(Error::RowLength {
                expected: self.width,
                actual: row.len(),
            });
        }
        if self.row >= self.height {
            return Err(Error::TooManyRows {
                height: self.height,
            });
        }

        pack_row(row, &mut self.current);
        xor_lines(&self.current, &self.previous, &mut self.diff);
        trace!("row {}: diff {:02X?}", self.row, self.diff);
        if let Some(flush) = self.repeat.push(&self.diff) {
            self.framer.unit(&flush)?;
        }
        mem::swap(&mut self.previous, &mut self.current);
        self.row += 1;
        Ok(())
    }

    /// Closes the last unit and the download, returning the writer.
    pub fn finalize(mut self) -> Result<W, Error> {
        if self.row != self.height {
            warn!("download declared {} rows, {} sent", self.height, self.row);
        }
        self.framer.repeat(self.repeat.pending())?;
        self.framer.end()?;
        Ok(self.framer.into_inner())
    }
}

/// Encodes every row of `source` into `writer`.
///
/// A failing source aborts the download; whatever was written stays written.
pub fn encode<S, W>(source: &mut S, writer: W) -> Result<W, Error>
where
    S: RowSource + ?Sized,
    W: io::Write,
{
    let (width, height) = (source.width(), source.height());
    let mut encoder = RasterEncoder::new(writer, width, height)?;
    let mut row = vec![false; width];
    for y in 0..height {
        source
            .read_row(&mut row)
            .map_err(|source| Error::SourceRead { row: y, source })?;
        encoder.update(&row)?;
    }
    encoder.finalize()
}

#[cfg(test)]
mod tests {
    use super::{encode, RasterEncoder};
    use crate::source::{ImageRows, RowSource};
    use crate::{setup, Error};
    use image::{GrayImage, Luma};
    use std::io;

    fn stream(rows: usize, cols: usize, body: &[u8]) -> Vec<u8> {
        let mut out = format!("\x1b1\x1b\x0c\x1br\x1b[=11l\x1bP0;1;0;4;1;{rows};{cols};1!R1/")
            .into_bytes();
        out.extend_from_slice(body);
        out.extend_from_slice(b"\x1b\\\x1bt");
        out
    }

    fn bits(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    fn encode_rows(width: usize, rows: &[Vec<bool>]) -> Vec<u8> {
        let mut encoder = RasterEncoder::new(Vec::new(), width, rows.len()).unwrap();
        for row in rows {
            encoder.update(row).unwrap();
        }
        encoder.finalize().unwrap()
    }

    struct FailingSource {
        good_rows: usize,
    }

    impl RowSource for FailingSource {
        fn width(&self) -> usize {
            8
        }

        fn height(&self) -> usize {
            4
        }

        fn read_row(&mut self, row: &mut [bool]) -> io::Result<()> {
            if self.good_rows == 0 {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"));
            }
            self.good_rows -= 1;
            row.fill(true);
            Ok(())
        }
    }

    #[test]
    fn test_single_white_row() {
        setup();
        let out = encode_rows(8, &[bits("00000000")]);
        assert_eq!(out, stream(1, 8, b"\x3f3/\xc0\x00\x00"));
    }

    #[test]
    fn test_alternating_row() {
        setup();
        let out = encode_rows(16, &[bits("1010101010101010")]);
        assert_eq!(out, stream(1, 16, b"\x3f3/\x81\xaa\x00"));
    }

    #[test]
    fn test_width_rounded_up() {
        setup();
        let out = encode_rows(10, &[bits("1011000011")]);
        assert_eq!(out, stream(1, 16, b"\x3f4/\xc1\xb0\xc0\x00"));
    }

    #[test]
    fn test_white_lines_repeat() {
        setup();
        let rows = vec![bits("00000000"); 10];
        let out = encode_rows(8, &rows);
        assert_eq!(out, stream(10, 8, b"\x3f3/\xc0\x00\x09"));
    }

    #[test]
    fn test_identical_lines_send_empty_diff() {
        setup();
        let rows = vec![bits("10101010"); 10];
        let out = encode_rows(8, &rows);
        assert_eq!(out, stream(10, 8, b"\x3f3/\xc0\xaa\x003/\xc0\x00\x08"));
    }

    #[test]
    fn test_repeat_limit_resends_unit() {
        setup();
        let rows = vec![bits("00000000"); 70];
        let out = encode_rows(8, &rows);
        assert_eq!(out, stream(70, 8, b"\x3f3/\xc0\x00\x3e3/\xc0\x00\x07"));
    }

    #[test]
    fn test_device_width_limit() {
        setup();
        let mut out = Vec::<u8>::new();
        assert!(RasterEncoder::new(&mut out, 1056, 1).is_ok());
        assert!(out.ends_with(b";1;1056;1!R1/"));

        let mut out = Vec::<u8>::new();
        match RasterEncoder::new(&mut out, 1057, 1) {
            Err(Error::ImageTooWide { width, max }) => assert_eq!((width, max), (1057, 1056)),
            _ => panic!("1057 pixels accepted"),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_row_errors() {
        setup();
        let mut encoder = RasterEncoder::new(Vec::<u8>::new(), 8, 1).unwrap();
        assert!(matches!(
            encoder.update(&bits("0000")),
            Err(Error::RowLength {
                expected: 8,
                actual: 4
            })
        ));
        encoder.update(&bits("00000000")).unwrap();
        assert!(matches!(
            encoder.update(&bits("00000000")),
            Err(Error::TooManyRows { height: 1 })
        ));
    }

    #[test]
    fn test_source_failure_aborts() {
        setup();
        let mut out = Vec::<u8>::new();
        let err = encode(&mut FailingSource { good_rows: 2 }, &mut out).unwrap_err();
        assert!(matches!(err, Error::SourceRead { row: 2, .. }));
        // header and the units of the rows read so far stay written
        assert!(out.starts_with(b"\x1b1"));
        assert!(out.ends_with(b"\x3f3/\xc0\xff\x003/\xc0\x00"));
    }

    #[test]
    fn test_encode_deterministic() {
        setup();
        let image = GrayImage::from_fn(100, 40, |x, y| {
            if (x / 7 + y / 3) % 2 == 0 || y % 11 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        let first = encode(&mut ImageRows::new(image.clone()), Vec::<u8>::new()).unwrap();
        let second = encode(&mut ImageRows::new(image), Vec::<u8>::new()).unwrap();
        assert_eq!(first, second);
        let header = stream(40, 104, b"");
        assert!(first.starts_with(&header[..header.len() - 4]));
    }
}
