use crate::repeat::Flush;
use std::io::{self, Write};

const ENTER_GRAPHICS: &[u8] = b"\x1b1";
const ERASE_WINDOW: &[u8] = b"\x1b\x0c";
const RASTER_MODE: &[u8] = b"\x1br";
const TEK_CODING: &[u8] = b"\x1b[=11l";
const END_DOWNLOAD: &[u8] = b"\x1b\\";
const EXIT_RASTER: &[u8] = b"\x1bt";

/// Writes the raster download protocol around encoded units.
pub struct Framer<W> {
    writer: W,
}

impl<W: io::Write> Framer<W> {
    pub fn new(writer: W) -> Self {
        Framer { writer }
    }

    /// Enters raster mode and starts a download of `rows` lines of `cols` bits.
    pub fn begin(&mut self, rows: usize, cols: usize) -> io::Result<()> {
        trace!("begin download: rows={rows}, cols={cols}");
        self.writer.write_all(ENTER_GRAPHICS)?;
        self.writer.write_all(ERASE_WINDOW)?;
        self.writer.write_all(RASTER_MODE)?;
        self.writer.write_all(TEK_CODING)?;
        write!(self.writer, "\x1bP0;1;0;4;1;{rows};{cols};1!R1/")
    }

    #[inline(always)]
    pub fn repeat(&mut self, count: u8) -> io::Result<()> {
        self.writer.write_all(&[count])
    }

    pub fn unit(&mut self, flush: &Flush) -> io::Result<()> {
        trace!(
            "unit: repeat={}, payload={}",
            flush.repeat,
            flush.payload.len()
        );
        self.repeat(flush.repeat)?;
        write!(self.writer, "{}/", flush.payload.len() + 1)?;
        self.writer.write_all(flush.payload)
    }

    pub fn end(&mut self) -> io::Result<()> {
        self.writer.write_all(END_DOWNLOAD)?;
        self.writer.write_all(EXIT_RASTER)?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
