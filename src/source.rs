use crate::Error;
use image::GrayImage;
use std::io;
use std::path::Path;

/// Pixels darker than this luma are black.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// One-shot producer of the rows of a bilevel image, top to bottom.
pub trait RowSource {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Fills `row` with the next row, `true` meaning black.
    fn read_row(&mut self, row: &mut [bool]) -> io::Result<()>;
}

/// Rows of a decoded image, thresholded to black and white.
pub struct ImageRows {
    image: GrayImage,
    threshold: u8,
    next: u32,
}

impl ImageRows {
    pub fn new(image: GrayImage) -> Self {
        ImageRows {
            image,
            threshold: DEFAULT_THRESHOLD,
            next: 0,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Decodes an image file, PBM or any other format `image` knows.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let image = image::open(path)?.into_luma8();
        debug!("decoded {}x{} image", image.width(), image.height());
        Ok(ImageRows::new(image))
    }

    /// Decodes an in-memory image, guessing the format from its signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let image = image::load_from_memory(bytes)?.into_luma8();
        debug!("decoded {}x{} image", image.width(), image.height());
        Ok(ImageRows::new(image))
    }
}

impl RowSource for ImageRows {
    fn width(&self) -> usize {
        self.image.width() as usize
    }

    fn height(&self) -> usize {
        self.image.height() as usize
    }

    fn read_row(&mut self, row: &mut [bool]) -> io::Result<()> {
        if self.next >= self.image.height() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read past the last row",
            ));
        }
        for (x, bit) in row.iter_mut().enumerate() {
            *bit = self.image.get_pixel(x as u32, self.next).0[0] < self.threshold;
        }
        self.next += 1;
        Ok(())
    }
}
