use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image does not fit on a terminal raster line.
    #[error("image is wider ({width} pixels) than a GraphOn terminal ({max} pixels)")]
    ImageTooWide { width: usize, max: usize },

    /// The row source failed to deliver a declared row.
    #[error("cannot read row {row}: {source}")]
    SourceRead {
        row: usize,
        #[source]
        source: io::Error,
    },

    #[error("row has {actual} pixels, image is {expected} pixels wide")]
    RowLength { expected: usize, actual: usize },

    #[error("image has only {height} rows")]
    TooManyRows { height: usize },

    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
