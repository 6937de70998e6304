use crate::rle::encode_line;
use crate::{MAX_LINE_REPEAT, START_OF_PICTURE};

/// A unit ready for transmission.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Flush<'a> {
    /// Extra plots of the unit transmitted before this one.
    pub repeat: u8,
    /// Encoded runs of the current difference map.
    pub payload: &'a [u8],
}

/// Collapses consecutive identical difference maps into one unit.
pub struct LineRepeat {
    reference: Vec<u8>,
    encoded: Vec<u8>,
    pending: u8,
    started: bool,
}

impl LineRepeat {
    pub fn new(bytes_per_line: usize) -> Self {
        LineRepeat {
            reference: vec![0; bytes_per_line],
            encoded: Vec::with_capacity(2 * (bytes_per_line + 1)),
            pending: START_OF_PICTURE,
            started: false,
        }
    }

    /// Feeds the difference map of the next scanline.
    pub fn push(&mut self, diff: &[u8]) -> Option<Flush<'_>> {
        debug_assert_eq!(diff.len(), self.reference.len());
        if !self.started || self.reference != diff {
            let repeat = self.pending;
            self.reference.copy_from_slice(diff);
            encode_line(&self.reference, &mut self.encoded);
            self.pending = 0;
            self.started = true;
            debug!(
                "new unit: {} bytes, previous repeated {repeat} times",
                self.encoded.len()
            );
            return Some(Flush {
                repeat,
                payload: &self.encoded,
            });
        }

        self.pending += 1;
        if self.pending == MAX_LINE_REPEAT {
            debug!("repeat limit reached, resending unit");
            self.pending = 0;
            return Some(Flush {
                repeat: MAX_LINE_REPEAT,
                payload: &self.encoded,
            });
        }
        None
    }

    /// Repeat count still owed to the last unit.
    pub fn pending(&self) -> u8 {
        self.pending
    }
}
