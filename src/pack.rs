/// Writes pixels into a packed line, most significant bit first.
pub struct BitPacker<'a> {
    out: &'a mut [u8],
    index: usize,
    shift: u8,
}

impl<'a> BitPacker<'a> {
    pub fn new(out: &'a mut [u8]) -> Self {
        out.fill(0);
        BitPacker {
            out,
            index: 0,
            shift: 7,
        }
    }

    /// `true` is a black (set) pixel.
    #[inline(always)]
    pub fn put(&mut self, bit: bool) {
        if bit {
            self.out[self.index] |= 1 << self.shift;
        }
        if self.shift == 0 {
            self.index += 1;
            self.shift = 7;
        } else {
            self.shift -= 1;
        }
    }

    /// Pads the current byte with clear bits and returns the bytes written.
    pub fn finish(self) -> usize {
        if self.shift != 7 {
            self.index + 1
        } else {
            self.index
        }
    }
}

/// Packs `row` into `out`. `out` must hold at least `bytes_per_line(row.len())` bytes.
pub fn pack_row(row: &[bool], out: &mut [u8]) -> usize {
    let mut packer = BitPacker::new(out);
    for &bit in row {
        packer.put(bit);
    }
    packer.finish()
}
