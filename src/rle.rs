use crate::MAX_RUN;
use std::fmt;

const SKIP_TAG: u8 = 0x40;
const REPEAT_TAG: u8 = 0x80;
const UNIQUE_TAG: u8 = 0xC0;

/// One run of a difference map.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Run<'a> {
    /// 1..=64 literal bytes, no two neighbours equal.
    Unique(&'a [u8]),
    /// A non-zero byte repeated 2..=64 times.
    Repeat { count: usize, value: u8 },
    /// `skipped` zero bytes left untouched, then `literal` plotted.
    Skip { skipped: usize, literal: u8 },
}

impl<'a> Run<'a> {
    /// Bytes of the difference map this run covers.
    pub fn span(&self) -> usize {
        match *self {
            Run::Unique(bytes) => bytes.len(),
            Run::Repeat { count, .. } => count,
            Run::Skip { skipped, .. } => skipped + 1,
        }
    }

    pub fn header(&self) -> u8 {
        let (tag, count) = match *self {
            Run::Unique(bytes) => (UNIQUE_TAG, bytes.len()),
            Run::Repeat { count, .. } => (REPEAT_TAG, count),
            Run::Skip { skipped, .. } => (SKIP_TAG, skipped),
        };
        debug_assert!((1..=MAX_RUN).contains(&count));
        tag | (count - 1) as u8
    }

    #[inline(always)]
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.header());
        match *self {
            Run::Unique(bytes) => out.extend_from_slice(bytes),
            Run::Repeat { value, .. } => out.push(value),
            Run::Skip { literal, .. } => out.push(literal),
        }
    }
}

impl fmt::Debug for Run<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Run::Unique(bytes) => f
                .debug_struct("Unique")
                .field("len", &bytes.len())
                .field("bytes", &format_args!("{bytes:02X?}"))
                .finish(),
            Run::Repeat { count, value } => f
                .debug_struct("Repeat")
                .field("count", count)
                .field("value", &format_args!("0x{value:02X}"))
                .finish(),
            Run::Skip { skipped, literal } => f
                .debug_struct("Skip")
                .field("skipped", skipped)
                .field("literal", &format_args!("0x{literal:02X}"))
                .finish(),
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum Scan {
    Unique,
    Equal,
}

/// Splits a difference map into runs, alternating a unique scan and an
/// equal scan until the line is covered.
pub struct Runs<'a> {
    line: &'a [u8],
    pos: usize,
    scan: Scan,
}

impl<'a> Runs<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        Runs {
            line,
            pos: 0,
            scan: Scan::Unique,
        }
    }

    fn scan_unique(&mut self) -> Option<Run<'a>> {
        let start = self.pos;
        let mut count = 0;
        loop {
            let byte = self.line[self.pos];
            self.pos += 1;
            count += 1;
            if self.pos >= self.line.len() || byte == self.line[self.pos] || count >= MAX_RUN {
                break;
            }
        }
        if count != MAX_RUN && self.pos != self.line.len() {
            // the last byte starts an equal run
            count -= 1;
            self.pos -= 1;
        }
        trace!("unique scan: start={start}, count={count}");
        if count > 0 {
            Some(Run::Unique(&self.line[start..self.pos]))
        } else {
            None
        }
    }

    fn scan_equal(&mut self) -> Option<Run<'a>> {
        let value = self.line[self.pos];
        let mut count = 0;
        loop {
            self.pos += 1;
            count += 1;
            if self.pos >= self.line.len() || self.line[self.pos] != value || count >= MAX_RUN {
                break;
            }
        }
        trace!("equal scan: value=0x{value:02X}, count={count}");
        if count <= 1 {
            self.pos -= 1;
            None
        } else if value == 0 {
            let (run, end) = skip_run(self.line, self.pos, count);
            self.pos = end;
            Some(run)
        } else {
            Some(Run::Repeat { count, value })
        }
    }
}

/// Encodes a zero run of `count` bytes ending before `end`, returning the run
/// and the position after it.
///
/// The terminal plots one literal after every skip. Near the end of the line
/// that literal is the run's own last zero; otherwise it is the byte
/// following the run, which is consumed as well.
fn skip_run(line: &[u8], end: usize, count: usize) -> (Run<'_>, usize) {
    debug_assert!(count >= 2);
    if end + 1 >= line.len() {
        let run = Run::Skip {
            skipped: count - 1,
            literal: line[end - 1],
        };
        (run, end)
    } else {
        let run = Run::Skip {
            skipped: count,
            literal: line[end],
        };
        (run, end + 1)
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Run<'a>> {
        while self.pos < self.line.len() {
            let run = match self.scan {
                Scan::Unique => {
                    self.scan = Scan::Equal;
                    self.scan_unique()
                }
                Scan::Equal => {
                    self.scan = Scan::Unique;
                    self.scan_equal()
                }
            };
            if run.is_some() {
                return run;
            }
        }
        None
    }
}

/// Replaces the contents of `out` with the encoded runs of `line`.
pub fn encode_line(line: &[u8], out: &mut Vec<u8>) {
    out.clear();
    for run in Runs::new(line) {
        trace!("emit {run:?}");
        run.write_to(out);
    }
}
