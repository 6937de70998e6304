//! # GraphOn Raster Stream
//!
//! Encodes a 1 bit/pixel image into the raster download stream of a GraphOn
//! graphics terminal. Every scanline is packed MSB-first, XORed against the
//! previous scanline, and the difference map is run-length encoded.
//!
//! # Run Encoding
//!
//! ```text
//!         MSB      LSB
//!          │        │
//!          ▼        ▼
//!         TTCC CCCC
//!         ▲▲
//!  TAG────┘│
//! ```
//!
//! The low 6 bits hold `count - 1`.
//!
//! | tag  | run    | followed by                                         |
//! |------|--------|-----------------------------------------------------|
//! | `00` | -      | reserved by the terminal for "repeat current line"  |
//! | `01` | skip   | one literal byte, plotted after `count` zero bytes  |
//! | `10` | repeat | one byte, plotted `count` times                     |
//! | `11` | unique | `count` literal bytes                               |
//!
//! # Streaming Scheme
//!
//! ```text
//! ESC 1  ESC FF  ESC r  ESC [=11l  ESC P0;1;0;4;1;<rows>;<cols>;1!R1/
//! <repeat> <len>/<runs> <repeat> <len>/<runs> ... <repeat>
//! ESC \  ESC t
//! ```
//!
//! `<len>` is the decimal length of `<runs>` plus one. Each `<repeat>` byte
//! tells the terminal how many extra times to plot the unit sent before it,
//! so the first one is the start-of-picture marker 63 and the last one closes
//! the final unit. Identical difference maps are never sent twice in a row,
//! except when the repeat count reaches 62.

#[macro_use]
extern crate log;

mod diff;
mod encoder;
mod error;
mod frame;
mod pack;
mod repeat;
mod rle;
mod source;

pub use diff::xor_lines;
pub use encoder::{encode, RasterEncoder};
pub use error::Error;
pub use frame::Framer;
pub use pack::{pack_row, BitPacker};
pub use repeat::{Flush, LineRepeat};
pub use rle::{encode_line, Run, Runs};
pub use source::{ImageRows, RowSource, DEFAULT_THRESHOLD};

/// GraphOn raster lines are 1056 bits wide.
pub const DEVICE_WIDTH: usize = 1056;
pub const DEVICE_WIDTH_BYTES: usize = DEVICE_WIDTH / 8;
/// Longest run a single header byte can describe.
pub const MAX_RUN: usize = 64;
/// Repeat count at which a unit is flushed and sent again.
pub const MAX_LINE_REPEAT: u8 = 62;
/// Repeat byte meaning "start new picture".
pub const START_OF_PICTURE: u8 = 63;

/// Packed bytes needed for a row of `width` pixels.
#[inline(always)]
pub fn bytes_per_line(width: usize) -> usize {
    (width + 7) / 8
}

#[cfg(test)]
static INIT: std::sync::Once = std::sync::Once::new();

/// Setup function that is only run once, even if called multiple times.
#[cfg(test)]
fn setup() {
    INIT.call_once(|| {
        let _ = pretty_env_logger::try_init();
    });
}
