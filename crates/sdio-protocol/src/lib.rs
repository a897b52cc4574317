//! SDIO Capture Decoding Library
//!
//! This crate turns captured SDIO bus traffic - already sampled and split
//! into typed frames by an upstream decoder - into human-readable text for
//! three display surfaces:
//!
//! - **Bubble text**: an ordered list of strings per frame, shortest first,
//!   so a UI can show the longest rendering that fits the available width
//! - **Export rows**: one CSV line per frame, written through any
//!   [`std::io::Write`] sink with cooperative cancellation
//! - **Tabular text**: fixed placeholder strings for surfaces this decoder
//!   does not populate
//!
//! # Frame taxonomy
//!
//! The upstream decoder emits five frame kinds:
//! - `Dir` - bus turnaround marker (host- or card-originated)
//! - `Cmd` - 6-bit command index plus a command/response direction bit
//! - `Arg` - the 32-bit argument word accompanying a command or response;
//!   its layout is command-specific (SELECT_CARD carries a relative card
//!   address, IO_RW_DIRECT packs register address and data, an R1 response
//!   carries the card status word, ...)
//! - `LongArg` - a 128-bit response payload split across two 64-bit halves
//! - `Crc` - checksum verdict for the preceding frame
//!
//! # Example
//!
//! ```rust
//! use sdio_protocol::{Annotator, DisplayBase, Frame, FrameKind};
//!
//! // SELECT_CARD response argument carrying a clean card status word
//! // (state = tran, ready-for-data set, no error flags)
//! let frame = Frame {
//!     kind: FrameKind::Arg,
//!     data1: 0x0000_0900,
//!     data2: 0,
//!     flags: 7,
//!     starting_sample: 0,
//! };
//!
//! let mut annotator = Annotator::new();
//! let strings = annotator.annotate(&frame, DisplayBase::Hex);
//! assert_eq!(strings[0], "ok");
//! ```

pub mod annotate;
pub mod capture;
pub mod error;
pub mod export;
pub mod numfmt;
pub mod status;

pub use annotate::{annotate, Annotator, IoState};
pub use capture::Capture;
pub use error::ExportError;
pub use export::{export_csv, ExportOutcome};
pub use numfmt::DisplayBase;
pub use status::{BoundedText, CardState, SummaryClass};

/// Bit of `Frame::flags` (and of `data1` in `Cmd` frames) that marks the
/// host→card direction; clear means card→host
pub const COMMAND_DIR_BIT: u8 = 0x40;

/// Low six bits of `Frame::flags` carrying the command index (0–63)
pub const COMMAND_INDEX_MASK: u8 = 0x3F;

/// Frame kinds produced by the upstream bus decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameKind {
    /// Bus turnaround marker; `data1` nonzero means host-originated
    Dir,
    /// Command index frame; `data1` carries the index and direction bit
    Cmd,
    /// 32-bit argument word in `data1`; `flags` carries direction and index
    Arg,
    /// 128-bit payload split across `data1` and `data2`
    LongArg,
    /// CRC verdict; bit 7 of `data1` set means the checksum matched
    Crc,
}

/// A single decoded frame as handed over by the upstream decoder
///
/// `kind` determines which fields are meaningful; the decoder never reads a
/// field the kind does not define. `starting_sample` is consumed only by the
/// export renderer for the time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Which interpretation rules apply
    pub kind: FrameKind,
    /// Primary payload bits
    pub data1: u64,
    /// Secondary payload bits (`LongArg` only)
    pub data2: u64,
    /// For `Arg` frames: direction bit plus command index
    pub flags: u8,
    /// Sample index of the frame's first edge
    pub starting_sample: u64,
}

impl Frame {
    /// Whether this `Arg` frame travelled host→card
    pub fn arg_is_command(&self) -> bool {
        self.flags & COMMAND_DIR_BIT != 0
    }

    /// Command index (0–63) this `Arg` frame belongs to
    pub fn arg_command_index(&self) -> u8 {
        self.flags & COMMAND_INDEX_MASK
    }
}

/// Accessor for the frames held by the host's capture storage
///
/// Implemented by [`Capture`] for in-memory use; the host framework provides
/// its own implementation backed by whatever storage it uses.
pub trait FrameSource {
    /// Number of frames in the capture
    fn num_frames(&self) -> u64;

    /// Fetch the frame at `index`; callers stay below [`num_frames`](Self::num_frames)
    fn frame(&self, index: u64) -> Frame;

    /// Sample index of the trigger point (time zero for the export column)
    fn trigger_sample(&self) -> u64;

    /// Sample rate of the capture in Hz
    fn sample_rate(&self) -> u32;
}
