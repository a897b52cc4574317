//! Bubble-text annotation for decoded frames
//!
//! Each frame is rendered as an ordered list of display strings, shortest
//! first, so the UI can pick the longest rendering that fits the bubble.
//! Most of the knowledge in this module is the command-specific argument
//! layout: the same 32 bits mean a relative card address after SELECT_CARD,
//! a register access descriptor after IO_RW_DIRECT, and a card status word
//! in the matching responses.
//!
//! # Recognized commands
//! - `CMD0` GO_IDLE_STATE - reset argument, always zero
//! - `CMD3` SEND_RELATIVE_ADDR - response carries the published RCA
//! - `CMD5` GET_OCR - operating conditions query
//! - `CMD7` SELECT_CARD - argument carries the RCA, R1b response the status word
//! - `CMD52` IO_RW_DIRECT - single-register read/write on an I/O card
//! - `CMD53` IO_RW_EXTENDED - multi-byte/block transfer on an I/O card
//!
//! Everything else falls back to a raw "ARG <value>" rendering in the
//! caller's display base.

use crate::numfmt::{format_number, DisplayBase};
use crate::status::{full_status, short_status, SummaryClass};
use crate::{Frame, FrameKind, COMMAND_DIR_BIT, COMMAND_INDEX_MASK};

const GO_IDLE_STATE: u8 = 0;
const SEND_RELATIVE_ADDR: u8 = 3;
const GET_OCR: u8 = 5;
const SELECT_CARD: u8 = 7;
const IO_RW_DIRECT: u8 = 52;
const IO_RW_EXTENDED: u8 = 53;

// Status renderings longer than this are clipped; no bubble shows more.
const STATUS_TEXT_CAPACITY: usize = 100;

/// I/O card state from bits 13–12 of an IO_RW response argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoState {
    /// Card disabled
    Dis,
    /// Command state (between transfers)
    Cmd,
    /// Transfer in progress
    Trn,
    /// Reserved code; renders as "???"
    Unknown,
}

impl IoState {
    /// Extract the I/O state from a raw response argument
    pub fn from_response(arg: u32) -> Self {
        match (arg >> 12) & 3 {
            0 => IoState::Dis,
            1 => IoState::Cmd,
            2 => IoState::Trn,
            _ => IoState::Unknown,
        }
    }

    /// Canonical short name
    pub fn name(&self) -> &'static str {
        match self {
            IoState::Dis => "dis",
            IoState::Cmd => "cmd",
            IoState::Trn => "trn",
            IoState::Unknown => "???",
        }
    }
}

/// Reusable bubble-text generator
///
/// Holds the output list across frames so per-frame rendering does not
/// reallocate; every [`annotate`](Annotator::annotate) call starts by
/// discarding the previous frame's strings.
#[derive(Debug)]
pub struct Annotator {
    strings: Vec<String>,
}

impl Annotator {
    /// Create an empty generator
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
        }
    }

    /// Build the display strings for `frame`, shortest first
    pub fn annotate(&mut self, frame: &Frame, base: DisplayBase) -> &[String] {
        self.strings.clear();

        match frame.kind {
            FrameKind::Dir => {
                if frame.data1 != 0 {
                    self.push("H");
                    self.push("Host");
                    self.push("DIR: Host");
                } else {
                    self.push("S");
                    self.push("Slave");
                    self.push("DIR: Slave");
                }
            }

            FrameKind::Cmd => {
                let index =
                    format_number(frame.data1 & u64::from(COMMAND_INDEX_MASK), DisplayBase::Decimal, 6);
                if frame.data1 & u64::from(COMMAND_DIR_BIT) != 0 {
                    self.push(format!("C{index}"));
                    self.push(format!("CMD{index}"));
                } else {
                    self.push(format!("R{index}"));
                    self.push(format!("RSP{index}"));
                }
            }

            FrameKind::Arg => {
                let arg = frame.data1 as u32;
                let index = frame.arg_command_index();
                if frame.arg_is_command() {
                    self.arg_command(index, arg, base);
                } else {
                    self.arg_response(index, arg, base);
                }
            }

            FrameKind::LongArg => {
                self.push(format!(
                    "LONG: {}{}",
                    format_number(frame.data1, base, 64),
                    format_number(frame.data2, base, 64)
                ));
            }

            FrameKind::Crc => {
                if frame.data1 & 0x80 != 0 {
                    self.push("O");
                    self.push("CRC");
                    self.push("CRC OK");
                } else {
                    self.push("X");
                    self.push("BAD");
                    self.push("BAD CRC");
                }
            }
        }

        &self.strings
    }

    /// Host→card argument, dispatched on the command index
    fn arg_command(&mut self, index: u8, arg: u32, base: DisplayBase) {
        match index {
            GO_IDLE_STATE => {
                self.push("Idle");
                self.push("Go idle");
            }
            SEND_RELATIVE_ADDR => {
                self.push("Addr");
                self.push("Get address");
            }
            GET_OCR => {
                self.push("OCR?");
                self.push("Get OCR");
            }
            SELECT_CARD => {
                let rca = (arg >> 16) & 0xFFFF;
                self.push(format!("S{rca}"));
                self.push(format!("Sel {rca}"));
                self.push(format!("Select {rca}"));
            }
            IO_RW_DIRECT => {
                let rw = if (arg >> 31) & 1 == 1 { 'W' } else { 'R' };
                let function = (arg >> 28) & 7;
                let raw = if (arg >> 27) & 1 == 1 { "RAW " } else { "" };
                let addr = (arg >> 9) & 0x1_FFFF;
                let data = arg & 0x1FF;
                self.push(rw.to_string());
                self.push(format!("{rw}{function} {raw}0x{addr:05X}, {data}"));
            }
            IO_RW_EXTENDED => {
                let rw = if (arg >> 31) & 1 == 1 { 'W' } else { 'R' };
                let function = (arg >> 28) & 7;
                let addr = (arg >> 9) & 0x1_FFFF;
                let count = arg & 0x1FF;
                let mut marks = String::new();
                if (arg >> 27) & 1 == 1 {
                    marks.push('B');
                }
                if (arg >> 26) & 1 == 1 {
                    marks.push_str("++");
                }
                if !marks.is_empty() {
                    marks.push(' ');
                }
                self.push(rw.to_string());
                self.push(format!("{rw}{function} {marks}0x{addr:05X}, {count}"));
            }
            _ => {
                self.push(format!("ARG {}", format_number(u64::from(arg), base, 32)));
            }
        }
    }

    /// Card→host argument, dispatched on the command index
    fn arg_response(&mut self, index: u8, arg: u32, base: DisplayBase) {
        match index {
            SEND_RELATIVE_ADDR => {
                let rca = (arg >> 16) & 0xFFFF;
                self.push(format!("A={rca}"));
                self.push(format!("Addr={rca}"));
                self.push(format!("Address = {rca}"));
            }
            SELECT_CARD => {
                // R1b response: the argument is the card status word
                let brief = short_status(arg, SummaryClass::Brief, STATUS_TEXT_CAPACITY);
                let compact = short_status(arg, SummaryClass::Compact, STATUS_TEXT_CAPACITY);
                let full = full_status(arg, STATUS_TEXT_CAPACITY);
                self.push(brief.text);
                self.push(compact.text);
                self.push(full.text);
            }
            IO_RW_DIRECT | IO_RW_EXTENDED => {
                let state = IoState::from_response(arg);
                let crc = if (arg >> 15) & 1 == 1 { "!CRC " } else { "" };
                let cmd = if (arg >> 14) & 1 == 1 { "!CMD " } else { "" };
                let err = if (arg >> 11) & 1 == 1 { "ERR " } else { "" };
                let inv = if (arg >> 9) & 1 == 1 { "INV " } else { "" };
                let oor = if (arg >> 8) & 1 == 1 { "OOR " } else { "" };
                let data = arg & 0xFF;
                self.push(state.name());
                self.push(format!(
                    "{crc}{cmd}[{}] {err}{inv}{oor}= 0x{data:02X}",
                    state.name()
                ));
            }
            _ => {
                self.push(format!("ARG {}", format_number(u64::from(arg), base, 32)));
            }
        }
    }

    fn push(&mut self, s: impl Into<String>) {
        self.strings.push(s.into());
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience over [`Annotator`]
pub fn annotate(frame: &Frame, base: DisplayBase) -> Vec<String> {
    let mut annotator = Annotator::new();
    annotator.annotate(frame, base);
    annotator.strings
}

/// Frame-level tabular text; this decoder populates none
pub fn frame_tabular_text(_frame: &Frame, _base: DisplayBase) -> Vec<String> {
    Vec::new()
}

/// Packet-level tabular text placeholder
pub fn packet_tabular_text(_packet_id: u64, _base: DisplayBase) -> Vec<String> {
    vec!["not supported".to_string()]
}

/// Transaction-level tabular text placeholder
pub fn transaction_tabular_text(_transaction_id: u64, _base: DisplayBase) -> Vec<String> {
    vec!["not supported".to_string()]
}
