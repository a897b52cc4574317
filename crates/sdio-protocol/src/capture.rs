//! In-memory capture storage
//!
//! The host framework owns frame storage; this module provides the owned
//! stand-in used by the CLI harness and the tests. With the `serde` feature
//! enabled a capture round-trips through JSON as
//! `{ "sample_rate", "trigger_sample", "frames": [...] }`.

use crate::{Frame, FrameSource};

/// An owned capture: decoded frames plus the timing metadata the export
/// renderer needs for the time column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capture {
    /// Sample rate of the capture in Hz
    pub sample_rate: u32,
    /// Sample index of the trigger point
    pub trigger_sample: u64,
    /// Decoded frames in bus order
    pub frames: Vec<Frame>,
}

impl Capture {
    /// Create an empty capture at the given sample rate
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            trigger_sample: 0,
            frames: Vec::new(),
        }
    }

    /// Append a frame in bus order
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

impl FrameSource for Capture {
    fn num_frames(&self) -> u64 {
        self.frames.len() as u64
    }

    fn frame(&self, index: u64) -> Frame {
        self.frames[index as usize]
    }

    fn trigger_sample(&self) -> u64 {
        self.trigger_sample
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
