//! CSV export of decoded captures
//!
//! One row per frame in ascending index order, written through any
//! [`std::io::Write`] sink. The caller supplies a cancellation check that is
//! polled once per row; a cancelled export flushes what it has written and
//! returns normally - a partial file is an acceptable outcome, there is no
//! rollback.

use std::io::Write;

use crate::error::ExportError;
use crate::numfmt::{format_number, format_time, DisplayBase};
use crate::{FrameKind, FrameSource};

/// Header line of the export stream
pub const EXPORT_HEADER: &str = "Time [s],Value";

// The value column is fixed at one byte in every row, whatever the frame's
// native payload width; existing consumers parse this exact shape.
const EXPORT_VALUE_BITS: u32 = 8;

/// How an export run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Every frame was written
    Completed,
    /// The cancellation check fired; the sink holds a valid partial file
    Cancelled,
}

/// Write the capture as CSV rows into `sink`
///
/// `check_cancelled` receives `(current_index, total)` after each row and
/// returns `true` to stop. Rendering is total; the only error path is the
/// sink itself.
pub fn export_csv<S, W, P>(
    source: &S,
    sink: &mut W,
    base: DisplayBase,
    mut check_cancelled: P,
) -> Result<ExportOutcome, ExportError>
where
    S: FrameSource + ?Sized,
    W: Write,
    P: FnMut(u64, u64) -> bool,
{
    let total = source.num_frames();
    let trigger = source.trigger_sample();
    let rate = source.sample_rate();
    tracing::debug!(total, "starting csv export");

    writeln!(sink, "{EXPORT_HEADER}")?;

    for index in 0..total {
        let frame = source.frame(index);
        let time = format_time(frame.starting_sample, trigger, rate);
        let value = format_number(frame.data1, base, EXPORT_VALUE_BITS);

        match frame.kind {
            FrameKind::Dir => {
                let origin = if frame.data1 != 0 {
                    "from Host"
                } else {
                    "from Slave"
                };
                writeln!(sink, "{time},DIR:{origin}")?;
            }
            FrameKind::Cmd => writeln!(sink, "{time},CMD:{value}")?,
            FrameKind::Arg => writeln!(sink, "{time},ARG:{value}")?,
            FrameKind::LongArg => writeln!(sink, "{time},LONG_ARG:{value}")?,
            FrameKind::Crc => writeln!(sink, "{time},CRC:{value}")?,
        }

        if check_cancelled(index, total) {
            tracing::debug!(written = index + 1, total, "export cancelled");
            sink.flush()?;
            return Ok(ExportOutcome::Cancelled);
        }
    }

    sink.flush()?;
    tracing::debug!(total, "export complete");
    Ok(ExportOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::{export_csv, ExportOutcome, EXPORT_HEADER};
    use crate::numfmt::DisplayBase;
    use crate::{Capture, Frame, FrameKind};

    fn capture_of(kinds: &[(FrameKind, u64)]) -> Capture {
        let mut capture = Capture::new(1_000_000);
        for (i, &(kind, data1)) in kinds.iter().enumerate() {
            capture.push(Frame {
                kind,
                data1,
                data2: 0,
                flags: 0,
                starting_sample: i as u64 * 1000,
            });
        }
        capture
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let capture = capture_of(&[
            (FrameKind::Dir, 1),
            (FrameKind::Cmd, 0x47),
            (FrameKind::Crc, 0x80),
        ]);
        let mut sink = Vec::new();

        let outcome = export_csv(&capture, &mut sink, DisplayBase::Hex, |_, _| false).unwrap();
        assert_eq!(outcome, ExportOutcome::Completed);

        let text = String::from_utf8(sink).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], EXPORT_HEADER);
        assert_eq!(lines[1], "0.000000000,DIR:from Host");
        assert_eq!(lines[2], "0.001000000,CMD:0x47");
        assert_eq!(lines[3], "0.002000000,CRC:0x80");
    }

    #[test]
    fn test_export_value_is_one_byte_wide() {
        let capture = capture_of(&[(FrameKind::Arg, 0xDEAD_BEEF)]);
        let mut sink = Vec::new();

        export_csv(&capture, &mut sink, DisplayBase::Hex, |_, _| false).unwrap();

        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("ARG:0xEF"));
    }

    #[test]
    fn test_cancellation_stops_after_current_row() {
        let capture = capture_of(&[
            (FrameKind::Cmd, 0x40),
            (FrameKind::Cmd, 0x41),
            (FrameKind::Cmd, 0x42),
        ]);
        let mut sink = Vec::new();

        let outcome =
            export_csv(&capture, &mut sink, DisplayBase::Hex, |index, _| index >= 1).unwrap();
        assert_eq!(outcome, ExportOutcome::Cancelled);

        let text = String::from_utf8(sink).unwrap();
        // header plus rows for frames 0 and 1; frame 2 never rendered
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("CMD:0x41"));
        assert!(!text.contains("CMD:0x42"));
    }

    #[test]
    fn test_dir_rows_name_the_origin() {
        let capture = capture_of(&[(FrameKind::Dir, 0)]);
        let mut sink = Vec::new();

        export_csv(&capture, &mut sink, DisplayBase::Hex, |_, _| false).unwrap();

        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("DIR:from Slave"));
    }
}
