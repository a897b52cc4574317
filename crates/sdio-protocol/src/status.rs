//! Card status word interpretation
//!
//! The 32-bit card status word travels in the argument of an R1/R1b response
//! (SELECT_CARD and friends). The high bits are error and condition flags,
//! bits 12–9 encode the current card state, bit 8 is ready-for-data, and a
//! few low bits carry app-command/IO-card/authentication indicators.
//!
//! Three renderings exist, in increasing verbosity:
//! - brief: "ok" or an error count
//! - compact: error count plus the bracketed card state
//! - full: every set flag spelled out in fixed bit order
//!
//! All three are truncation-safe: they take a byte capacity, never produce
//! more, and report the length the untruncated rendering would have had so
//! callers can detect clipping.

/// Bits of the status word counted as errors by the summaries
///
/// Fixed protocol constant; the summaries popcount the word against it.
pub const STATUS_ERROR_MASK: u32 = 0xFFF9_E008;

/// Error/condition flags rendered by [`full_status`], high bit first
const STATUS_FLAGS: &[(u32, &str)] = &[
    (31, "RNGE"),
    (30, "ADDR"),
    (29, "BLEN"),
    (28, "ERSQ"),
    (27, "ERPM"),
    (26, "WPVI"),
    (25, "LOCK"),
    (24, "LKFL"),
    (23, "!CRC"),
    (22, "!CMD"),
    (21, "!ECC"),
    (20, "CCER"),
    (19, "ERR!"),
    (16, "!CSD"),
    (15, "WPSK"),
    (14, "ECCD"),
    (13, "ERST"),
];

/// Trailing indicator flags (app command expected, IO card, auth error)
const AUX_FLAGS: &[(u32, &str)] = &[(5, "acmd"), (4, "sdio"), (3, "!AKE")];

/// Card state machine position, from bits 12–9 of the status word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardState {
    Idle,
    Ready,
    Ident,
    Stby,
    Tran,
    Data,
    Rcv,
    Prg,
    Dis,
    Sdio,
    /// Reserved state code; renders as "???"
    Unknown,
}

impl CardState {
    /// Extract the state from a raw status word
    pub fn from_status(status: u32) -> Self {
        match (status >> 9) & 0xF {
            0 => CardState::Idle,
            1 => CardState::Ready,
            2 => CardState::Ident,
            3 => CardState::Stby,
            4 => CardState::Tran,
            5 => CardState::Data,
            6 => CardState::Rcv,
            7 => CardState::Prg,
            8 => CardState::Dis,
            15 => CardState::Sdio,
            _ => CardState::Unknown,
        }
    }

    /// Canonical short name
    pub fn name(&self) -> &'static str {
        match self {
            CardState::Idle => "idle",
            CardState::Ready => "ready",
            CardState::Ident => "ident",
            CardState::Stby => "stby",
            CardState::Tran => "tran",
            CardState::Data => "data",
            CardState::Rcv => "rcv",
            CardState::Prg => "prg",
            CardState::Dis => "dis",
            CardState::Sdio => "sdio",
            CardState::Unknown => "???",
        }
    }
}

/// Number of error flags set in `status`
pub fn error_count(status: u32) -> u32 {
    (status & STATUS_ERROR_MASK).count_ones()
}

/// Verbosity of the short status summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryClass {
    /// "ok" or "<n> err[s]"
    Brief,
    /// "<n> err[s] [<state>]"
    Compact,
}

/// Rendered text plus the length the untruncated rendering would have had
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedText {
    /// The rendering, clipped to the requested capacity
    pub text: String,
    /// Byte length of the full rendering
    pub full_len: usize,
}

impl BoundedText {
    fn new(full: String, capacity: usize) -> Self {
        let full_len = full.len();
        if full_len <= capacity {
            return Self {
                text: full,
                full_len,
            };
        }
        let mut cut = capacity;
        while !full.is_char_boundary(cut) {
            cut -= 1;
        }
        Self {
            text: full[..cut].to_string(),
            full_len,
        }
    }

    /// Whether the capacity clipped the rendering
    pub fn truncated(&self) -> bool {
        self.text.len() < self.full_len
    }
}

/// Short status summary at the requested verbosity, clipped to `capacity`
///
/// The plural suffix differs between the two classes: compact attaches "s"
/// to any count other than one, brief attaches it to a count of exactly one.
/// Consumers match on the literal text, so both spellings are kept as-is.
pub fn short_status(status: u32, class: SummaryClass, capacity: usize) -> BoundedText {
    let errors = error_count(status);
    let full = match class {
        SummaryClass::Compact => format!(
            "{} err{} [{}]",
            errors,
            if errors == 1 { "" } else { "s" },
            CardState::from_status(status).name()
        ),
        SummaryClass::Brief => {
            if errors == 0 {
                "ok".to_string()
            } else {
                format!("{} err{}", errors, if errors == 1 { "s" } else { "" })
            }
        }
    };
    BoundedText::new(full, capacity)
}

/// Full status line: every set flag, the bracketed state, rdy/bsy, and the
/// trailing indicator tokens, clipped to `capacity`
///
/// Unset flags emit nothing, so the width varies with the word.
pub fn full_status(status: u32, capacity: usize) -> BoundedText {
    let mut line = String::new();
    for &(bit, token) in STATUS_FLAGS {
        if (status >> bit) & 1 == 1 {
            line.push_str(token);
            line.push(' ');
        }
    }

    line.push('[');
    line.push_str(CardState::from_status(status).name());
    line.push_str("] ");
    line.push_str(if (status >> 8) & 1 == 1 { "rdy" } else { "bsy" });

    for &(bit, token) in AUX_FLAGS {
        if (status >> bit) & 1 == 1 {
            line.push(' ');
            line.push_str(token);
        }
    }

    BoundedText::new(line, capacity)
}

#[cfg(test)]
mod tests {
    use super::{
        error_count, full_status, short_status, BoundedText, CardState, SummaryClass,
        STATUS_ERROR_MASK,
    };

    #[test]
    fn test_card_state_names() {
        assert_eq!(CardState::from_status(0 << 9).name(), "idle");
        assert_eq!(CardState::from_status(4 << 9).name(), "tran");
        assert_eq!(CardState::from_status(8 << 9).name(), "dis");
        assert_eq!(CardState::from_status(15 << 9).name(), "sdio");
    }

    #[test]
    fn test_reserved_state_codes_render_as_placeholder() {
        for code in 9..=14u32 {
            assert_eq!(CardState::from_status(code << 9).name(), "???");
        }
    }

    #[test]
    fn test_error_count_uses_the_mask() {
        assert_eq!(error_count(0), 0);
        assert_eq!(error_count(STATUS_ERROR_MASK), STATUS_ERROR_MASK.count_ones());
        // bit 8 (ready-for-data) is not an error
        assert_eq!(error_count(1 << 8), 0);
        // bit 31 (out-of-range) is
        assert_eq!(error_count(1 << 31), 1);
    }

    #[test]
    fn test_brief_summary_ok() {
        assert_eq!(short_status(0, SummaryClass::Brief, 64).text, "ok");
        assert_eq!(short_status(1 << 8, SummaryClass::Brief, 64).text, "ok");
    }

    // The brief form attaches "s" to a count of one and the compact form to
    // any other count; both spellings are load-bearing for consumers.
    #[test]
    fn test_summary_plural_suffixes() {
        let one = 1u32 << 31;
        let two = (1u32 << 31) | (1 << 30);

        assert_eq!(short_status(one, SummaryClass::Brief, 64).text, "1 errs");
        assert_eq!(short_status(two, SummaryClass::Brief, 64).text, "2 err");

        assert_eq!(
            short_status(one, SummaryClass::Compact, 64).text,
            "1 err [idle]"
        );
        assert_eq!(
            short_status(two, SummaryClass::Compact, 64).text,
            "2 errs [idle]"
        );
    }

    #[test]
    fn test_full_status_token_order() {
        let status = (1u32 << 31) | (1 << 23) | (4 << 9) | (1 << 8) | (1 << 5) | (1 << 3);
        let line = full_status(status, 256).text;
        assert_eq!(line, "RNGE !CRC [tran] rdy acmd !AKE");
    }

    #[test]
    fn test_full_status_busy_without_flags() {
        assert_eq!(full_status(4 << 9, 256).text, "[tran] bsy");
    }

    #[test]
    fn test_truncation_reports_full_length() {
        let status = (1u32 << 31) | (1 << 30) | (1 << 29);
        let clipped = short_status(status, SummaryClass::Compact, 4);
        assert_eq!(clipped.text.len(), 4);
        assert!(clipped.truncated());

        let whole = short_status(status, SummaryClass::Compact, 256);
        assert_eq!(clipped.full_len, whole.text.len());
        assert!(!whole.truncated());
    }

    #[test]
    fn test_bounded_text_zero_capacity() {
        let b = BoundedText::new("abc".to_string(), 0);
        assert_eq!(b.text, "");
        assert_eq!(b.full_len, 3);
        assert!(b.truncated());
    }
}
