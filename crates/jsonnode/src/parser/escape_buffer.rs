//! Decoding of four-digit `\uXXXX` escapes.
//!
//! The [`UnicodeEscapeBuffer`] accumulates exactly four ASCII hexadecimal
//! digits (`0-9`, `A-F`, `a-f`) into a UTF-16 code unit. Code units that are
//! surrogate halves are classified so the caller can pair a high surrogate
//! with a following low surrogate.

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u32,
    len: u8,
}

/// A decoded `\uXXXX` escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CodeUnit {
    /// A code unit that is a Unicode scalar value on its own.
    Scalar(char),
    /// `D800..=DBFF`, must be followed by a [`CodeUnit::Low`].
    High(u16),
    /// `DC00..=DFFF`, only valid after a [`CodeUnit::High`].
    Low(u16),
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    #[inline]
    fn hex_val(c: char) -> Option<u32> {
        c.to_digit(16)
    }

    /// Feeds one digit. Returns `None` for a non-hex character (the buffer is
    /// reset), `Some(None)` while fewer than four digits have been seen, and
    /// `Some(Some(unit))` on the fourth digit.
    pub(crate) fn feed(&mut self, c: char) -> Option<Option<CodeUnit>> {
        let Some(d) = Self::hex_val(c) else {
            self.reset();
            return None;
        };
        self.acc = (self.acc << 4) | d;
        self.len += 1;
        if self.len < 4 {
            return Some(None);
        }
        let code = self.acc;
        self.reset();
        Some(Some(Self::classify(code)))
    }

    /// Decodes a complete four-character sequence.
    pub(crate) fn decode(&mut self, digits: [char; 4]) -> Option<CodeUnit> {
        let mut unit = None;
        for c in digits {
            unit = self.feed(c)?;
        }
        unit
    }

    fn classify(code: u32) -> CodeUnit {
        // `code` never exceeds 0xFFFF after four digits.
        #[allow(clippy::cast_possible_truncation)]
        let unit = code as u16;
        match unit {
            0xD800..=0xDBFF => CodeUnit::High(unit),
            0xDC00..=0xDFFF => CodeUnit::Low(unit),
            _ => CodeUnit::Scalar(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)),
        }
    }
}

/// Joins a surrogate pair into the supplementary-plane character it encodes.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> char {
    let code = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::{CodeUnit, UnicodeEscapeBuffer, combine_surrogates};

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('0'), Some(None));
        assert_eq!(buf.feed('0'), Some(None));
        assert_eq!(buf.feed('4'), Some(None));
        assert_eq!(buf.feed('1'), Some(Some(CodeUnit::Scalar('A'))));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(
            buf.decode(['A', 'b', 'C', 'd']),
            Some(CodeUnit::Scalar('\u{ABCD}'))
        );
    }

    #[test]
    fn invalid_hex_resets() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('F'), Some(None));
        assert_eq!(buf.feed('G'), None);
        assert_eq!(buf.decode(['0', '0', '6', '1']), Some(CodeUnit::Scalar('a')));
    }

    #[test]
    fn surrogates_are_classified_and_combined() {
        let mut buf = UnicodeEscapeBuffer::new();
        let Some(CodeUnit::High(high)) = buf.decode(['D', '8', '3', 'D']) else {
            panic!("expected high surrogate");
        };
        let Some(CodeUnit::Low(low)) = buf.decode(['d', 'e', '0', '0']) else {
            panic!("expected low surrogate");
        };
        assert_eq!(combine_surrogates(high, low), '\u{1F600}');
    }
}
