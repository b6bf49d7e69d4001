//! Character sources feeding the [`CharBuffer`](super::buffer::CharBuffer).
//!
//! The parser works on `char`s. In-memory text is iterated directly; byte
//! streams are decoded incrementally so that arbitrarily large inputs never
//! need to be held in memory at once.

use std::io::{self, ErrorKind, Read};

/// A pull-based stream of characters.
///
/// `Ok(None)` marks the end of the stream; implementations must keep
/// returning `Ok(None)` once they have done so.
pub trait CharSource {
    /// Produces the next character.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying input cannot be read.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

/// Characters of an in-memory string.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: core::str::Chars<'a>,
}

impl<'a> StrSource<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self { chars: text.chars() }
    }
}

impl CharSource for StrSource<'_> {
    #[inline]
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// UTF-8 decoding over any [`Read`].
///
/// Bytes are read into a fixed window. A multi-byte sequence cut off at the
/// end of the window is kept and completed by the next read. Invalid or
/// truncated sequences decode to U+FFFD, one per maximal invalid prefix.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    window: Box<[u8]>,
    start: usize,
    end: usize,
    eof: bool,
}

impl<R: Read> ReaderSource<R> {
    /// Default size of the byte window.
    pub const DEFAULT_CAPACITY: usize = 8 * 1024;

    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, Self::DEFAULT_CAPACITY)
    }

    /// Creates a source with a byte window of `capacity` bytes (at least 4,
    /// the longest UTF-8 sequence).
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            window: vec![0; capacity.max(4)].into_boxed_slice(),
            start: 0,
            end: 0,
            eof: false,
        }
    }

    /// Returns the wrapped reader. Bytes already pulled into the window are
    /// lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn refill(&mut self) -> io::Result<()> {
        self.window.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
        loop {
            match self.reader.read(&mut self.window[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        loop {
            let pending = &self.window[self.start..self.end];
            if pending.is_empty() {
                if self.eof {
                    return Ok(None);
                }
            } else {
                let (ch, len) = bstr::decode_utf8(pending);
                match ch {
                    Some(ch) => {
                        self.start += len;
                        return Ok(Some(ch));
                    }
                    // The whole tail is a valid prefix: wait for the rest of
                    // the sequence unless the stream is over.
                    None if len == pending.len() && !self.eof => {}
                    None => {
                        self.start += len;
                        return Ok(Some(char::REPLACEMENT_CHARACTER));
                    }
                }
            }
            self.refill()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Hands out at most `step` bytes per read.
    struct Trickle<'a> {
        bytes: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.bytes.len());
            buf[..n].copy_from_slice(&self.bytes[..n]);
            self.bytes = &self.bytes[n..];
            Ok(n)
        }
    }

    fn drain(mut source: impl CharSource) -> String {
        let mut out = String::new();
        while let Some(ch) = source.next_char().unwrap() {
            out.push(ch);
        }
        out
    }

    #[test]
    fn str_source_yields_all_chars() {
        assert_eq!(drain(StrSource::new("a\u{e9}\u{1F600}")), "a\u{e9}\u{1F600}");
    }

    #[test]
    fn reader_source_joins_sequences_split_across_reads() {
        let text = "\u{e9}t\u{e9} \u{1F600}\u{4E2D}";
        for step in 1..=5 {
            let source = ReaderSource::with_capacity(
                Trickle {
                    bytes: text.as_bytes(),
                    step,
                },
                4,
            );
            assert_eq!(drain(source), text, "step {step}");
        }
    }

    #[test]
    fn reader_source_replaces_invalid_bytes() {
        let source = ReaderSource::new(Cursor::new(b"a\xFFb\xE2\x82".to_vec()));
        assert_eq!(drain(source), "a\u{FFFD}b\u{FFFD}");
    }

    #[test]
    fn reader_source_stays_exhausted() {
        let mut source = ReaderSource::new(Cursor::new(b"x".to_vec()));
        assert_eq!(source.next_char().unwrap(), Some('x'));
        assert_eq!(source.next_char().unwrap(), None);
        assert_eq!(source.next_char().unwrap(), None);
    }

    #[test]
    fn reader_source_retries_interrupted_reads() {
        struct Flaky(bool, Cursor<&'static [u8]>);
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.0 = !self.0;
                if self.0 {
                    Err(io::Error::from(ErrorKind::Interrupted))
                } else {
                    self.1.read(buf)
                }
            }
        }
        let source = ReaderSource::new(Flaky(false, Cursor::new(&b"ok"[..])));
        assert_eq!(drain(source), "ok");
    }
}
