//! Double buffer of characters with bounded lookahead.
//!
//! The ring holds `2 * half` slots. The cursor consumes one half while the
//! other half already holds the characters that follow it; crossing the
//! middle or the end of the ring refills the half that was just vacated.
//! Any offset up to `half` ahead of the cursor is therefore always loaded,
//! and memory use is independent of input size.
//!
//! Slots past the end of the source hold `None`, which doubles as the
//! end-of-stream sentinel.

use super::{error::BufferError, source::CharSource};

#[derive(Debug)]
pub(crate) struct CharBuffer<S> {
    source: S,
    ring: Box<[Option<char>]>,
    half: usize,
    pos: usize,
    consumed: usize,
    exhausted: bool,
}

impl<S: CharSource> CharBuffer<S> {
    /// Half-buffer size used when none is given.
    #[cfg(test)]
    pub(crate) const DEFAULT_HALF: usize = 8;

    pub(crate) fn new(source: S, half: usize) -> Result<Self, BufferError> {
        if half == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        let mut buffer = Self {
            source,
            ring: vec![None; 2 * half].into_boxed_slice(),
            half,
            pos: 0,
            consumed: 0,
            exhausted: false,
        };
        buffer.fill(0, 2 * half)?;
        Ok(buffer)
    }

    fn fill(&mut self, from: usize, to: usize) -> Result<(), BufferError> {
        for slot in &mut self.ring[from..to] {
            *slot = if self.exhausted {
                None
            } else {
                let next = self.source.next_char()?;
                self.exhausted = next.is_none();
                next
            };
        }
        Ok(())
    }

    /// Returns the character `index` positions ahead without consuming it.
    #[inline]
    pub(crate) fn lookahead(&self, index: usize) -> Result<Option<char>, BufferError> {
        if index > self.half {
            return Err(BufferError::LookaheadOutOfRange {
                index,
                limit: self.half,
            });
        }
        Ok(self.ring[(self.pos + index) % self.ring.len()])
    }

    /// Consumes the current character. Returns `None` once the source is
    /// exhausted, without advancing.
    #[inline]
    pub(crate) fn next(&mut self) -> Result<Option<char>, BufferError> {
        let Some(ch) = self.ring[self.pos] else {
            return Ok(None);
        };
        self.pos += 1;
        self.consumed += 1;
        if self.pos == self.half {
            self.fill(0, self.half)?;
        } else if self.pos == self.ring.len() {
            self.pos = 0;
            self.fill(self.half, self.ring.len())?;
        }
        Ok(Some(ch))
    }

    /// Consumes up to `count` characters; fewer only at end of stream.
    pub(crate) fn next_string(&mut self, count: usize) -> Result<String, BufferError> {
        let mut out = String::with_capacity(count);
        for _ in 0..count {
            match self.next()? {
                Some(ch) => out.push(ch),
                None => break,
            }
        }
        Ok(out)
    }

    /// Number of characters consumed so far.
    pub(crate) fn position(&self) -> usize {
        self.consumed
    }
}
