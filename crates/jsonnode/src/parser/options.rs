/// Configuration options for [`Parser`](crate::Parser).
///
/// # Examples
///
/// ```rust
/// use jsonnode::{Parser, ParserOptions};
///
/// let parser = Parser::new(ParserOptions {
///     deny_warnings: true,
///     ..Default::default()
/// });
/// assert!(parser.parse_str(r#"{"a":1,"a":2}"#).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Size of each half of the character double buffer.
    ///
    /// The reader keeps `2 * buffer_size` characters in memory regardless of
    /// input size. Values below [`ParserOptions::MIN_BUFFER_SIZE`] are raised
    /// to it, because surrogate-pair decoding looks up to six characters
    /// ahead.
    ///
    /// # Default
    ///
    /// `1024`
    pub buffer_size: usize,

    /// Whether tolerated malformations abort the parse.
    ///
    /// By default the parser accepts stray commas, keyless values, duplicate
    /// keys, unclosed containers and similar input, recording a
    /// [`ParseWarning`](crate::ParseWarning) for each. When `true`, the first
    /// such warning is returned as
    /// [`SyntaxError::Rejected`](crate::SyntaxError::Rejected).
    ///
    /// # Default
    ///
    /// `false`
    pub deny_warnings: bool,
}

impl ParserOptions {
    /// Smallest accepted half-buffer size.
    pub const MIN_BUFFER_SIZE: usize = 8;

    pub(crate) fn effective_buffer_size(&self) -> usize {
        self.buffer_size.max(Self::MIN_BUFFER_SIZE)
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            buffer_size: 1024,
            deny_warnings: false,
        }
    }
}
