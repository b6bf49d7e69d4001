//! Single-pass JSON tree builder.
//!
//! Overview
//! - Characters are pulled one at a time from a [`CharBuffer`], a bounded
//!   double buffer over any [`CharSource`]. Lookahead is only used to decode
//!   escapes and to fold `\r\n` into one line break.
//! - The lexer does not classify tokens. Everything between structural
//!   characters accumulates into a single text buffer, and quote characters
//!   merely toggle whether structural characters count as text. A finished
//!   token becomes either the pending key (on `:`) or a [`Scalar`] (on `,`
//!   or a closing bracket).
//! - Open containers live on an explicit stack rather than the call stack,
//!   so nesting depth is bounded only by memory. Each frame remembers where
//!   it will attach to its parent. A container is moved into its parent when
//!   it closes; because no sibling can be added while it is open, the order
//!   matches attaching it at the opening bracket.
//!
//! Failure model
//! - Only two conditions are fatal: a closing bracket with no open
//!   container, and end of input inside a quoted string. I/O errors from the
//!   source abort as well.
//! - Everything else (keyless values, stray commas, duplicate keys,
//!   mismatched or missing closers, bad `\u` escapes) is tolerated. Each case
//!   is recorded as a [`ParseWarning`] and logged at `debug` level; with
//!   [`ParserOptions::deny_warnings`] the first one aborts instead.

mod buffer;
mod error;
mod escape_buffer;
mod options;
mod source;
mod warning;


use std::io::Read;

use buffer::CharBuffer;
pub use error::{BufferError, ErrorSource, ParserError, SyntaxError};
use escape_buffer::{CodeUnit, UnicodeEscapeBuffer, combine_surrogates};
pub use options::ParserOptions;
pub use source::{CharSource, ReaderSource, StrSource};
use tracing::debug;
pub use warning::{ParseWarning, WarningKind};

use crate::node::{Map, Node, Scalar, ScalarStyle};

/// A successfully parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// The root container, or a scalar if the input held no container.
    pub root: Node,
    /// Tolerated malformations, in input order.
    pub warnings: Vec<ParseWarning>,
}

/// Parses JSON text into a [`Node`] tree.
///
/// # Examples
///
/// ```
/// use jsonnode::Parser;
///
/// let doc = Parser::default()
///     .parse_str(r#"{"friends":[{"name":"x"},{"name":"y"},{"name":"z"}]}"#)
///     .unwrap();
/// assert_eq!(doc.root["friends"][2]["name"].value(), "z");
/// assert!(doc.warnings.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses an in-memory string.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse_source`].
    pub fn parse_str(&self, text: &str) -> Result<Parsed, ParserError> {
        self.parse_source(StrSource::new(text))
    }

    /// Parses UTF-8 text from a byte stream, such as an open file.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse_source`]; read failures surface as
    /// [`BufferError::Io`].
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Parsed, ParserError> {
        self.parse_source(ReaderSource::new(reader))
    }

    /// Parses everything `source` produces.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::UnexpectedClose`] for a closing bracket with nothing
    /// open, [`SyntaxError::UnterminatedString`] when the input ends inside
    /// quotes, [`SyntaxError::Rejected`] for the first warning in strict
    /// mode, and [`BufferError::Io`] when the source fails.
    pub fn parse_source<S: CharSource>(&self, source: S) -> Result<Parsed, ParserError> {
        let mut reader = CharBuffer::new(source, self.options.effective_buffer_size())
            .map_err(|e| ParserError::new(e, 1, 0))?;
        let mut builder = TreeBuilder::new(self.options.deny_warnings);
        let root = builder.run(&mut reader)?;
        debug!(
            chars = reader.position(),
            warnings = builder.warnings.len(),
            "parsed document"
        );
        Ok(Parsed {
            root,
            warnings: builder.warnings,
        })
    }
}

// ------------------------------------------------------------------------------------------------
// Container stack
// ------------------------------------------------------------------------------------------------

/// Where a container goes once it is closed.
#[derive(Debug)]
enum Slot {
    Root,
    Element,
    Member(String),
    /// Keyless or trailing; discarded on close.
    Detached,
}

#[derive(Debug)]
struct Frame {
    node: Node,
    slot: Slot,
    opened: char,
}

// ------------------------------------------------------------------------------------------------
// State machine
// ------------------------------------------------------------------------------------------------

#[derive(Debug)]
struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Node>,

    /// Text of the current token.
    token: String,
    /// Set by the first character or quote of a token, so `""` still counts.
    token_started: bool,
    token_quoted: bool,
    pending_key: Option<String>,

    in_quote: bool,
    quote_line: usize,
    quote_column: usize,

    line: usize,
    column: usize,

    unicode_escape_buffer: UnicodeEscapeBuffer,
    deny_warnings: bool,
    warnings: Vec<ParseWarning>,
}

impl TreeBuilder {
    fn new(deny_warnings: bool) -> Self {
        Self {
            stack: Vec::new(),
            root: None,
            token: String::new(),
            token_started: false,
            token_quoted: false,
            pending_key: None,
            in_quote: false,
            quote_line: 1,
            quote_column: 0,
            line: 1,
            column: 0,
            unicode_escape_buffer: UnicodeEscapeBuffer::new(),
            deny_warnings,
            warnings: Vec::new(),
        }
    }

    fn run<S: CharSource>(&mut self, reader: &mut CharBuffer<S>) -> Result<Node, ParserError> {
        while let Some(ch) = self.advance(reader)? {
            self.step(ch, reader)?;
        }
        self.finish()
    }

    fn error(&self, source: impl Into<ErrorSource>) -> ParserError {
        ParserError::new(source, self.line, self.column)
    }

    fn warn(&mut self, kind: WarningKind) -> Result<(), ParserError> {
        debug!(line = self.line, column = self.column, "{kind}");
        if self.deny_warnings {
            return Err(self.error(SyntaxError::Rejected(kind)));
        }
        self.warnings.push(ParseWarning {
            kind,
            line: self.line,
            column: self.column,
        });
        Ok(())
    }

    /// Consumes one character and updates the position.
    #[inline(always)]
    fn advance<S: CharSource>(
        &mut self,
        reader: &mut CharBuffer<S>,
    ) -> Result<Option<char>, ParserError> {
        let next = reader.next().map_err(|e| self.error(e))?;
        match next {
            Some('\n') => {
                self.line += 1;
                self.column = 0;
            }
            Some('\r') => {
                if reader.lookahead(0).map_err(|e| self.error(e))? == Some('\n') {
                    self.column += 1;
                } else {
                    self.line += 1;
                    self.column = 0;
                }
            }
            Some(_) => self.column += 1,
            None => {}
        }
        Ok(next)
    }

    fn step<S: CharSource>(
        &mut self,
        ch: char,
        reader: &mut CharBuffer<S>,
    ) -> Result<(), ParserError> {
        match ch {
            '{' | '[' if !self.in_quote => self.open(ch),
            '}' | ']' if !self.in_quote => self.close(ch),
            ':' if !self.in_quote => {
                self.promote_key();
                Ok(())
            }
            ',' if !self.in_quote => self.flush_token(),
            '"' => {
                self.toggle_quote();
                Ok(())
            }
            '\r' | '\n' => Ok(()),
            ' ' | '\t' if !self.in_quote => Ok(()),
            '\\' if self.in_quote => self.escape(reader),
            '\\' => self.warn(WarningKind::StrayBackslash),
            _ => {
                self.push_char(ch);
                Ok(())
            }
        }
    }

    fn finish(&mut self) -> Result<Node, ParserError> {
        if self.in_quote {
            return Err(ParserError::new(
                SyntaxError::UnterminatedString,
                self.quote_line,
                self.quote_column,
            ));
        }

        let open = self.stack.len();
        if open > 0 {
            if self.token_started {
                let text = self.take_scalar().into_text();
                self.warn(WarningKind::DroppedValue(text))?;
            }
            self.warn(WarningKind::UnclosedContainers(open))?;
            while let Some(frame) = self.stack.pop() {
                self.attach(frame)?;
            }
        }

        match self.root.take() {
            Some(root) => {
                if self.token_started {
                    self.warn(WarningKind::TrailingContent)?;
                }
                Ok(root)
            }
            None => Ok(Node::Scalar(self.take_scalar())),
        }
    }

    // --------------------------------------------------------------------------------------------
    // Tokens
    // --------------------------------------------------------------------------------------------

    #[inline(always)]
    fn push_char(&mut self, ch: char) {
        self.token.push(ch);
        self.token_started = true;
    }

    fn toggle_quote(&mut self) {
        self.in_quote = !self.in_quote;
        if self.in_quote {
            self.token_started = true;
            self.token_quoted = true;
            self.quote_line = self.line;
            self.quote_column = self.column;
        }
    }

    fn reset_token(&mut self) {
        self.token.clear();
        self.token_started = false;
        self.token_quoted = false;
    }

    fn take_scalar(&mut self) -> Scalar {
        let style = if self.token_quoted {
            ScalarStyle::Quoted
        } else {
            ScalarStyle::Bare
        };
        let scalar = Scalar::new(core::mem::take(&mut self.token), style);
        self.token_started = false;
        self.token_quoted = false;
        scalar
    }

    fn promote_key(&mut self) {
        let key = core::mem::take(&mut self.token);
        self.reset_token();
        self.pending_key = (!key.is_empty()).then_some(key);
    }

    /// Attaches the current token to the open container, then clears the
    /// token and the pending key.
    fn flush_token(&mut self) -> Result<(), ParserError> {
        let key = self.pending_key.take();
        if !self.token_started {
            return Ok(());
        }
        let scalar = self.take_scalar();
        match (self.stack.last().map(|f| f.node.is_array()), key) {
            (Some(true), _) => {
                self.push_element(Node::Scalar(scalar));
                Ok(())
            }
            (Some(false), Some(key)) => self.insert_member(key, Node::Scalar(scalar)),
            _ => self.warn(WarningKind::DroppedValue(scalar.into_text())),
        }
    }

    // --------------------------------------------------------------------------------------------
    // Containers
    // --------------------------------------------------------------------------------------------

    fn open(&mut self, ch: char) -> Result<(), ParserError> {
        if self.token_started {
            let text = self.take_scalar().into_text();
            self.warn(WarningKind::DroppedValue(text))?;
        }
        let slot = match self.stack.last().map(|f| f.node.is_array()) {
            Some(true) => Slot::Element,
            Some(false) => match self.pending_key.take() {
                Some(key) => Slot::Member(key),
                None => {
                    self.warn(WarningKind::DroppedContainer)?;
                    Slot::Detached
                }
            },
            None if self.root.is_none() => Slot::Root,
            None => {
                self.warn(WarningKind::TrailingContent)?;
                Slot::Detached
            }
        };
        let node = if ch == '{' {
            Node::object()
        } else {
            Node::array()
        };
        self.stack.push(Frame {
            node,
            slot,
            opened: ch,
        });
        self.reset_token();
        self.pending_key = None;
        Ok(())
    }

    fn close(&mut self, ch: char) -> Result<(), ParserError> {
        if self.stack.is_empty() {
            return Err(self.error(SyntaxError::UnexpectedClose(ch)));
        }
        self.flush_token()?;
        if let Some(frame) = self.stack.pop() {
            let expected = if frame.opened == '{' { '}' } else { ']' };
            if ch != expected {
                self.warn(WarningKind::MismatchedClose {
                    opened: frame.opened,
                    found: ch,
                })?;
            }
            self.attach(frame)?;
        }
        Ok(())
    }

    fn attach(&mut self, frame: Frame) -> Result<(), ParserError> {
        match frame.slot {
            Slot::Root => self.root = Some(frame.node),
            Slot::Element => self.push_element(frame.node),
            Slot::Member(key) => self.insert_member(key, frame.node)?,
            Slot::Detached => {}
        }
        Ok(())
    }

    fn push_element(&mut self, node: Node) {
        if let Some(Frame {
            node: Node::Array(arr),
            ..
        }) = self.stack.last_mut()
        {
            arr.push(node);
        }
    }

    fn insert_member(&mut self, key: String, node: Node) -> Result<(), ParserError> {
        let Some(Frame {
            node: Node::Object(map),
            ..
        }) = self.stack.last_mut()
        else {
            return Ok(());
        };
        match insert_or_overwrite(map, key, node) {
            Some(key) => self.warn(WarningKind::DuplicateKey(key)),
            None => Ok(()),
        }
    }

    // --------------------------------------------------------------------------------------------
    // Escapes
    // --------------------------------------------------------------------------------------------

    fn escape<S: CharSource>(&mut self, reader: &mut CharBuffer<S>) -> Result<(), ParserError> {
        // End of input right after the backslash is reported by `finish`.
        let Some(c) = self.advance(reader)? else {
            return Ok(());
        };
        match c {
            't' => self.push_char('\t'),
            'r' => self.push_char('\r'),
            'n' => self.push_char('\n'),
            'b' => self.push_char('\u{8}'),
            'f' => self.push_char('\u{c}'),
            'u' => return self.unicode_escape(reader),
            other => self.push_char(other),
        }
        Ok(())
    }

    /// Decodes the four hex digits after `\u`, pairing a high surrogate with
    /// an immediately following `\uDC00..\uDFFF`. Digits are checked with
    /// lookahead first, so a malformed escape consumes nothing after the `u`.
    fn unicode_escape<S: CharSource>(
        &mut self,
        reader: &mut CharBuffer<S>,
    ) -> Result<(), ParserError> {
        let Some(unit) = self.peek_code_unit(reader, 0)? else {
            let seen = self.peek_text(reader, 0, 4)?;
            self.warn(WarningKind::InvalidUnicodeEscape(format!("\\u{seen}")))?;
            self.push_char(char::REPLACEMENT_CHARACTER);
            return Ok(());
        };
        self.consume(reader, 4)?;

        let ch = match unit {
            CodeUnit::Scalar(ch) => ch,
            CodeUnit::High(high) => match self.following_low_surrogate(reader)? {
                Some(low) => {
                    self.consume(reader, 6)?;
                    combine_surrogates(high, low)
                }
                None => return self.lone_surrogate(high),
            },
            CodeUnit::Low(low) => return self.lone_surrogate(low),
        };
        self.push_char(ch);
        Ok(())
    }

    /// The low half of a pair if the next six characters are `\uDC00..\uDFFF`.
    fn following_low_surrogate<S: CharSource>(
        &mut self,
        reader: &CharBuffer<S>,
    ) -> Result<Option<u16>, ParserError> {
        let lookahead = |i| reader.lookahead(i).map_err(|e| self.error(e));
        if lookahead(0)? != Some('\\') || lookahead(1)? != Some('u') {
            return Ok(None);
        }
        match self.peek_code_unit(reader, 2)? {
            Some(CodeUnit::Low(low)) => Ok(Some(low)),
            _ => Ok(None),
        }
    }

    fn lone_surrogate(&mut self, unit: u16) -> Result<(), ParserError> {
        self.warn(WarningKind::InvalidUnicodeEscape(format!("\\u{unit:04X}")))?;
        self.push_char(char::REPLACEMENT_CHARACTER);
        Ok(())
    }

    fn peek_code_unit<S: CharSource>(
        &mut self,
        reader: &CharBuffer<S>,
        offset: usize,
    ) -> Result<Option<CodeUnit>, ParserError> {
        let mut digits = ['\0'; 4];
        for (i, digit) in digits.iter_mut().enumerate() {
            match reader.lookahead(offset + i).map_err(|e| self.error(e))? {
                Some(c) => *digit = c,
                None => return Ok(None),
            }
        }
        self.unicode_escape_buffer.reset();
        Ok(self.unicode_escape_buffer.decode(digits))
    }

    fn peek_text<S: CharSource>(
        &self,
        reader: &CharBuffer<S>,
        offset: usize,
        len: usize,
    ) -> Result<String, ParserError> {
        let mut out = String::new();
        for i in offset..offset + len {
            match reader.lookahead(i).map_err(|e| self.error(e))? {
                Some(c) if c.is_ascii_hexdigit() => out.push(c),
                _ => break,
            }
        }
        Ok(out)
    }

    /// Consumes `count` characters known not to be line breaks.
    fn consume<S: CharSource>(
        &mut self,
        reader: &mut CharBuffer<S>,
        count: usize,
    ) -> Result<(), ParserError> {
        let taken = reader.next_string(count).map_err(|e| self.error(e))?;
        self.column += taken.chars().count();
        Ok(())
    }
}

/// Inserts `key`, keeping the position of an existing member. Returns the key
/// back if it was already present.
fn insert_or_overwrite(map: &mut Map, key: String, node: Node) -> Option<String> {
    match map.entry(key) {
        indexmap::map::Entry::Occupied(mut entry) => {
            entry.insert(node);
            Some(entry.key().clone())
        }
        indexmap::map::Entry::Vacant(entry) => {
            entry.insert(node);
            None
        }
    }
}
