use thiserror::Error;

use super::warning::WarningKind;

/// A fatal parse failure, positioned at the character that caused it.
#[derive(Error, Debug)]
#[error("{source} at {line}:{column}")]
pub struct ParserError {
    pub(crate) source: ErrorSource,
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column of the failure.
    pub column: usize,
}

impl ParserError {
    pub(crate) fn new(source: impl Into<ErrorSource>, line: usize, column: usize) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }

    /// The underlying cause.
    #[must_use]
    pub fn kind(&self) -> &ErrorSource {
        &self.source
    }

    /// The syntax error, if this failure was not caused by the input source.
    #[must_use]
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match &self.source {
            ErrorSource::Syntax(err) => Some(err),
            ErrorSource::Buffer(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ErrorSource {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("read error: {0}")]
    Buffer(#[from] BufferError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unexpected '{0}' with no open container")]
    UnexpectedClose(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("rejected in strict mode: {0}")]
    Rejected(WarningKind),
}

#[derive(Debug, Error)]
pub enum BufferError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("lookahead index {index} exceeds the half-buffer size {limit}")]
    LookaheadOutOfRange { index: usize, limit: usize },
    #[error("buffer size must be non-zero")]
    ZeroCapacity,
}
