use core::fmt;

use thiserror::Error;

/// Malformed input that the parser tolerates instead of rejecting.
///
/// Each of these leaves the tree in a well-defined state (usually by dropping
/// the offending value). With [`ParserOptions::deny_warnings`] the first one
/// aborts the parse as [`SyntaxError::Rejected`].
///
/// [`ParserOptions::deny_warnings`]: crate::ParserOptions::deny_warnings
/// [`SyntaxError::Rejected`]: crate::SyntaxError::Rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A value inside an object had no key, or appeared outside any container.
    #[error("value {0:?} has no key and was dropped")]
    DroppedValue(String),
    /// A nested container opened inside an object without a pending key.
    #[error("container has no key and was dropped")]
    DroppedContainer,
    /// A key was assigned twice in the same object; the later value wins.
    #[error("duplicate key {0:?} overwrote an earlier value")]
    DuplicateKey(String),
    /// A closing bracket that does not match the kind of the open container.
    #[error("'{found}' closed a container opened with '{opened}'")]
    MismatchedClose { opened: char, found: char },
    /// Content after the root container was closed.
    #[error("content after the root container was ignored")]
    TrailingContent,
    /// The input ended with containers still open.
    #[error("{0} container(s) left open at end of input")]
    UnclosedContainers(usize),
    /// A `\u` escape that is not four hex digits, or a lone surrogate.
    #[error("invalid unicode escape {0:?}")]
    InvalidUnicodeEscape(String),
    /// A backslash outside of a quoted string.
    #[error("backslash outside of a string was ignored")]
    StrayBackslash,
}

/// A [`WarningKind`] with the position at which it was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub kind: WarningKind,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line, self.column)
    }
}
