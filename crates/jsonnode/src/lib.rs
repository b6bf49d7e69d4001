//! A forgiving, single-pass JSON parser that builds a navigable and mutable
//! tree of [`Node`]s.
//!
//! Leaves are kept as text. Whether a scalar is a number, a boolean or a
//! string is decided only when it is read through one of the typed accessors
//! ([`Node::as_i32`], [`Node::as_f64`], [`Node::as_bool`], ...), which never
//! fail and fall back to a default instead.
//!
//! Input is read through a bounded character buffer, so documents of any
//! size can be parsed from a [`std::io::Read`] without loading them into
//! memory first. Malformed input is tolerated wherever a sensible tree can
//! still be built; see [`WarningKind`] for what is accepted and
//! [`ParserOptions::deny_warnings`] to reject it instead.
//!
//! ```
//! let root = jsonnode::parse(r#"{"friends":[{"name":"x"},{"name":"y"}],"age":"31"}"#).unwrap();
//! assert_eq!(root["friends"][1]["name"].value(), "y");
//! assert_eq!(root["age"].as_i32(), 31);
//! ```

mod cache;
mod error;
mod node;
mod parser;

#[cfg(test)]
mod tests;

use std::{io::Read, sync::Arc};

pub use cache::ParseCache;
pub use error::NodeError;
pub use node::{Array, Items, Map, Node, Scalar, ScalarStyle};
pub use parser::{
    BufferError, CharSource, ErrorSource, ParseWarning, Parsed, Parser, ParserError,
    ParserOptions, ReaderSource, StrSource, SyntaxError, WarningKind,
};

/// Parses `text` with default options, reusing the tree from the previous
/// call when the text is unchanged.
///
/// The cache is process-wide and holds a single document. To edit the result
/// without affecting later calls, use [`Arc::make_mut`].
///
/// # Errors
///
/// See [`Parser::parse_source`].
pub fn parse(text: &str) -> Result<Arc<Node>, ParserError> {
    cache::global().get_or_parse(text, &Parser::default())
}

/// Parses a byte stream with default options. Nothing is cached.
///
/// # Errors
///
/// See [`Parser::parse_source`].
pub fn parse_reader<R: Read>(reader: R) -> Result<Node, ParserError> {
    Parser::default().parse_reader(reader).map(|doc| doc.root)
}

/// Drops the tree held by the cache behind [`parse`].
pub fn clear_cache() {
    cache::global().clear();
}
