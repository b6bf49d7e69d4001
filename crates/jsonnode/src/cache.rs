//! Memoization of the most recent parse.
//!
//! A [`ParseCache`] holds at most one entry: the fingerprint of a source
//! text, the text itself, and the tree parsed from it. Asking again for the
//! same text returns the stored tree without parsing; any other text evicts
//! the entry before it is parsed. Trees are handed out as [`Arc<Node>`], so a
//! caller that wants to edit one uses [`Arc::make_mut`] and gets a private
//! copy while the cache keeps the original.

use core::hash::BuildHasher;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ahash::RandomState;
use tracing::trace;

use crate::{Node, Parser, ParserError};

const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// 64-bit digest of `text`, stable for the lifetime of the process.
fn fingerprint(text: &str) -> u64 {
    RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3]).hash_one(text)
}

#[derive(Debug)]
struct Entry {
    fingerprint: u64,
    text: Box<str>,
    deny_warnings: bool,
    root: Arc<Node>,
}

impl Entry {
    fn matches(&self, fingerprint: u64, text: &str, parser: &Parser) -> bool {
        self.fingerprint == fingerprint
            && self.deny_warnings == parser.options().deny_warnings
            && *self.text == *text
    }
}

/// A single-slot cache of parsed documents.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use jsonnode::{ParseCache, Parser};
///
/// let parser = Parser::default();
/// let mut cache = ParseCache::new();
/// let a = cache.get_or_parse(r#"{"a":1}"#, &parser).unwrap();
/// let b = cache.get_or_parse(r#"{"a":1}"#, &parser).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// // Editing a shared tree clones it; the cached copy is untouched.
/// let mut mine = b;
/// Arc::make_mut(&mut mine)["a"].set_i32(2);
/// assert_eq!(cache.get_or_parse(r#"{"a":1}"#, &parser).unwrap()["a"].as_i32(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ParseCache {
    entry: Option<Entry>,
}

impl ParseCache {
    #[must_use]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the cached tree for `text`, parsing it with `parser` if the
    /// cache holds anything else.
    ///
    /// A hit requires the same text and the same
    /// [`deny_warnings`](crate::ParserOptions::deny_warnings) setting. Parse
    /// warnings are not retained; use [`Parser::parse_str`] to see them.
    ///
    /// # Errors
    ///
    /// Any [`ParserError`] from parsing. The previous entry is evicted even
    /// when parsing fails.
    pub fn get_or_parse(&mut self, text: &str, parser: &Parser) -> Result<Arc<Node>, ParserError> {
        let fingerprint = fingerprint(text);
        if let Some(entry) = &self.entry {
            if entry.matches(fingerprint, text, parser) {
                trace!(fingerprint, "parse cache hit");
                return Ok(Arc::clone(&entry.root));
            }
        }
        if let Some(old) = self.entry.take() {
            trace!(fingerprint = old.fingerprint, "parse cache evict");
        }
        trace!(fingerprint, len = text.len(), "parse cache miss");

        let root = Arc::new(parser.parse_str(text)?.root);
        self.entry = Some(Entry {
            fingerprint,
            text: text.into(),
            deny_warnings: parser.options().deny_warnings,
            root: Arc::clone(&root),
        });
        Ok(root)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    /// Fingerprint of the cached text, if any.
    #[must_use]
    pub fn fingerprint(&self) -> Option<u64> {
        self.entry.as_ref().map(|e| e.fingerprint)
    }
}

static GLOBAL: Mutex<ParseCache> = Mutex::new(ParseCache::new());

/// Locks the process-wide cache. The slot is never left half-written, so a
/// poisoned lock is still usable.
pub(crate) fn global() -> MutexGuard<'static, ParseCache> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParserOptions;

    #[test]
    fn identical_text_is_a_hit() {
        let parser = Parser::default();
        let mut cache = ParseCache::new();
        assert!(cache.is_empty());
        let a = cache.get_or_parse(r#"{"a":[1,2]}"#, &parser).unwrap();
        let b = cache.get_or_parse(r#"{"a":[1,2]}"#, &parser).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.fingerprint(), Some(fingerprint(r#"{"a":[1,2]}"#)));
    }

    #[test]
    fn different_text_evicts() {
        let parser = Parser::default();
        let mut cache = ParseCache::new();
        let first = cache.get_or_parse("[1]", &parser).unwrap();
        let second = cache.get_or_parse("[2]", &parser).unwrap();
        assert_eq!(second[0].as_i32(), 2);
        assert_eq!(cache.fingerprint(), Some(fingerprint("[2]")));

        let again = cache.get_or_parse("[1]", &parser).unwrap();
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(first, again);
    }

    #[test]
    fn colliding_fingerprint_is_not_a_hit() {
        let parser = Parser::default();
        let mut cache = ParseCache::new();
        cache.entry = Some(Entry {
            fingerprint: fingerprint("[2]"),
            text: "[1]".into(),
            deny_warnings: false,
            root: Arc::new(Node::bare("stale")),
        });
        let root = cache.get_or_parse("[2]", &parser).unwrap();
        assert_eq!(root.to_text(), "[ 2 ]");
    }

    #[test]
    fn strictness_is_part_of_the_key() {
        let lenient = Parser::default();
        let strict = Parser::new(ParserOptions {
            deny_warnings: true,
            ..Default::default()
        });
        let mut cache = ParseCache::new();
        assert!(cache.get_or_parse("[1", &lenient).is_ok());
        assert!(cache.get_or_parse("[1", &strict).is_err());
    }

    #[test]
    fn failed_parse_leaves_the_cache_empty() {
        let parser = Parser::default();
        let mut cache = ParseCache::new();
        cache.get_or_parse("{}", &parser).unwrap();
        assert!(cache.get_or_parse("{}}", &parser).is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.fingerprint(), None);
    }

    #[test]
    fn copy_on_write_keeps_the_cached_tree() {
        let parser = Parser::default();
        let mut cache = ParseCache::new();
        let mut mine = cache.get_or_parse(r#"{"a":1}"#, &parser).unwrap();
        Arc::make_mut(&mut mine).insert("b", Node::from(2)).unwrap();
        assert_eq!(mine.to_text(), r#"{"a":1, "b":2}"#);

        let cached = cache.get_or_parse(r#"{"a":1}"#, &parser).unwrap();
        assert_eq!(cached.to_text(), r#"{"a":1}"#);
        assert!(!Arc::ptr_eq(&mine, &cached));
    }

    #[test]
    fn clear_empties_the_slot() {
        let mut cache = ParseCache::new();
        cache.get_or_parse("1", &Parser::default()).unwrap();
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
