//! The parse-result tree.
//!
//! This module defines [`Node`], the tagged union every parse produces, and
//! the navigation and mutation operations over it. Leaves are untyped text
//! ([`Scalar`]) with lazy, never-failing coercions.

mod format;
mod scalar;
#[cfg(any(test, feature = "serde"))]
mod serde;

use core::{
    iter::FusedIterator,
    ops::{Index, IndexMut},
    slice,
};

pub use scalar::{Scalar, ScalarStyle};

use crate::error::NodeError;

/// Members of an object, in insertion order.
pub type Map = indexmap::IndexMap<String, Node>;
/// Elements of an array.
pub type Array = Vec<Node>;

/// A node of the parsed tree.
///
/// # Examples
///
/// ```
/// use jsonnode::Node;
///
/// let mut root = Node::object();
/// root.insert("name", Node::scalar("x")).unwrap();
/// root.insert("tags", Node::array()).unwrap();
/// root["tags"].push(Node::from(1)).unwrap();
///
/// assert_eq!(root["name"].value(), "x");
/// assert_eq!(root.to_text(), r#"{"name":"x", "tags":[ 1 ]}"#);
/// ```
///
/// Cloning, comparing and dropping walk the tree with a heap-allocated work
/// list, so they work at any nesting depth the parser accepts. Objects
/// compare equal only when their members appear in the same order.
#[derive(Debug)]
pub enum Node {
    Object(Map),
    Array(Array),
    Scalar(Scalar),
}

impl Clone for Node {
    fn clone(&self) -> Self {
        struct Frame<'a> {
            children: Items<'a>,
            keys: Option<indexmap::map::Keys<'a, String, Node>>,
            copy: Node,
            key: Option<String>,
        }

        fn open(node: &Node, key: Option<String>) -> Frame<'_> {
            let copy = match node {
                Node::Object(map) => Node::Object(Map::with_capacity(map.len())),
                Node::Array(arr) => Node::Array(Array::with_capacity(arr.len())),
                Node::Scalar(s) => Node::Scalar(s.clone()),
            };
            Frame {
                children: node.items(),
                keys: node.as_object().map(Map::keys),
                copy,
                key,
            }
        }

        let mut stack = vec![open(self, None)];
        let mut finished = None;
        while let Some(top) = stack.last_mut() {
            let key = top.keys.as_mut().and_then(Iterator::next).cloned();
            if let Some(child) = top.children.next() {
                stack.push(open(child, key));
                continue;
            }
            if let Some(done) = stack.pop() {
                match stack.last_mut() {
                    Some(parent) => attach_clone(&mut parent.copy, done.key, done.copy),
                    None => finished = Some(done.copy),
                }
            }
        }
        finished.unwrap_or_default()
    }
}

fn attach_clone(parent: &mut Node, key: Option<String>, child: Node) {
    match parent {
        Node::Object(map) => {
            map.insert(key.unwrap_or_default(), child);
        }
        Node::Array(arr) => arr.push(child),
        Node::Scalar(_) => {}
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if let (Node::Scalar(a), Node::Scalar(b)) = (self, other) {
            return a == b;
        }
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Node::Scalar(a), Node::Scalar(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Node::Array(a), Node::Array(b)) => {
                    if a.len() != b.len() {
                        return false;
                    }
                    pending.extend(a.iter().zip(b));
                }
                (Node::Object(a), Node::Object(b)) => {
                    if a.len() != b.len() {
                        return false;
                    }
                    for ((ka, va), (kb, vb)) in a.iter().zip(b) {
                        if ka != kb {
                            return false;
                        }
                        pending.push((va, vb));
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Node {}

impl Drop for Node {
    fn drop(&mut self) {
        if !self.items().any(|child| !child.is_scalar()) {
            return;
        }
        let mut pending = Vec::new();
        take_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            take_children(&mut node, &mut pending);
        }
    }
}

/// Moves the children of `node` into `out`, leaving it empty.
fn take_children(node: &mut Node, out: &mut Vec<Node>) {
    match node {
        Node::Object(map) => out.extend(core::mem::take(map).into_values()),
        Node::Array(arr) => out.append(arr),
        Node::Scalar(_) => {}
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::Scalar(Scalar::default())
    }
}

impl From<Scalar> for Node {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

impl From<Map> for Node {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl From<Array> for Node {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(v: $ty) -> Self {
                    Self::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

scalar_from!(&str, String, i32, i64, f32, f64, bool);

impl Node {
    /// An empty object.
    #[must_use]
    pub fn object() -> Self {
        Self::Object(Map::new())
    }

    /// An empty array.
    #[must_use]
    pub fn array() -> Self {
        Self::Array(Array::new())
    }

    /// A quoted scalar holding `text`.
    #[must_use]
    pub fn scalar(text: impl Into<String>) -> Self {
        Self::Scalar(Scalar::quoted(text))
    }

    /// A bare scalar holding `text`, serialized without quotes.
    #[must_use]
    pub fn bare(text: impl Into<String>) -> Self {
        Self::Scalar(Scalar::bare(text))
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(..))
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Number of children; `0` for scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Object(map) => map.len(),
            Self::Array(arr) => arr.len(),
            Self::Scalar(_) => 0,
        }
    }

    /// `true` when the node has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The child at `index`: an array element, or the value of the object
    /// member inserted `index`-th.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        match self {
            Self::Object(map) => map.get_index(index).map(|(_, v)| v),
            Self::Array(arr) => arr.get(index),
            Self::Scalar(_) => None,
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        match self {
            Self::Object(map) => map.get_index_mut(index).map(|(_, v)| v),
            Self::Array(arr) => arr.get_mut(index),
            Self::Scalar(_) => None,
        }
    }

    /// The object member named `key`; always `None` for arrays and scalars.
    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn get_key_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.as_object_mut().and_then(|map| map.get_mut(key))
    }

    /// Member names of an object in insertion order; empty otherwise.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Member values of an object in insertion order; empty otherwise.
    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.as_object().into_iter().flat_map(Map::values)
    }

    /// Lazily iterates the children: array elements, object values, or
    /// nothing for a scalar.
    ///
    /// ```
    /// let root = jsonnode::Parser::default()
    ///     .parse_str(r#"[{"a":1,"b":2},{"c":3}]"#)
    ///     .unwrap()
    ///     .root;
    /// let leaves: Vec<&str> = root
    ///     .items()
    ///     .flat_map(|row| row.items())
    ///     .map(|leaf| leaf.value())
    ///     .collect();
    /// assert_eq!(leaves, ["1", "2", "3"]);
    /// ```
    #[must_use]
    pub fn items(&self) -> Items<'_> {
        let inner = match self {
            Self::Object(map) => ItemsInner::Object(map.values()),
            Self::Array(arr) => ItemsInner::Array(arr.iter()),
            Self::Scalar(_) => ItemsInner::Empty,
        };
        Items { inner }
    }

    /// Appends a child. Objects store it under a generated key.
    ///
    /// # Errors
    ///
    /// [`NodeError::NotAContainer`] for scalars.
    pub fn push(&mut self, node: Node) -> Result<(), NodeError> {
        self.add("", node).map(drop)
    }

    /// Adds a child under `key`. Arrays ignore the key and append. Objects
    /// overwrite an existing member in place, and substitute a generated
    /// unique key when `key` is empty. Returns the replaced member, if any.
    ///
    /// # Errors
    ///
    /// [`NodeError::NotAContainer`] for scalars.
    pub fn add(&mut self, key: &str, node: Node) -> Result<Option<Node>, NodeError> {
        match self {
            Self::Object(map) => {
                if key.is_empty() {
                    let key = unique_key(map);
                    map.insert(key, node);
                    Ok(None)
                } else {
                    Ok(map.insert(key.to_owned(), node))
                }
            }
            Self::Array(arr) => {
                arr.push(node);
                Ok(None)
            }
            Self::Scalar(_) => Err(NodeError::NotAContainer),
        }
    }

    /// Sets the object member `key`, returning the previous value.
    ///
    /// # Errors
    ///
    /// [`NodeError::NotAnObject`] unless this is an object.
    pub fn insert(&mut self, key: &str, node: Node) -> Result<Option<Node>, NodeError> {
        if self.is_object() {
            self.add(key, node)
        } else {
            Err(NodeError::NotAnObject)
        }
    }

    /// Replaces the child at `index`, returning the old one. For arrays an
    /// index past the end appends instead.
    ///
    /// # Errors
    ///
    /// [`NodeError::IndexOutOfRange`] for an object index past the last
    /// member, [`NodeError::NotAContainer`] for scalars.
    pub fn set(&mut self, index: usize, node: Node) -> Result<Option<Node>, NodeError> {
        match self {
            Self::Object(map) => {
                let len = map.len();
                let (_, slot) = map
                    .get_index_mut(index)
                    .ok_or(NodeError::IndexOutOfRange { index, len })?;
                Ok(Some(core::mem::replace(slot, node)))
            }
            Self::Array(arr) => match arr.get_mut(index) {
                Some(slot) => Ok(Some(core::mem::replace(slot, node))),
                None => {
                    arr.push(node);
                    Ok(None)
                }
            },
            Self::Scalar(_) => Err(NodeError::NotAContainer),
        }
    }

    /// Removes the object member `key`, keeping the order of the others.
    pub fn remove_key(&mut self, key: &str) -> Option<Node> {
        self.as_object_mut().and_then(|map| map.shift_remove(key))
    }

    /// Removes the child at `index`, keeping the order of the others.
    pub fn remove_index(&mut self, index: usize) -> Option<Node> {
        match self {
            Self::Object(map) => map.shift_remove_index(index).map(|(_, v)| v),
            Self::Array(arr) => (index < arr.len()).then(|| arr.remove(index)),
            Self::Scalar(_) => None,
        }
    }

    /// The scalar text; `""` for objects and arrays.
    #[must_use]
    pub fn value(&self) -> &str {
        self.as_scalar().map_or("", Scalar::text)
    }

    /// Replaces the scalar text. Objects and arrays ignore the call.
    pub fn set_value(&mut self, text: impl Into<String>) {
        if let Self::Scalar(s) = self {
            s.set_text(text);
        }
    }

    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.as_scalar().map_or(0, Scalar::as_i32)
    }

    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.as_scalar().map_or(0, Scalar::as_i64)
    }

    #[must_use]
    pub fn as_f32(&self) -> f32 {
        self.as_scalar().map_or(0.0, Scalar::as_f32)
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.as_scalar().map_or(0.0, Scalar::as_f64)
    }

    /// See [`Scalar::as_bool`]; `false` for objects and arrays.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        self.as_scalar().is_some_and(Scalar::as_bool)
    }

    pub fn set_i32(&mut self, v: i32) {
        if let Self::Scalar(s) = self {
            s.set_i32(v);
        }
    }

    pub fn set_i64(&mut self, v: i64) {
        if let Self::Scalar(s) = self {
            s.set_i64(v);
        }
    }

    pub fn set_f32(&mut self, v: f32) {
        if let Self::Scalar(s) = self {
            s.set_f32(v);
        }
    }

    pub fn set_f64(&mut self, v: f64) {
        if let Self::Scalar(s) = self {
            s.set_f64(v);
        }
    }

    pub fn set_bool(&mut self, v: bool) {
        if let Self::Scalar(s) = self {
            s.set_bool(v);
        }
    }
}

fn unique_key(map: &Map) -> String {
    let mut n = map.len();
    loop {
        let key = format!("#{n}");
        if !map.contains_key(&key) {
            return key;
        }
        n += 1;
    }
}

impl Index<usize> for Node {
    type Output = Node;

    /// # Panics
    ///
    /// When there is no child at `index`.
    fn index(&self, index: usize) -> &Node {
        match self.get(index) {
            Some(node) => node,
            None => panic!("no child at index {index} (len {})", self.len()),
        }
    }
}

impl IndexMut<usize> for Node {
    fn index_mut(&mut self, index: usize) -> &mut Node {
        let len = self.len();
        match self.get_mut(index) {
            Some(node) => node,
            None => panic!("no child at index {index} (len {len})"),
        }
    }
}

impl Index<&str> for Node {
    type Output = Node;

    /// # Panics
    ///
    /// When this is not an object or has no member `key`.
    fn index(&self, key: &str) -> &Node {
        match self.get_key(key) {
            Some(node) => node,
            None => panic!("no member {key:?}"),
        }
    }
}

impl IndexMut<&str> for Node {
    fn index_mut(&mut self, key: &str) -> &mut Node {
        match self.get_key_mut(key) {
            Some(node) => node,
            None => panic!("no member {key:?}"),
        }
    }
}

/// Iterator returned by [`Node::items`].
#[derive(Debug, Clone)]
pub struct Items<'a> {
    inner: ItemsInner<'a>,
}

#[derive(Debug, Clone)]
enum ItemsInner<'a> {
    Object(indexmap::map::Values<'a, String, Node>),
    Array(slice::Iter<'a, Node>),
    Empty,
}

impl<'a> Iterator for Items<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ItemsInner::Object(it) => it.next(),
            ItemsInner::Array(it) => it.next(),
            ItemsInner::Empty => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            ItemsInner::Object(it) => it.size_hint(),
            ItemsInner::Array(it) => it.size_hint(),
            ItemsInner::Empty => (0, Some(0)),
        }
    }
}

impl DoubleEndedIterator for Items<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ItemsInner::Object(it) => it.next_back(),
            ItemsInner::Array(it) => it.next_back(),
            ItemsInner::Empty => None,
        }
    }
}

impl ExactSizeIterator for Items<'_> {}

impl FusedIterator for Items<'_> {}
