use quickcheck::{Arbitrary, Gen};

use crate::{Map, Node, Scalar};

/// A finite `f64`; bare scalars must re-lex as a single token.
#[derive(Debug, Copy, Clone, PartialEq)]
struct FiniteNumber(f64);

impl Arbitrary for FiniteNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

fn scalar(g: &mut Gen) -> Scalar {
    match usize::arbitrary(g) % 6 {
        0 => Scalar::bare("null"),
        1 => Scalar::from(bool::arbitrary(g)),
        2 => Scalar::from(i64::arbitrary(g)),
        3 => Scalar::from(FiniteNumber::arbitrary(g).0),
        _ => Scalar::quoted(String::arbitrary(g)),
    }
}

fn key(g: &mut Gen) -> String {
    let mut key = String::arbitrary(g);
    if key.is_empty() {
        key.push('k');
    }
    key
}

fn container(g: &mut Gen, depth: usize) -> Node {
    let len = usize::arbitrary(g) % 4;
    let child = |g: &mut Gen| {
        if depth == 0 || bool::arbitrary(g) {
            Node::Scalar(scalar(g))
        } else {
            container(g, depth - 1)
        }
    };
    if bool::arbitrary(g) {
        Node::Array((0..len).map(|_| child(g)).collect())
    } else {
        let mut map = Map::new();
        for _ in 0..len {
            let k = key(g);
            let v = child(g);
            map.insert(k, v);
        }
        Node::Object(map)
    }
}

/// Trees whose rendering parses back unchanged: the root is a container,
/// keys are non-empty, and bare scalars are numbers or literals.
impl Arbitrary for Node {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        container(g, depth)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Node::Array(arr) => Box::new(arr.shrink().map(Node::Array)),
            Node::Object(map) => {
                let map = map.clone();
                Box::new((0..map.len()).rev().map(move |i| {
                    let mut smaller = map.clone();
                    smaller.shift_remove_index(i);
                    Node::Object(smaller)
                }))
            }
            Node::Scalar(_) => quickcheck::empty_shrinker(),
        }
    }
}
