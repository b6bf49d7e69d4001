#![allow(missing_docs, dead_code)]

use jsonnode::{Node, ScalarStyle};
use serde_json::Value;

pub const ORIGINAL: &str = r#"
{
    "moderation": {
        "decision": "allow",
        "reason": null
    },
    "request": {
        "filename": "example.rs",
        "language": "rust",
        "options": {
            "opt_level": 2,
            "features": [
                "serde",
                "tokio"
            ]
        }
    },
    "snippets": [
        "fn main() {}",
        "println!(\"hi\")\n"
    ],
    "entities": [
        {
            "type": "function",
            "name": "main",
            "public": false
        },
        {
            "type": "macro",
            "name": "println",
            "public": true
        }
    ],
    "matrix": [
        [1, 2.5, -3e2],
        []
    ],
    "mixed": ["s", {"k": "v"}, "t", ["u"], "end"],
    "unicode": "café 😀 中",
    "empty": {}
}"#;

/// Asserts that `node` has the structure `serde_json` reads from the same
/// text. Numbers are compared by value, since the tree keeps their text.
#[track_caller]
pub fn assert_matches_serde(node: &Node, value: &Value) {
    match (node, value) {
        (Node::Object(map), Value::Object(expected)) => {
            assert_eq!(
                map.keys().collect::<Vec<_>>(),
                expected.keys().collect::<Vec<_>>()
            );
            for (child, expected) in map.values().zip(expected.values()) {
                assert_matches_serde(child, expected);
            }
        }
        (Node::Array(arr), Value::Array(expected)) => {
            assert_eq!(arr.len(), expected.len());
            for (child, expected) in arr.iter().zip(expected) {
                assert_matches_serde(child, expected);
            }
        }
        (Node::Scalar(s), Value::String(expected)) => {
            assert_eq!(s.style(), ScalarStyle::Quoted);
            assert_eq!(s.text(), expected);
        }
        (Node::Scalar(s), Value::Number(expected)) => {
            assert_eq!(s.style(), ScalarStyle::Bare);
            assert_eq!(Some(s.as_f64()), expected.as_f64(), "{}", s.text());
        }
        (Node::Scalar(s), Value::Bool(expected)) => {
            assert_eq!(s.style(), ScalarStyle::Bare);
            assert_eq!(s.as_bool(), *expected);
        }
        (Node::Scalar(s), Value::Null) => {
            assert_eq!(s, &jsonnode::Scalar::bare("null"));
        }
        (node, value) => panic!("{node} does not match {value}"),
    }
}
