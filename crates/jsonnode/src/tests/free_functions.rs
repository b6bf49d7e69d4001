use std::{io::Cursor, sync::Arc};

use crate::{Node, SyntaxError, clear_cache, parse, parse_reader};

#[test]
fn parse_returns_a_shared_tree() {
    let root = parse(r#"{"x":1}"#).unwrap();
    assert_eq!(root.to_text(), r#"{"x":1}"#);

    let mut edited = Arc::clone(&root);
    Arc::make_mut(&mut edited)["x"].set_i32(5);
    assert_eq!(root["x"].as_i32(), 1);
    assert_eq!(edited["x"].as_i32(), 5);
    assert_eq!(*parse(r#"{"x":1}"#).unwrap(), *root);

    clear_cache();
    assert_eq!(*parse(r#"{"x":1}"#).unwrap(), *root);
}

#[test]
fn parse_reports_errors() {
    let err = parse(r#"{"a":1}}"#).unwrap_err();
    assert_eq!(err.syntax_error(), Some(&SyntaxError::UnexpectedClose('}')));
    assert_eq!((err.line, err.column), (1, 8));
}

#[test]
fn parse_reader_streams_bytes() {
    let root = parse_reader(Cursor::new("[\"caf\u{e9}\", 2]".as_bytes())).unwrap();
    assert_eq!(root[0], Node::scalar("caf\u{e9}"));
    assert_eq!(root[1].as_f64(), 2.0);
}
