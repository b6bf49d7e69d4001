#![no_main]

use arbitrary::Arbitrary;
use jsonnode::{Node, Parser, ParserOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    buffer_size: u8,
    deny_warnings: bool,
}

fuzz_target!(|input: Input| {
    let parser = Parser::new(ParserOptions {
        buffer_size: usize::from(input.buffer_size),
        deny_warnings: input.deny_warnings,
    });
    let Ok(doc) = parser.parse_str(&input.text) else {
        return;
    };

    // Byte-stream decoding must agree with in-memory parsing.
    let streamed = parser.parse_reader(input.text.as_bytes()).unwrap();
    assert_eq!(streamed, doc);

    if doc.root == Node::bare("") {
        return;
    }
    let text = doc.root.to_text();
    let again = Parser::default().parse_str(&text).unwrap();
    assert_eq!(again.root, doc.root, "{text}");
    assert!(again.warnings.is_empty(), "{:?}", again.warnings);
    assert_eq!(again.root.to_text(), text);
});
