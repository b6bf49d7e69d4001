//! Text output: the fixed JSON rendering and the diagnostic tree dump.

use core::fmt::{self, Write};

use super::{Node, Scalar, ScalarStyle};

/// Escapes `src` for inclusion in a JSON string literal.
///
/// Only the characters the parser decodes from escapes are escaped:
/// backslash, quote, line feed, carriage return, tab, backspace and form
/// feed. Everything else is written as is.
pub(crate) fn write_escaped_string<W: Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style() {
            ScalarStyle::Bare if !self.text().is_empty() => f.write_str(self.text()),
            _ => {
                f.write_char('"')?;
                write_escaped_string(self.text(), f)?;
                f.write_char('"')
            }
        }
    }
}

/// A pending piece of output in [`Node`]'s `Display` walk.
enum Step<'a> {
    Node(&'a Node),
    Key(&'a str),
    Text(&'static str),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut steps = vec![Step::Node(self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Key(key) => {
                    f.write_char('"')?;
                    write_escaped_string(key, f)?;
                    f.write_str("\":")?;
                }
                Step::Node(Node::Scalar(s)) => fmt::Display::fmt(s, f)?,
                Step::Node(Node::Array(arr)) => {
                    f.write_str("[ ")?;
                    steps.push(Step::Text(" ]"));
                    for (i, v) in arr.iter().enumerate().rev() {
                        steps.push(Step::Node(v));
                        if i > 0 {
                            steps.push(Step::Text(", "));
                        }
                    }
                }
                Step::Node(Node::Object(map)) => {
                    f.write_char('{')?;
                    steps.push(Step::Text("}"));
                    for (i, (k, v)) in map.iter().enumerate().rev() {
                        steps.push(Step::Node(v));
                        steps.push(Step::Key(k));
                        if i > 0 {
                            steps.push(Step::Text(", "));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Node {
    /// Serializes the node in the fixed compact form: `{"k":v, "k2":v2}` for
    /// objects, `[ v, v ]` for arrays, quoted or bare text for scalars.
    ///
    /// ```
    /// let root = jsonnode::Parser::default().parse_str(r#"{"x":1}"#).unwrap().root;
    /// assert_eq!(root.to_text(), r#"{"x":1}"#);
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Writes an indented outline of the tree, one node per line.
    ///
    /// This is for inspection only; the output is not JSON.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn print_tree<W: Write>(&self, out: &mut W) -> fmt::Result {
        // (node, indentation, member key, is last sibling)
        let mut pending: Vec<(&Node, String, Option<&str>, bool)> =
            vec![(self, String::new(), None, true)];
        while let Some((node, prefix, label, last)) = pending.pop() {
            out.write_str(&prefix)?;
            out.write_str(if last { "\\-" } else { "|-" })?;
            if let Some(key) = label {
                write!(out, "{key}: ")?;
            }
            match node {
                Node::Object(_) => out.write_str("{}")?,
                Node::Array(_) => out.write_str("[]")?,
                Node::Scalar(s) => out.write_str(s.text())?,
            }
            out.write_char('\n')?;

            let child_prefix = format!("{prefix}{}", if last { "  " } else { "| " });
            let count = node.len();
            match node {
                Node::Object(map) => {
                    for (i, (k, v)) in map.iter().enumerate().rev() {
                        pending.push((v, child_prefix.clone(), Some(k), i + 1 == count));
                    }
                }
                Node::Array(arr) => {
                    for (i, v) in arr.iter().enumerate().rev() {
                        pending.push((v, child_prefix.clone(), None, i + 1 == count));
                    }
                }
                Node::Scalar(_) => {}
            }
        }
        Ok(())
    }

    /// [`Node::print_tree`] into a `String`.
    #[must_use]
    pub fn tree_string(&self) -> String {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.print_tree(&mut out);
        out
    }
}
