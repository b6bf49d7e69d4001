use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{Node, Scalar, ScalarStyle};

/// Bare scalars are emitted as the most specific JSON type their text
/// parses as; quoted scalars are always strings.
impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.style() == ScalarStyle::Quoted {
            return serializer.serialize_str(self.text());
        }
        let text = self.text().trim();
        if text == "null" {
            serializer.serialize_unit()
        } else if let Some(b) = self.parse_bool() {
            serializer.serialize_bool(b)
        } else if let Ok(n) = text.parse::<i64>() {
            serializer.serialize_i64(n)
        } else if let Ok(n) = text.parse::<u64>() {
            serializer.serialize_u64(n)
        } else if let Some(n) = text.parse::<f64>().ok().filter(|n| n.is_finite()) {
            serializer.serialize_f64(n)
        } else {
            serializer.serialize_str(self.text())
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(s) => s.serialize(serializer),
            Node::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Node::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::Parser;

    #[test]
    fn serializes_to_typed_json() {
        let root = Parser::default()
            .parse_str(r#"{"s":"1","i":-2,"u":18446744073709551615,"f":1.5,"b":true,"n":null,"w":abc,"a":[{}]}"#)
            .unwrap()
            .root;
        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            json!({
                "s": "1",
                "i": -2,
                "u": 18_446_744_073_709_551_615_u64,
                "f": 1.5,
                "b": true,
                "n": null,
                "w": "abc",
                "a": [{}],
            })
        );
    }

    #[test]
    fn key_order_is_preserved() {
        let root = Parser::default().parse_str(r#"{"z":1,"a":2,"m":3}"#).unwrap().root;
        assert_eq!(serde_json::to_string(&root).unwrap(), r#"{"z":1,"a":2,"m":3}"#);
    }
}
