//! Support for the JSON interchange format.
//!
//! The document is the matrix itself, pretty-printed:
//!
//! ```json
//! {
//!   "messages": {
//!     "welcome.title": { "en": "Hi", "fr": "Salut" }
//!   }
//! }
//! ```
//!
//! JSON is keyed rather than columnar, so a row only carries the languages it
//! has values for. Those are written in the requested column order.
use std::io::{BufRead, Write};

use serde_json::{Map, Value};

use crate::{
    error::Error, matrix::LanguageMatrix, traits::TabularCodec, tree::json_kind,
};

pub struct JsonCodec;

impl TabularCodec for JsonCodec {
    fn from_reader<R: BufRead>(reader: R) -> Result<LanguageMatrix, Error> {
        let document: Value = serde_json::from_reader(reader)?;
        let files = expect_object(document, "document")?;

        let mut matrix = LanguageMatrix::new();
        for (file, keys) in files {
            for (key, values) in expect_object(keys, &file)? {
                let row = matrix.row_mut(file.as_str(), key.as_str());
                for (language, value) in expect_object(values, &format!("{file}.{key}"))? {
                    match value {
                        Value::String(value) => {
                            row.insert(language, value);
                        }
                        other => {
                            return Err(Error::value_type(
                                format!("{file}.{key}.{language}"),
                                json_kind(&other),
                            ));
                        }
                    }
                }
            }
        }
        Ok(matrix)
    }

    fn to_writer<W: Write>(
        matrix: &LanguageMatrix,
        languages: &[String],
        writer: W,
    ) -> Result<(), Error> {
        let mut document = Map::new();
        for row in matrix.rows() {
            let mut values = Map::new();
            for language in languages {
                if let Some(value) = row.values.get(language) {
                    values.insert(language.clone(), Value::String(value.clone()));
                }
            }
            for (language, value) in row.values {
                if !values.contains_key(language) {
                    values.insert(language.clone(), Value::String(value.clone()));
                }
            }
            let file = document
                .entry(row.file)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(keys) = file {
                keys.insert(row.key.to_string(), Value::Object(values));
            }
        }
        serde_json::to_writer_pretty(writer, &Value::Object(document))?;
        Ok(())
    }
}

fn expect_object(value: Value, at: &str) -> Result<Map<String, Value>, Error> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::malformed(format!(
            "expected an object at `{at}`, found {}",
            json_kind(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_nested_object() {
        let mut matrix = LanguageMatrix::new();
        matrix.insert("messages", "welcome.title", "fr", "Salut");
        matrix.insert("messages", "welcome.title", "en", "Hi");

        let bytes = JsonCodec::encode(&matrix, &["en".to_string(), "fr".to_string()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains('\n'), "output should be pretty-printed");
        assert!(text.find("\"en\"").unwrap() < text.find("\"fr\"").unwrap());
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({"messages": {"welcome.title": {"en": "Hi", "fr": "Salut"}}})
        );
    }

    #[test]
    fn test_encode_keeps_unicode_unescaped() {
        let mut matrix = LanguageMatrix::new();
        matrix.insert("messages", "hello", "ja", "こんにちは");
        let bytes = JsonCodec::encode(&matrix, &["ja".to_string()]).unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains("こんにちは"));
    }

    #[test]
    fn test_decode() {
        let content = r#"{"messages": {"a.b": {"en": "X", "fr": ""}}}"#;
        let matrix = JsonCodec::decode(content.as_bytes()).unwrap();
        assert_eq!(matrix.get("messages", "a.b", "en"), Some("X"));
        assert_eq!(matrix.get("messages", "a.b", "fr"), Some(""));
    }

    #[test]
    fn test_decode_non_string_value_is_type_error() {
        let content = r#"{"messages": {"count": {"en": 3}}}"#;
        match JsonCodec::decode(content.as_bytes()).unwrap_err() {
            Error::ValueTypeError { path, found } => {
                assert_eq!(path, "messages.count.en");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_wrong_shape_is_malformed() {
        assert!(matches!(
            JsonCodec::decode(br#"["messages"]"#),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            JsonCodec::decode(br#"{"messages": {"a": "flat"}}"#),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(matches!(
            JsonCodec::decode(b"{ nope"),
            Err(Error::Parse(_))
        ));
    }
}
