//! Support for the XML interchange format.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <translations>
//!   <messages>
//!     <entry key="welcome.title">
//!       <en>Hi</en>
//!       <fr>Salut</fr>
//!     </entry>
//!   </messages>
//! </translations>
//! ```
//!
//! File ids and language codes become element names, so they must be valid
//! XML names. Values and keys are entity-escaped. Like JSON, a row only
//! carries the languages it has values for.
use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{error::Error, matrix::LanguageMatrix, traits::TabularCodec};

const ROOT: &str = "translations";
const ENTRY: &str = "entry";
const KEY_ATTR: &str = "key";

pub struct XmlCodec;

impl TabularCodec for XmlCodec {
    fn from_reader<R: BufRead>(reader: R) -> Result<LanguageMatrix, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        let mut buf = Vec::new();
        let mut matrix = LanguageMatrix::new();

        let mut depth = 0usize;
        let mut seen_root = false;
        let mut file: Option<String> = None;
        let mut key: Option<String> = None;
        let mut language: Option<String> = None;
        let mut text = String::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let name = element_name(e)?;
                    match depth {
                        0 => seen_root = expect_root(&name)?,
                        1 => file = Some(name),
                        2 => {
                            let entry_key = entry_key(e, &name)?;
                            matrix.row_mut(current(&file)?, entry_key.as_str());
                            key = Some(entry_key);
                        }
                        3 => {
                            language = Some(name);
                            text.clear();
                        }
                        _ => {
                            return Err(Error::malformed(format!(
                                "unexpected element <{name}> inside a language value"
                            )));
                        }
                    }
                    depth += 1;
                }
                Event::Empty(ref e) => {
                    let name = element_name(e)?;
                    match depth {
                        0 => seen_root = expect_root(&name)?,
                        1 => {}
                        2 => {
                            let entry_key = entry_key(e, &name)?;
                            matrix.row_mut(current(&file)?, entry_key);
                        }
                        3 => {
                            matrix.insert(current(&file)?, current(&key)?, name, "");
                        }
                        _ => {
                            return Err(Error::malformed(format!(
                                "unexpected element <{name}> inside a language value"
                            )));
                        }
                    }
                }
                Event::Text(e) if depth == 4 => {
                    text.push_str(&e.unescape()?);
                }
                Event::CData(e) if depth == 4 => {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    match depth {
                        3 => {
                            let lang = language.take().unwrap_or_default();
                            matrix.insert(
                                current(&file)?,
                                current(&key)?,
                                lang,
                                std::mem::take(&mut text),
                            );
                        }
                        2 => key = None,
                        1 => file = None,
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !seen_root {
            return Err(Error::malformed(format!("missing <{ROOT}> root element")));
        }
        Ok(matrix)
    }

    fn to_writer<W: Write>(
        matrix: &LanguageMatrix,
        languages: &[String],
        writer: W,
    ) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(writer, b' ', 2);
        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new(ROOT)))?;

        for file in matrix.files() {
            ensure_xml_name(file, "file id")?;
            xml_writer.write_event(Event::Start(BytesStart::new(file)))?;
            for (key, values) in matrix.file(file).into_iter().flatten() {
                let mut entry = BytesStart::new(ENTRY);
                entry.push_attribute((KEY_ATTR, key.as_str()));
                xml_writer.write_event(Event::Start(entry))?;

                let ordered = languages
                    .iter()
                    .filter_map(|l| values.get_key_value(l))
                    .chain(values.iter().filter(|(l, _)| !languages.contains(*l)));
                for (language, value) in ordered {
                    ensure_xml_name(language, "language code")?;
                    xml_writer.write_event(Event::Start(BytesStart::new(language.as_str())))?;
                    xml_writer.write_event(Event::Text(BytesText::new(value)))?;
                    xml_writer.write_event(Event::End(BytesEnd::new(language.as_str())))?;
                }
                xml_writer.write_event(Event::End(BytesEnd::new(ENTRY)))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new(file)))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
        xml_writer.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

fn element_name(e: &BytesStart) -> Result<String, Error> {
    std::str::from_utf8(e.name().as_ref())
        .map(str::to_string)
        .map_err(|err| Error::malformed(format!("element name is not UTF-8: {err}")))
}

fn expect_root(name: &str) -> Result<bool, Error> {
    if name == ROOT {
        Ok(true)
    } else {
        Err(Error::malformed(format!(
            "expected <{ROOT}> root element, found <{name}>"
        )))
    }
}

fn entry_key(e: &BytesStart, name: &str) -> Result<String, Error> {
    if name != ENTRY {
        return Err(Error::malformed(format!(
            "expected <{ENTRY}>, found <{name}>"
        )));
    }
    let attr = e
        .try_get_attribute(KEY_ATTR)
        .map_err(quick_xml::Error::from)?
        .ok_or_else(|| Error::malformed(format!("<{ENTRY}> is missing the `{KEY_ATTR}` attribute")))?;
    Ok(attr.unescape_value()?.into_owned())
}

fn current(slot: &Option<String>) -> Result<&str, Error> {
    slot.as_deref()
        .ok_or_else(|| Error::malformed("element outside of a file or entry"))
}

/// Element names: a letter or `_` first, then letters, digits, `_`, `-`, `.`.
fn ensure_xml_name(name: &str, what: &str) -> Result<(), Error> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        _ => false,
    };
    if valid && !name.to_ascii_lowercase().starts_with("xml") {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "{what} `{name}` cannot be used as an XML element name"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn en_fr() -> Vec<String> {
        vec!["en".to_string(), "fr".to_string()]
    }

    #[test]
    fn test_encode_layout() {
        let mut matrix = LanguageMatrix::new();
        matrix.insert("messages", "welcome.title", "en", "Hi");
        matrix.insert("messages", "welcome.title", "fr", "Salut");

        let text = String::from_utf8(XmlCodec::encode(&matrix, &en_fr()).unwrap()).unwrap();
        assert_eq!(
            text,
            indoc! {r#"
                <?xml version="1.0" encoding="UTF-8"?>
                <translations>
                  <messages>
                    <entry key="welcome.title">
                      <en>Hi</en>
                      <fr>Salut</fr>
                    </entry>
                  </messages>
                </translations>
            "#}
        );
    }

    #[test]
    fn test_encode_escapes_values() {
        let mut matrix = LanguageMatrix::new();
        matrix.insert("messages", "html", "en", "<b>Tom & \"Jerry\"</b>");
        let text = String::from_utf8(XmlCodec::encode(&matrix, &en_fr()).unwrap()).unwrap();
        assert!(text.contains("&lt;b&gt;Tom &amp;"));

        let decoded = XmlCodec::decode(text.as_bytes()).unwrap();
        assert_eq!(decoded, matrix);
    }

    #[test]
    fn test_encode_rejects_bad_element_names() {
        let mut matrix = LanguageMatrix::new();
        matrix.insert("1messages", "a", "en", "x");
        assert!(matches!(
            XmlCodec::encode(&matrix, &en_fr()),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_decode_preserves_whitespace_in_values() {
        let content = indoc! {r#"
            <translations>
              <messages>
                <entry key="padded"><en>  two spaces  </en><fr/></entry>
              </messages>
            </translations>
        "#};
        let matrix = XmlCodec::decode(content.as_bytes()).unwrap();
        assert_eq!(matrix.get("messages", "padded", "en"), Some("  two spaces  "));
        assert_eq!(matrix.get("messages", "padded", "fr"), Some(""));
    }

    #[test]
    fn test_decode_missing_root_is_malformed() {
        assert!(matches!(
            XmlCodec::decode(b"<?xml version=\"1.0\"?>"),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            XmlCodec::decode(b"<strings><messages/></strings>"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_decode_entry_without_key_is_malformed() {
        let content = "<translations><messages><entry><en>x</en></entry></messages></translations>";
        let err = XmlCodec::decode(content.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(ref m) if m.contains("key")));
    }

    #[test]
    fn test_decode_empty_root() {
        let matrix = XmlCodec::decode(b"<translations/>").unwrap();
        assert!(matrix.is_empty());
    }
}
