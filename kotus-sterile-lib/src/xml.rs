// Reading and writing the Kotus word list XML.
//
//   <kotus-sanalista>
//     <st><s>kuusi</s><hn>1</hn><t><tn>27</tn><av>D</av></t></st>
//   </kotus-sanalista>

use std::path::Path;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;

use crate::error::{Result, SterileError};
use crate::types::{Entry, Sense};

pub const ROOT_ELEMENT: &str = "kotus-sanalista";
pub const DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>";

/// Parse a word list document into entries, in document order.
///
/// `origin` is only used to label format errors.
pub fn parse_corpus(xml: &str, origin: &Path) -> Result<Vec<Entry>> {
    let mut reader = Reader::from_str(xml);
    let format_error = |message: String| SterileError::CorpusFormat {
        path: origin.to_path_buf(),
        message,
    };

    let mut entries = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if !seen_root => {
                if e.name().as_ref() != ROOT_ELEMENT.as_bytes() {
                    return Err(format_error(format!(
                        "expected <{ROOT_ELEMENT}> root, found <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                seen_root = true;
            }
            Ok(Event::Empty(ref e)) if !seen_root => {
                if e.name().as_ref() != ROOT_ELEMENT.as_bytes() {
                    return Err(format_error("document has no word list root".to_string()));
                }
                return Ok(entries);
            }
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"st" => {
                let entry = read_entry(&mut reader, entries.len())
                    .map_err(|err| err.into_error(entries.len(), origin))?;
                entries.push(entry);
            }
            Ok(Event::Start(ref e)) => {
                skip_unknown(&mut reader, e).map_err(|err| format_error(err.to_string()))?;
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"st" => {
                return Err(SterileError::MalformedEntry {
                    index: entries.len(),
                    reason: "empty <st> element has no headword".to_string(),
                });
            }
            Ok(Event::End(_)) => {
                // Only the root can close at this depth.
                break;
            }
            Ok(Event::Eof) => {
                if !seen_root {
                    return Err(format_error("document has no word list root".to_string()));
                }
                return Err(format_error(format!("unclosed <{ROOT_ELEMENT}> element")));
            }
            Err(e) => {
                return Err(format_error(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(entries)
}

/// Serialize entries back into a word list document.
pub fn serialize_corpus<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut out = String::new();
    out.push_str(DECLARATION);
    out.push('\n');
    out.push_str(&format!("<{ROOT_ELEMENT}>\n"));
    for entry in entries {
        write_entry(&mut out, entry);
        out.push('\n');
    }
    out.push_str(&format!("</{ROOT_ELEMENT}>\n"));
    out
}

fn write_entry(out: &mut String, entry: &Entry) {
    out.push_str("<st><s>");
    out.push_str(&escape(entry.headword.as_str()));
    out.push_str("</s>");
    if let Some(hn) = entry.homonym {
        out.push_str(&format!("<hn>{hn}</hn>"));
    }
    for sense in &entry.senses {
        out.push_str(&format!("<t><tn>{}</tn>", sense.category_code));
        if let Some(av) = &sense.gradation {
            out.push_str("<av>");
            out.push_str(&escape(av.as_str()));
            out.push_str("</av>");
        }
        out.push_str("</t>");
    }
    out.push_str("</st>");
}

/// Problems found inside a single `<st>` block.
enum EntryError {
    Malformed(String),
    Xml(String),
}

impl EntryError {
    fn into_error(self, index: usize, origin: &Path) -> SterileError {
        match self {
            EntryError::Malformed(reason) => SterileError::MalformedEntry { index, reason },
            EntryError::Xml(message) => SterileError::CorpusFormat {
                path: origin.to_path_buf(),
                message: format!("in entry #{index}: {message}"),
            },
        }
    }
}

impl From<quick_xml::Error> for EntryError {
    fn from(e: quick_xml::Error) -> Self {
        EntryError::Xml(e.to_string())
    }
}

/// Read the children of the current `<st>` element.
fn read_entry(reader: &mut Reader<&[u8]>, index: usize) -> Result<Entry, EntryError> {
    let mut headword: Option<String> = None;
    let mut homonym: Option<u32> = None;
    let mut senses = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"s" => headword = Some(read_text(reader, b"s")?),
                b"hn" => {
                    let raw = read_text(reader, b"hn")?;
                    let hn = raw.trim().parse::<u32>().map_err(|_| {
                        EntryError::Malformed(format!("homonym number {raw:?} is not numeric"))
                    })?;
                    homonym = Some(hn);
                }
                b"t" => senses.push(read_sense(reader)?),
                _ => {
                    tracing::warn!(entry = index, "skipping unknown element in entry");
                    skip_unknown(reader, e)?;
                }
            },
            Event::Empty(ref e) if e.name().as_ref() == b"t" => {
                return Err(EntryError::Malformed(
                    "sense has no category code".to_string(),
                ));
            }
            Event::Empty(ref e) if e.name().as_ref() == b"s" => {
                headword = Some(String::new());
            }
            Event::End(ref e) if e.name().as_ref() == b"st" => break,
            Event::Eof => return Err(EntryError::Xml("unclosed <st> element".to_string())),
            _ => {}
        }
    }

    let headword = headword
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EntryError::Malformed("entry has no headword".to_string()))?;

    Ok(Entry {
        headword,
        homonym,
        senses,
    })
}

/// Read the children of the current `<t>` element.
fn read_sense(reader: &mut Reader<&[u8]>) -> Result<Sense, EntryError> {
    let mut code: Option<u16> = None;
    let mut gradation: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"tn" => {
                    let raw = read_text(reader, b"tn")?;
                    let parsed = raw.trim().parse::<u16>().map_err(|_| {
                        EntryError::Malformed(format!("category code {raw:?} is not numeric"))
                    })?;
                    code = Some(parsed);
                }
                b"av" => gradation = Some(read_text(reader, b"av")?.trim().to_string()),
                _ => skip_unknown(reader, e)?,
            },
            Event::End(ref e) if e.name().as_ref() == b"t" => break,
            Event::Eof => return Err(EntryError::Xml("unclosed <t> element".to_string())),
            _ => {}
        }
    }

    let category_code =
        code.ok_or_else(|| EntryError::Malformed("sense has no category code".to_string()))?;
    Ok(Sense {
        category_code,
        gradation,
    })
}

/// Collect the text content of a leaf element up to its closing tag.
fn read_text(reader: &mut Reader<&[u8]>, tag: &[u8]) -> Result<String, EntryError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(ref e) => text.push_str(&e.unescape()?),
            Event::CData(ref e) => text.push_str(&String::from_utf8_lossy(e)),
            Event::End(ref e) if e.name().as_ref() == tag => break,
            Event::Start(_) => {
                return Err(EntryError::Xml(format!(
                    "unexpected child element inside <{}>",
                    String::from_utf8_lossy(tag)
                )))
            }
            Event::Eof => {
                return Err(EntryError::Xml(format!(
                    "unclosed <{}> element",
                    String::from_utf8_lossy(tag)
                )))
            }
            _ => {}
        }
    }
    Ok(text)
}

fn skip_unknown(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<(), quick_xml::Error> {
    let name = start.name().as_ref().to_vec();
    reader.read_to_end(QName(&name))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Vec<Entry>> {
        parse_corpus(xml, Path::new("test.xml"))
    }

    #[test]
    fn test_parse_simple() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<kotus-sanalista>
  <st><s>lukija</s><t><tn>10</tn></t></st>
  <st><s>lukea</s><t><tn>58</tn><av>A</av></t></st>
</kotus-sanalista>"#;
        let entries = parse(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], Entry::new("lukija", &[10]));
        assert_eq!(entries[1].headword, "lukea");
        assert_eq!(entries[1].senses[0].category_code, 58);
        assert_eq!(entries[1].senses[0].gradation.as_deref(), Some("A"));
    }

    #[test]
    fn test_parse_homograph_with_several_senses() {
        let xml = "<kotus-sanalista><st><s>kuusi</s><hn>1</hn>\
                   <t><tn>27</tn></t><t><tn>24</tn></t></st></kotus-sanalista>";
        let entries = parse(xml).unwrap();
        assert_eq!(entries[0].homonym, Some(1));
        let codes: Vec<u16> = entries[0].senses.iter().map(|s| s.category_code).collect();
        assert_eq!(codes, vec![27, 24]);
    }

    #[test]
    fn test_entry_without_senses_is_kept_by_parser() {
        let entries = parse("<kotus-sanalista><st><s>aah</s></st></kotus-sanalista>").unwrap();
        assert!(entries[0].senses.is_empty());
    }

    #[test]
    fn test_missing_headword() {
        let err = parse(
            "<kotus-sanalista><st><s>a</s><t><tn>1</tn></t></st>\
             <st><t><tn>1</tn></t></st></kotus-sanalista>",
        )
        .unwrap_err();
        assert!(matches!(err, SterileError::MalformedEntry { index: 1, .. }));
    }

    #[test]
    fn test_missing_category_code() {
        let err = parse("<kotus-sanalista><st><s>a</s><t><av>A</av></t></st></kotus-sanalista>")
            .unwrap_err();
        assert!(matches!(err, SterileError::MalformedEntry { index: 0, .. }));

        let err =
            parse("<kotus-sanalista><st><s>a</s><t/></st></kotus-sanalista>").unwrap_err();
        assert!(matches!(err, SterileError::MalformedEntry { index: 0, .. }));
    }

    #[test]
    fn test_non_numeric_category_code() {
        let err = parse("<kotus-sanalista><st><s>a</s><t><tn>x</tn></t></st></kotus-sanalista>")
            .unwrap_err();
        assert!(matches!(err, SterileError::MalformedEntry { .. }));
    }

    #[test]
    fn test_wrong_root() {
        let err = parse("<sanat><st><s>a</s></st></sanat>").unwrap_err();
        assert!(matches!(err, SterileError::CorpusFormat { .. }));
    }

    #[test]
    fn test_truncated_document() {
        let err = parse("<kotus-sanalista><st><s>a</s><t><tn>1</tn></t></st>").unwrap_err();
        assert!(matches!(err, SterileError::CorpusFormat { .. }));
    }

    #[test]
    fn test_unknown_elements_skipped() {
        let xml = "<kotus-sanalista><meta><x>1</x></meta>\
                   <st><s>a</s><note>n</note><t><tn>1</tn><q>z</q></t></st></kotus-sanalista>";
        let entries = parse(xml).unwrap();
        assert_eq!(entries, vec![Entry::new("a", &[1])]);
    }

    #[test]
    fn test_serialize_framing() {
        let out = serialize_corpus(&[Entry::new("ajo", &[1])]);
        assert_eq!(
            out,
            "<?xml version='1.0' encoding='utf-8'?>\n<kotus-sanalista>\n\
             <st><s>ajo</s><t><tn>1</tn></t></st>\n</kotus-sanalista>\n"
        );
    }

    #[test]
    fn test_serialize_preserves_homonym_gradation_and_escapes() {
        let entries = vec![
            Entry {
                headword: "kuusi".to_string(),
                homonym: Some(2),
                senses: vec![Sense {
                    category_code: 27,
                    gradation: Some("D".to_string()),
                }],
            },
            Entry::new("a&o", &[5]),
        ];
        let xml = serialize_corpus(&entries);
        assert!(xml.contains("<s>a&amp;o</s>"));
        assert_eq!(parse(&xml).unwrap(), entries);
    }

    #[test]
    fn test_empty_corpus() {
        assert!(parse("<kotus-sanalista/>").unwrap().is_empty());
        assert!(parse(&serialize_corpus(&Vec::<Entry>::new())).unwrap().is_empty());
    }
}
