//! XBRL instance document reader.
//!
//! Instance documents are flat XML files where every fact is an element named
//! after its concept, e.g. `<us-gaap:Revenues contextRef="FY2022" ...>394328000000</us-gaap:Revenues>`.
//! The same concept usually appears several times for different contexts
//! (current year, prior years, segments); only the first occurrence in document
//! order is reported.
//!
//! Element names are compared ASCII case-insensitively on the qualified name
//! (prefix included), so `dei:documentperiodenddate` finds
//! `<dei:DocumentPeriodEndDate>`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use crate::Result;

/// Tag holding the end date of the reporting period covered by the document.
pub const PERIOD_END_TAG: &str = "dei:documentperiodenddate";

struct Capture {
    tag: String,
    depth: usize,
    text: String,
}

fn lowercase_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).to_ascii_lowercase()
}

fn reader(content: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(content);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    reader
}

/// Returns the text of the first element matching each requested tag.
///
/// Keys of the returned map are the lower-cased tags. Tags with no matching
/// element are absent from the map; a matching empty element maps to `""`. The
/// text of an element includes the text of all its descendants.
///
/// # Errors
///
/// Returns `EdgarError::XmlError` if the document is not well-formed enough for
/// the reader to continue.
pub fn first_texts<S: AsRef<str>>(content: &str, tags: &[S]) -> Result<HashMap<String, String>> {
    let wanted: BTreeSet<String> = tags
        .iter()
        .map(|tag| tag.as_ref().to_ascii_lowercase())
        .collect();
    let mut found: HashMap<String, String> = HashMap::new();
    let mut active: Vec<Capture> = Vec::new();
    let mut reader = reader(content);

    loop {
        if found.len() == wanted.len() && active.is_empty() {
            break;
        }
        match reader.read_event()? {
            Event::Start(ref e) => {
                for capture in active.iter_mut() {
                    capture.depth += 1;
                }
                let name = lowercase_name(e);
                if wanted.contains(&name)
                    && !found.contains_key(&name)
                    && !active.iter().any(|c| c.tag == name)
                {
                    active.push(Capture {
                        tag: name,
                        depth: 1,
                        text: String::new(),
                    });
                }
            }
            Event::Empty(ref e) => {
                let name = lowercase_name(e);
                if wanted.contains(&name)
                    && !found.contains_key(&name)
                    && !active.iter().any(|c| c.tag == name)
                {
                    found.insert(name, String::new());
                }
            }
            Event::End(_) => {
                for capture in active.iter_mut() {
                    capture.depth -= 1;
                }
                let (closed, open): (Vec<Capture>, Vec<Capture>) =
                    active.drain(..).partition(|c| c.depth == 0);
                active = open;
                for capture in closed {
                    found.insert(capture.tag, capture.text);
                }
            }
            Event::Text(ref t) if !active.is_empty() => {
                let text = t
                    .unescape()
                    .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(t).into_owned()));
                for capture in active.iter_mut() {
                    capture.text.push_str(&text);
                }
            }
            Event::CData(ref c) if !active.is_empty() => {
                let text = String::from_utf8_lossy(c);
                for capture in active.iter_mut() {
                    capture.text.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Elements left open at the end of a truncated document keep what was read.
    for capture in active {
        found.entry(capture.tag).or_insert(capture.text);
    }

    Ok(found)
}

/// Returns the distinct lower-cased element names used in the document.
pub fn tag_names(content: &str) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    let mut reader = reader(content);

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                names.insert(lowercase_name(e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(names)
}
