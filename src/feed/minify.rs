//! XML minification over the `quick-xml` event stream.
//!
//! - comments are removed
//! - whitespace-only text between markup is dropped
//! - text next to markup is trimmed on that side
//! - attributes are rewritten with double quotes
//! - declarations, CDATA, entity references and other text stay as-is

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Minify an XML document.
pub fn minify_xml(xml: &str) -> quick_xml::Result<Vec<u8>> {
    let events = read_events(xml)?;
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Text(text) => {
                let prev_inline = i > 0 && is_inline(&events[i - 1]);
                let next_inline = events.get(i + 1).is_some_and(is_inline);
                if let Some(text) = trim_text(text, prev_inline, next_inline) {
                    writer.write_event(Event::Text(BytesText::from_escaped(text)))?;
                }
            }
            Event::Start(elem) => {
                writer.write_event(Event::Start(normalize_attributes(elem)?))?;
            }
            Event::Empty(elem) => {
                writer.write_event(Event::Empty(normalize_attributes(elem)?))?;
            }
            other => writer.write_event(other.borrow())?,
        }
    }

    Ok(writer.into_inner())
}

/// Read all events except comments.
fn read_events(xml: &str) -> quick_xml::Result<Vec<Event<'_>>> {
    let mut reader = Reader::from_str(xml);
    let mut events = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Comment(_) => {}
            event => events.push(event),
        }
    }
    Ok(events)
}

/// Events that are part of character data.
fn is_inline(event: &Event<'_>) -> bool {
    matches!(
        event,
        Event::Text(_) | Event::CData(_) | Event::GeneralRef(_)
    )
}

fn trim_text(text: &BytesText<'_>, prev_inline: bool, next_inline: bool) -> Option<String> {
    let raw = String::from_utf8_lossy(text);
    let mut s: &str = &raw;
    if !prev_inline {
        s = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    }
    if !next_inline {
        s = s.trim_end_matches(|c: char| c.is_ascii_whitespace());
    }
    (!s.is_empty()).then(|| s.to_string())
}

/// Rebuild a start tag with canonical `key="value"` attributes.
fn normalize_attributes(elem: &BytesStart<'_>) -> quick_xml::Result<BytesStart<'static>> {
    let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);

    for attr in elem.attributes() {
        let attr = attr?;
        out.push_attribute(Attribute {
            key: attr.key,
            value: Cow::Owned(escape_double_quotes(&attr.value)),
        });
    }
    Ok(out)
}

/// Values from single-quoted attributes may hold a raw `"`.
fn escape_double_quotes(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for &b in value {
        if b == b'"' {
            out.extend_from_slice(b"&quot;");
        } else {
            out.push(b);
        }
    }
    out
}
