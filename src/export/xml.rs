//! Element-level helpers over `quick_xml::Writer` shared by the Atom and RSS
//! documents.

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use super::ExportError;

/// `<name>value</name>`, written even when `value` is empty.
pub(crate) fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), ExportError> {
    text_element_with_attributes(writer, name, &[], value)
}

/// Like [`text_element`] but skipped entirely when `value` is empty.
pub(crate) fn optional_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), ExportError> {
    if value.is_empty() {
        return Ok(());
    }
    text_element(writer, name, value)
}

/// `<name a="b">value</name>`. Attributes with empty values are dropped.
pub(crate) fn text_element_with_attributes<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
    value: &str,
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(start_tag(name, attributes)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Attribute-only element, `<name a="b"/>`. Attributes with empty values are
/// dropped unless listed in `required`.
pub(crate) fn empty_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
    required: &[&str],
) -> Result<(), ExportError> {
    let mut tag = BytesStart::new(name);
    for &(key, value) in attributes {
        if !value.is_empty() || required.contains(&key) {
            tag.push_attribute((key, value));
        }
    }
    writer.write_event(Event::Empty(tag))?;
    Ok(())
}

/// `<name><![CDATA[value]]></name>`.
///
/// A literal `]]>` cannot appear inside one CDATA section, so the value is
/// split across consecutive sections at every occurrence.
pub(crate) fn cdata_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    for section in cdata_sections(value) {
        writer.write_event(Event::CData(BytesCData::new(section)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub(crate) fn start_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(start_tag(name, attributes)))?;
    Ok(())
}

pub(crate) fn end_element<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), ExportError> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn start_tag<'a>(name: &'a str, attributes: &[(&str, &str)]) -> BytesStart<'a> {
    let mut tag = BytesStart::new(name);
    for &(key, value) in attributes {
        if !value.is_empty() {
            tag.push_attribute((key, value));
        }
    }
    tag
}

fn cdata_sections(value: &str) -> Vec<String> {
    let parts: Vec<&str> = value.split("]]>").collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(idx, part)| {
            let mut section = String::with_capacity(part.len() + 3);
            if idx > 0 {
                section.push('>');
            }
            section.push_str(part);
            if idx < last {
                section.push_str("]]");
            }
            section
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Writer<Vec<u8>>) -> Result<(), ExportError>) -> String {
        let mut writer = Writer::new(Vec::new());
        f(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_text_element_escapes() {
        let out = render(|w| text_element(w, "title", "Tom & <Jerry>"));
        assert_eq!(out, "<title>Tom &amp; &lt;Jerry&gt;</title>");
    }

    #[test]
    fn test_text_element_empty_is_still_written() {
        let out = render(|w| text_element(w, "title", ""));
        assert_eq!(out, "<title></title>");
    }

    #[test]
    fn test_optional_text_element_skips_empty() {
        let out = render(|w| optional_text_element(w, "rights", ""));
        assert_eq!(out, "");
    }

    #[test]
    fn test_empty_element_drops_blank_attributes() {
        let out = render(|w| {
            empty_element(
                w,
                "link",
                &[("href", "https://a.example"), ("rel", ""), ("type", "text/html")],
                &[],
            )
        });
        assert_eq!(out, r#"<link href="https://a.example" type="text/html"/>"#);
    }

    #[test]
    fn test_empty_element_keeps_required_blank_attributes() {
        let out = render(|w| empty_element(w, "link", &[("href", "")], &["href"]));
        assert_eq!(out, r#"<link href=""/>"#);
    }

    #[test]
    fn test_cdata_element_plain() {
        let out = render(|w| cdata_element(w, "content:encoded", "<p>hi</p>"));
        assert_eq!(
            out,
            "<content:encoded><![CDATA[<p>hi</p>]]></content:encoded>"
        );
    }

    #[test]
    fn test_cdata_sections_split_terminator() {
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections(""), vec![""]);
    }
}
