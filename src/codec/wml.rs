//! Small helpers over the quick-xml writer for WordprocessingML output

use crate::error::Result;
use crate::xml;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Write `<name attr="..."/>`
pub fn empty<W: Write>(writer: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(name);
    for attr in attrs {
        elem.push_attribute(*attr);
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// Write `<name attr="...">`
pub fn start<W: Write>(writer: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(name);
    for attr in attrs {
        elem.push_attribute(*attr);
    }
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

/// Write `</name>`
pub fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write `<name attrs>text</name>`
pub fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    start(writer, name, attrs)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, name)
}

/// Serialize a complete part: declaration, root element with namespaces and
/// the content produced by `body`
pub fn part<F>(root: &str, minimal_namespaces: bool, body: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Writer<&mut Vec<u8>>) -> Result<()>,
{
    let mut buf = Vec::new();
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let namespaces = if minimal_namespaces {
        xml::minimal_document_namespaces()
    } else {
        xml::document_namespaces()
    };
    start(&mut writer, root, &namespaces)?;
    body(&mut writer)?;
    end(&mut writer, root)?;

    Ok(buf)
}
