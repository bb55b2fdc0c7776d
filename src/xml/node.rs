//! Element tree used to walk WordprocessingML parts and to build drawing markup

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

use crate::error::{Error, Result};

/// Node of an [`XmlElement`] tree
#[derive(Clone, Debug)]
pub enum XmlNode {
    /// Element node
    Element(XmlElement),
    /// Text node
    Text(String),
}

/// XML element with attributes and children
#[derive(Clone, Debug)]
pub struct XmlElement {
    /// Full element name (with prefix, e.g., "w:sectPr")
    pub name: String,
    /// Attributes as (name, value) pairs
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<XmlNode>,
    /// Whether this was a self-closing element
    pub self_closing: bool,
}

/// Elements whose whitespace-only text is significant
const TEXT_ELEMENTS: &[&str] = &["t", "instrText", "delText"];

impl XmlElement {
    /// Create a new empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Parse a whole XML part and return its root element
    pub fn parse_document(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let start = e.into_owned();
                    return Self::from_reader(&mut reader, &start);
                }
                Event::Empty(e) => return Ok(Self::from_empty(&e)),
                Event::Eof => return Err(Error::InvalidDocument("no root element".into())),
                _ => {}
            }
            buf.clear();
        }
    }

    /// Read a complete element from XML reader (starting after the start tag was read)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let mut elem = Self::from_empty(start);
        elem.self_closing = false;
        let keep_whitespace = TEXT_ELEMENTS.contains(&elem.local_name());

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let e = e.into_owned();
                    let child = Self::from_reader(reader, &e)?;
                    elem.children.push(XmlNode::Element(child));
                }
                Event::Empty(e) => {
                    elem.children.push(XmlNode::Element(Self::from_empty(&e)));
                }
                Event::Text(t) => {
                    let text = t.unescape()?.to_string();
                    if !text.is_empty() && (keep_whitespace || !text.trim().is_empty()) {
                        elem.children.push(XmlNode::Text(text));
                    }
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c).to_string();
                    elem.children.push(XmlNode::Text(text));
                }
                Event::End(e) => {
                    if e.name().as_ref() == elem.name.as_bytes() {
                        break;
                    }
                }
                Event::Eof => return Err(Error::InvalidDocument("Unexpected EOF".into())),
                _ => {}
            }
            buf.clear();
        }

        Ok(elem)
    }

    /// Create from empty element tag
    pub fn from_empty(e: &BytesStart) -> Self {
        Self {
            name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
            attributes: e
                .attributes()
                .filter_map(|a| a.ok())
                .map(|a| {
                    let value = a
                        .unescape_value()
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).to_string());
                    (String::from_utf8_lossy(a.key.as_ref()).to_string(), value)
                })
                .collect(),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Element name without its namespace prefix
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Attribute by its full (prefixed) name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute by local name, ignoring any prefix
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.rsplit(':').next() == Some(local))
            .map(|(_, v)| v.as_str())
    }

    /// The `w:val` attribute common in OOXML
    pub fn w_val(&self) -> Option<&str> {
        self.attr("w:val").or_else(|| self.attr_local("val"))
    }

    /// Child elements
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given local name
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.local_name() == local)
    }

    /// First descendant (depth-first) with the given local name
    pub fn descendant(&self, local: &str) -> Option<&XmlElement> {
        for e in self.elements() {
            if e.local_name() == local {
                return Some(e);
            }
            if let Some(found) = e.descendant(local) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of all descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Write element to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        }

        Ok(())
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Add a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }
}

impl XmlNode {
    /// Write node to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            XmlNode::Element(e) => e.write_to(writer),
            XmlNode::Text(t) => {
                writer.write_event(Event::Text(BytesText::new(t)))?;
                Ok(())
            }
        }
    }
}
