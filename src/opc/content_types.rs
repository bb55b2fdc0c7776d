//! `[Content_Types].xml`: extension defaults and per-part overrides

use crate::error::{Error, Result};
use crate::opc::PartUri;
use crate::xml::{XmlElement, CT};
use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;
use std::io::Write;

/// Content type table of a package
#[derive(Clone, Debug, Default)]
pub struct ContentTypes {
    /// (lower-case extension, content type)
    defaults: Vec<(String, String)>,
    overrides: Vec<(PartUri, String)>,
}

impl ContentTypes {
    /// Table with the `rels`, `xml` and image defaults every export needs
    pub fn new() -> Self {
        let mut ct = Self::default();
        ct.add_default("rels", RELATIONSHIPS);
        ct.add_default("xml", XML);
        for (ext, mime) in IMAGE_TYPES {
            ct.add_default(ext, mime);
        }
        ct
    }

    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = XmlElement::parse_document(xml)?;
        let mut ct = Self::default();
        for entry in root.elements() {
            match entry.local_name() {
                "Default" => {
                    ct.add_default(required(entry, "Extension")?, required(entry, "ContentType")?)
                }
                "Override" => {
                    let uri = PartUri::new(required(entry, "PartName")?)?;
                    ct.add_override(&uri, required(entry, "ContentType")?);
                }
                _ => {}
            }
        }
        Ok(ct)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut xml = Writer::new(writer);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut types = XmlElement::new("Types").with_attr("xmlns", CT);
        for (ext, content_type) in &self.defaults {
            types = types.with_child(
                XmlElement::new("Default")
                    .with_attr("Extension", ext.as_str())
                    .with_attr("ContentType", content_type.as_str()),
            );
        }
        for (uri, content_type) in &self.overrides {
            types = types.with_child(
                XmlElement::new("Override")
                    .with_attr("PartName", uri.as_str())
                    .with_attr("ContentType", content_type.as_str()),
            );
        }
        types.write_to(&mut xml)
    }

    /// Map an extension to a content type, replacing any earlier mapping
    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        let extension = extension.to_ascii_lowercase();
        match self.defaults.iter_mut().find(|(e, _)| *e == extension) {
            Some(slot) => slot.1 = content_type.to_string(),
            None => self.defaults.push((extension, content_type.to_string())),
        }
    }

    /// Give one part its own content type
    pub fn add_override(&mut self, uri: &PartUri, content_type: &str) {
        match self.overrides.iter_mut().find(|(u, _)| u == uri) {
            Some(slot) => slot.1 = content_type.to_string(),
            None => self.overrides.push((uri.clone(), content_type.to_string())),
        }
    }

    /// Override first, then the extension default
    pub fn get(&self, uri: &PartUri) -> Option<&str> {
        if let Some((_, ct)) = self.overrides.iter().find(|(u, _)| u == uri) {
            return Some(ct);
        }
        let ext = uri.extension()?.to_ascii_lowercase();
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }
}

fn required<'a>(entry: &'a XmlElement, attr: &str) -> Result<&'a str> {
    entry.attr(attr).ok_or_else(|| Error::MissingAttribute {
        element: entry.name.clone(),
        attr: attr.to_string(),
    })
}

/// Image formats the codec can embed, by file extension
pub const IMAGE_TYPES: [(&str, &str); 6] = [
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
];

// Well-known content types
pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const XML: &str = "application/xml";
pub const MAIN_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const STYLES: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
pub const NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
pub const HEADER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
pub const FOOTER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
