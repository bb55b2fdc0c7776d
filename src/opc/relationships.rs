//! Relationship parts (`_rels/*.rels`)
//!
//! Entries keep insertion order so that written packages are reproducible.

use crate::error::{Error, Result};
use crate::xml::{XmlElement, PR};
use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;
use std::io::Write;

/// Ordered relationship table of one part (or of the package)
#[derive(Clone, Debug, Default)]
pub struct Relationships {
    items: Vec<Relationship>,
}

/// One `<Relationship>` entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    /// e.g. "rId5"
    pub id: String,
    pub rel_type: String,
    /// Relative part path, or an absolute URL for external targets
    pub target: String,
    pub target_mode: TargetMode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetMode {
    #[default]
    Internal,
    /// Outside the package (hyperlinks)
    External,
}

impl Relationship {
    /// Internal relationship
    pub fn new(id: impl Into<String>, rel_type: &str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            target_mode: TargetMode::Internal,
        }
    }

    /// Set the target mode
    pub fn with_mode(mut self, mode: TargetMode) -> Self {
        self.target_mode = mode;
        self
    }

    pub fn is_external(&self) -> bool {
        self.target_mode == TargetMode::External
    }

    fn from_element(e: &XmlElement) -> Result<Self> {
        let required = |attr: &str| {
            e.attr(attr).map(str::to_string).ok_or_else(|| Error::MissingAttribute {
                element: "Relationship".into(),
                attr: attr.into(),
            })
        };
        let mode = match e.attr("TargetMode") {
            Some("External") => TargetMode::External,
            _ => TargetMode::Internal,
        };
        Ok(Self {
            id: required("Id")?,
            rel_type: required("Type")?,
            target: required("Target")?,
            target_mode: mode,
        })
    }

    fn to_element(&self) -> XmlElement {
        let element = XmlElement::new("Relationship")
            .with_attr("Id", self.id.as_str())
            .with_attr("Type", self.rel_type.as_str())
            .with_attr("Target", self.target.as_str());
        if self.is_external() {
            element.with_attr("TargetMode", "External")
        } else {
            element
        }
    }
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` part
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = XmlElement::parse_document(xml)?;
        let items = root
            .elements()
            .filter(|e| e.local_name() == "Relationship")
            .map(Relationship::from_element)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { items })
    }

    /// Serialize as a `.rels` part
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut xml = Writer::new(writer);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let root = self
            .items
            .iter()
            .fold(XmlElement::new("Relationships").with_attr("xmlns", PR), |root, rel| {
                root.with_child(rel.to_element())
            });
        root.write_to(&mut xml)
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// First relationship of a type
    pub fn by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.rel_type == rel_type)
    }

    /// Insert an entry, replacing any entry with the same id
    pub fn insert(&mut self, rel: Relationship) {
        match self.items.iter_mut().find(|r| r.id == rel.id) {
            Some(slot) => *slot = rel,
            None => self.items.push(rel),
        }
    }

    /// Add an internal relationship under the id after the highest `rIdN`
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let next = self
            .items
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("rId{}", next);
        self.items.push(Relationship::new(id.as_str(), rel_type, target));
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Relationship types written and followed by the codec
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const HEADER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const FOOTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}
