//! A single named part of a package

use crate::error::Result;
use crate::opc::{PartUri, Relationships};

/// Part payload with its content type and, for XML parts that reference
/// other parts, its relationship table
#[derive(Clone, Debug)]
pub struct Part {
    uri: PartUri,
    content_type: String,
    data: Vec<u8>,
    relationships: Option<Relationships>,
}

impl Part {
    pub fn new(uri: PartUri, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            uri,
            content_type: content_type.into(),
            data,
            relationships: None,
        }
    }

    /// Attach the part's relationship table
    pub fn with_relationships(mut self, rels: Relationships) -> Self {
        self.relationships = Some(rels);
        self
    }

    pub fn uri(&self) -> &PartUri {
        &self.uri
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Part text with any UTF-8 byte order mark removed
    pub fn xml(&self) -> Result<&str> {
        let text = std::str::from_utf8(&self.data)?;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
    }

    pub fn relationships(&self) -> Option<&Relationships> {
        self.relationships.as_ref()
    }

    pub(crate) fn set_relationships(&mut self, rels: Relationships) {
        self.relationships = Some(rels);
    }
}
