//! Part URI handling for OPC packages

use crate::error::{Error, Result};
use std::fmt;

/// Represents a URI to a part within an OPC package.
///
/// Part URIs are always absolute paths starting with '/'.
/// Example: `/word/document.xml`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartUri {
    path: String,
}

impl PartUri {
    /// Create a new PartUri from a string.
    ///
    /// The path will be normalized (leading '/' ensured, no trailing '/').
    pub fn new(path: &str) -> Result<Self> {
        let path = path.trim();
        if path.is_empty() {
            return Err(Error::InvalidPartUri("empty path".into()));
        }

        let normalized = format!("/{}", path.trim_start_matches('/'));
        let normalized = normalized.trim_end_matches('/').to_string();

        if normalized.contains("//") {
            return Err(Error::InvalidPartUri(format!(
                "invalid path '{}': contains double slashes",
                path
            )));
        }

        Ok(Self { path: normalized })
    }

    pub(crate) fn from_static(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Path of the entry inside the ZIP archive (no leading '/')
    pub fn zip_path(&self) -> &str {
        &self.path[1..]
    }

    /// Get the file name portion
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    /// Get the file extension
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        let dot = name.rfind('.')?;
        Some(&name[dot + 1..]).filter(|ext| !ext.is_empty())
    }

    /// Directory containing this part ("" for root-level parts)
    fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[..pos],
            None => "",
        }
    }

    /// Get the relationships URI for this part.
    ///
    /// For `/word/document.xml`, returns `/word/_rels/document.xml.rels`
    pub fn relationships_uri(&self) -> PartUri {
        PartUri {
            path: format!("{}/_rels/{}.rels", self.directory(), self.file_name()),
        }
    }

    /// Resolve a relationship target against this part's directory.
    ///
    /// For `/word/document.xml` and `media/image1.png`, returns `/word/media/image1.png`
    pub fn resolve(&self, relative: &str) -> Result<PartUri> {
        if relative.starts_with('/') {
            return PartUri::new(relative);
        }

        let mut segments: Vec<&str> = self
            .directory()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        for segment in relative.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }

        PartUri::new(&segments.join("/"))
    }

    /// Check if this URI points to a relationships file
    pub fn is_relationships(&self) -> bool {
        self.path.contains("/_rels/") && self.path.ends_with(".rels")
    }
}

impl fmt::Display for PartUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Part URIs written by the exporter
pub mod well_known {
    use super::PartUri;

    pub fn document() -> PartUri {
        PartUri::from_static("/word/document.xml")
    }

    pub fn styles() -> PartUri {
        PartUri::from_static("/word/styles.xml")
    }

    pub fn numbering() -> PartUri {
        PartUri::from_static("/word/numbering.xml")
    }

    pub fn header() -> PartUri {
        PartUri::from_static("/word/header1.xml")
    }

    pub fn footer() -> PartUri {
        PartUri::from_static("/word/footer1.xml")
    }

    /// `/word/media/image{index}.{ext}`
    pub fn media(index: usize, ext: &str) -> PartUri {
        PartUri {
            path: format!("/word/media/image{}.{}", index, ext),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_leading_slash() {
        let uri = PartUri::new("word/document.xml").unwrap();
        assert_eq!(uri.as_str(), "/word/document.xml");
        assert_eq!(uri.zip_path(), "word/document.xml");
    }

    #[test]
    fn test_rejects_empty_and_double_slash() {
        assert!(PartUri::new("  ").is_err());
        assert!(PartUri::new("/word//document.xml").is_err());
    }

    #[test]
    fn test_extension() {
        let uri = well_known::media(3, "jpeg");
        assert_eq!(uri.as_str(), "/word/media/image3.jpeg");
        assert_eq!(uri.extension(), Some("jpeg"));
        assert_eq!(PartUri::new("/word/noext").unwrap().extension(), None);
    }

    #[test]
    fn test_relationships_uri() {
        assert_eq!(
            well_known::document().relationships_uri().as_str(),
            "/word/_rels/document.xml.rels"
        );
        let root = PartUri::new("/doc.xml").unwrap();
        assert_eq!(root.relationships_uri().as_str(), "/_rels/doc.xml.rels");
    }

    #[test]
    fn test_resolve_relative_targets() {
        let doc = well_known::document();
        assert_eq!(
            doc.resolve("media/image1.png").unwrap().as_str(),
            "/word/media/image1.png"
        );
        assert_eq!(
            doc.resolve("../customXml/item1.xml").unwrap().as_str(),
            "/customXml/item1.xml"
        );
        assert_eq!(
            doc.resolve("/word/media/a.gif").unwrap().as_str(),
            "/word/media/a.gif"
        );
    }

    #[test]
    fn test_is_relationships() {
        assert!(PartUri::new("/word/_rels/document.xml.rels")
            .unwrap()
            .is_relationships());
        assert!(!well_known::document().is_relationships());
    }
}
