//! ZIP container holding the parts of a DOCX file

use crate::error::{Error, Result};
use crate::opc::relationships::rel_types;
use crate::opc::{ContentTypes, Part, PartUri, Relationships};
use std::io::{Cursor, Read, Seek, Write};
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
const PACKAGE_RELS_PATH: &str = "_rels/.rels";
const OCTET_STREAM: &str = "application/octet-stream";

/// Parts, the content type table and the package relationships.
///
/// Parts are kept and written in insertion order with fixed timestamps, so
/// the same input always produces the same bytes.
#[derive(Debug)]
pub struct Package {
    parts: Vec<Part>,
    relationships: Relationships,
    content_types: ContentTypes,
}

impl Package {
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            relationships: Relationships::new(),
            content_types: ContentTypes::new(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut package = Self::new();

        // without a manifest, content types fall back to the defaults
        if let Some(xml) = read_entry(&mut archive, CONTENT_TYPES_PATH)? {
            package.content_types = ContentTypes::from_xml(&xml)?;
        }
        if let Some(xml) = read_entry(&mut archive, PACKAGE_RELS_PATH)? {
            package.relationships = Relationships::from_xml(&xml)?;
        }

        let names = (0..archive.len())
            .map(|i| archive.by_index(i).map(|file| file.name().to_string()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for name in names {
            if name.ends_with('/') || name == CONTENT_TYPES_PATH || name == PACKAGE_RELS_PATH {
                continue;
            }
            let uri = PartUri::new(&name)?;
            if uri.is_relationships() {
                continue;
            }

            let mut data = Vec::new();
            archive.by_name(&name)?.read_to_end(&mut data)?;
            let content_type = package.content_types.get(&uri).unwrap_or(OCTET_STREAM).to_string();
            let mut part = Part::new(uri, content_type, data);

            if let Some(xml) = read_entry(&mut archive, part.uri().relationships_uri().zip_path())? {
                part.set_relationships(Relationships::from_xml(&xml)?);
            }
            package.parts.push(part);
        }

        log::debug!("read package with {} parts", package.parts.len());
        Ok(package)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(Cursor::new(&mut buf))?;
        Ok(buf)
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        zip.start_file(CONTENT_TYPES_PATH, options)?;
        self.content_types.write_to(&mut zip)?;

        if !self.relationships.is_empty() {
            zip.start_file(PACKAGE_RELS_PATH, options)?;
            self.relationships.write_to(&mut zip)?;
        }

        for part in &self.parts {
            zip.start_file(part.uri().zip_path(), options)?;
            zip.write_all(part.data())?;

            if let Some(rels) = part.relationships().filter(|r| !r.is_empty()) {
                zip.start_file(part.uri().relationships_uri().zip_path(), options)?;
                rels.write_to(&mut zip)?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    pub fn part(&self, uri: &PartUri) -> Option<&Part> {
        self.parts.iter().find(|p| p.uri() == uri)
    }

    /// Add a part, replacing any part with the same name. A content type the
    /// extension does not already imply is recorded as an override.
    pub fn add_part(&mut self, part: Part) {
        if self.content_types.get(part.uri()) != Some(part.content_type()) {
            self.content_types
                .add_override(part.uri(), part.content_type());
        }
        match self.parts.iter_mut().find(|p| p.uri() == part.uri()) {
            Some(slot) => *slot = part,
            None => self.parts.push(part),
        }
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Package relationships (`/_rels/.rels`)
    pub fn relationships_mut(&mut self) -> &mut Relationships {
        &mut self.relationships
    }

    /// Target of the `officeDocument` relationship
    pub fn main_document_part(&self) -> Option<&Part> {
        let rel = self.relationships.by_type(rel_types::OFFICE_DOCUMENT)?;
        let uri = PartUri::new(&rel.target).ok()?;
        self.part(&uri)
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}

/// UTF-8 entry by name, `None` if the archive has no such entry
fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(Error::Zip(e)),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}
