//! DOCX importer and exporter
//!
//! Translates between a DOCX package and the markup string plus
//! [`PageSettings`] pair held by an editing session.

mod export;
mod import;
pub mod media;
mod parts;
mod wml;

use crate::error::Result;
use crate::model::PageSettings;

pub use media::DataUri;

/// Result of importing a package
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedDocument {
    /// Body content as markup
    pub markup: String,
    /// Page settings, `None` when the body has no section properties
    pub settings: Option<PageSettings>,
}

/// Export parameters that are not part of the document
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    /// Used for images whose size is neither given nor readable from the data
    pub default_image_width_px: u32,
    pub default_image_height_px: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            default_image_width_px: 400,
            default_image_height_px: 300,
        }
    }
}

impl ExportOptions {
    /// Page size in millimetres
    pub fn with_page_size(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.page_width_mm = width_mm;
        self.page_height_mm = height_mm;
        self
    }

    /// Fallback image size in pixels
    pub fn with_default_image_size(mut self, width_px: u32, height_px: u32) -> Self {
        self.default_image_width_px = width_px;
        self.default_image_height_px = height_px;
        self
    }
}

/// Parse DOCX bytes into markup and page settings.
///
/// Fails with [`Error::MalformedPackage`](crate::Error::MalformedPackage)
/// when the bytes are not a ZIP archive or the main document part is missing
/// or unparsable.
pub fn import_docx(bytes: &[u8]) -> Result<ImportedDocument> {
    import::import(bytes)
}

/// Serialize markup and page settings into DOCX bytes.
///
/// Images whose data URI cannot be decoded are left out.
pub fn export_docx(markup: &str, settings: &PageSettings, options: &ExportOptions) -> Result<Vec<u8>> {
    export::export(markup, settings, options)
}
