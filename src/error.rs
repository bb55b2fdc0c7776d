//! Error types for pagewright

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML encoding error: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The package cannot be imported (not a ZIP, or the main document part
    /// is missing or unparsable).
    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    /// An embedded image could not be decoded. Never surfaced by export;
    /// the image is omitted instead.
    #[error("Unsupported embed: {0}")]
    UnsupportedEmbed(String),

    #[error("Invalid part URI: {0}")]
    InvalidPartUri(String),

    #[error("Missing attribute '{attr}' on element '{element}'")]
    MissingAttribute { element: String, attr: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid markup: {0}")]
    InvalidMarkup(String),
}

impl Error {
    /// Collapse any low-level failure into an import failure.
    pub(crate) fn into_malformed(self) -> Self {
        match self {
            Error::MalformedPackage(_) => self,
            other => Error::MalformedPackage(other.to_string()),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
