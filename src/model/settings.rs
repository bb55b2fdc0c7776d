//! Page-level document settings

use super::units::DEFAULT_MARGIN_MM;

/// Page margins in millimetres
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN_MM)
    }
}

impl Margins {
    /// Same margin on every side
    pub fn uniform(mm: f64) -> Self {
        Self {
            top: mm,
            bottom: mm,
            left: mm,
            right: mm,
        }
    }
}

/// Header or footer configuration
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderFooter {
    pub enabled: bool,
    /// Block sequence as markup
    pub content: String,
}

impl HeaderFooter {
    /// Enabled header/footer with the given markup
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            enabled: true,
            content: content.into(),
        }
    }
}

/// Settings owned by the document.
///
/// Only changed through an explicit settings update, never inferred from
/// content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageSettings {
    pub margins: Margins,
    /// First-line indent of body paragraphs in millimetres
    pub first_line_indent: f64,
    pub header: HeaderFooter,
    pub footer: HeaderFooter,
}
