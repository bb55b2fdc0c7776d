//! # pagewright
//!
//! Pagination engine and DOCX codec for a paged rich-text editor.
//!
//! ## Features
//!
//! - Balance a document's blocks across fixed-size pages, driven by a
//!   host-supplied measurement oracle
//! - Import DOCX packages into canonical markup plus page settings
//! - Export markup and page settings back to DOCX (images, lists, tables,
//!   hyperlinks, page-number fields, header and footer)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewright::{ExportOptions, PaginationConfig, Session, StackedHeights};
//!
//! let mut session = Session::new(PaginationConfig::default());
//! session.import_docx(&std::fs::read("input.docx")?)?;
//!
//! // Every block one 20-unit line, 40 lines per page
//! let oracle = StackedHeights::new(800.0, |_| 20.0);
//! session.pump(&oracle);
//! println!("{} pages", session.page_count());
//!
//! std::fs::write("output.docx", session.export_docx(&ExportOptions::default())?)?;
//! ```

pub mod codec;
pub mod error;
pub mod markup;
pub mod model;
pub mod opc;
pub mod paginate;
pub mod session;
pub mod xml;

pub use codec::{export_docx, import_docx, ExportOptions, ImportedDocument};
pub use error::{Error, Result};
pub use model::{HeaderFooter, Margins, PageSettings};
pub use opc::{Package, Part, PartUri};
pub use paginate::{Effects, Measure, PaginationConfig, Paginator, Selection, StackedHeights};
pub use session::{PumpReport, Session};
