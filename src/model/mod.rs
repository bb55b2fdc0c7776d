//! Document model: block kinds, run styles, page settings and units

mod block;
mod settings;
mod style;
pub mod units;

pub use block::BlockKind;
pub use settings::{HeaderFooter, Margins, PageSettings};
pub use style::{highlight_hex, highlight_name, normalize_color, Alignment, BlockStyle, RunStyle};
