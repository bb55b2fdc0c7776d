//! Page balancing
//!
//! Keeps a set of fixed-size pages showing exactly the document's blocks:
//! overflowing pages push their last block forward, under-filled pages pull
//! the next page's first block back, and an empty trailing page is dropped.
//!
//! The engine never measures anything itself. Heights come from a
//! [`Measure`] implementation supplied by the host, and page creation is a
//! request the host fulfils before the next [`Paginator::tick`].

mod arena;
mod engine;
mod measure;
mod page;

pub use arena::{BlockArena, BlockId};
pub use engine::{Effects, Paginator, Trigger};
pub use measure::{Measure, StackedHeights};
pub use page::{Page, Selection};

/// Pagination tuning
#[derive(Clone, Debug, PartialEq)]
pub struct PaginationConfig {
    /// Overflow tolerance in layout units
    pub epsilon: f64,
    /// Upper bound on ticks per [`Session::pump`](crate::Session::pump)
    pub max_ticks: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            max_ticks: 256,
        }
    }
}

impl PaginationConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}
