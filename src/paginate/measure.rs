//! Measurement oracle

use super::arena::BlockArena;
use super::page::Page;
use crate::markup::Node;

/// Layout measurement supplied by the host.
///
/// Heights are in any consistent unit; the engine only compares them with
/// each other and with [`PaginationConfig::epsilon`](super::PaginationConfig).
pub trait Measure {
    /// Height of the content currently hosted by `page`
    fn rendered_height(&self, page: &Page, arena: &BlockArena) -> f64;

    /// Usable content height of the page at `index`
    fn box_height(&self, index: usize) -> f64;
}

/// Oracle that stacks per-block heights with no spacing between blocks
pub struct StackedHeights<F> {
    box_height: f64,
    block_height: F,
}

impl<F> StackedHeights<F>
where
    F: Fn(&Node) -> f64,
{
    pub fn new(box_height: f64, block_height: F) -> Self {
        Self {
            box_height,
            block_height,
        }
    }
}

impl<F> Measure for StackedHeights<F>
where
    F: Fn(&Node) -> f64,
{
    fn rendered_height(&self, page: &Page, arena: &BlockArena) -> f64 {
        page.blocks()
            .iter()
            .filter_map(|id| arena.get(*id))
            .map(|node| (self.block_height)(node))
            .sum()
    }

    fn box_height(&self, _index: usize) -> f64 {
        self.box_height
    }
}
