//! Pages and the caret

use super::arena::{BlockArena, BlockId};

/// Caret position: a block and a character offset inside it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub block: BlockId,
    pub offset: usize,
}

impl Selection {
    pub fn new(block: BlockId, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// A fixed-size page hosting a contiguous slice of the document's blocks.
///
/// Pages own no content; the blocks live in the [`BlockArena`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    blocks: Vec<BlockId>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(blocks: Vec<BlockId>) -> Self {
        Self { blocks }
    }

    /// Hosted blocks in order
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn first(&self) -> Option<BlockId> {
        self.blocks.first().copied()
    }

    pub fn last(&self) -> Option<BlockId> {
        self.blocks.last().copied()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains(&id)
    }

    pub(crate) fn push(&mut self, id: BlockId) {
        self.blocks.push(id);
    }

    pub(crate) fn prepend(&mut self, id: BlockId) {
        self.blocks.insert(0, id);
    }

    pub(crate) fn pop_last(&mut self) -> Option<BlockId> {
        self.blocks.pop()
    }

    pub(crate) fn pop_first(&mut self) -> Option<BlockId> {
        if self.blocks.is_empty() {
            None
        } else {
            Some(self.blocks.remove(0))
        }
    }

    pub(crate) fn take_blocks(&mut self) -> Vec<BlockId> {
        std::mem::take(&mut self.blocks)
    }

    /// No blocks, or only a single empty paragraph
    pub fn is_blank(&self, arena: &BlockArena) -> bool {
        match self.blocks.as_slice() {
            [] => true,
            [only] => arena.get(*only).map(|n| n.is_empty_paragraph()).unwrap_or(true),
            _ => false,
        }
    }
}
